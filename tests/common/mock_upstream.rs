use actix_web::dev::ServerHandle;
use actix_web::http::StatusCode;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// What the mock saw on its most recent call.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub query: String,
    pub api_key_header: Option<String>,
    pub body: Value,
}

struct MockState {
    calls: AtomicUsize,
    last_request: Mutex<Option<RecordedRequest>>,
    status: u16,
    body: Value,
    delay: Option<Duration>,
}

/// Stand-in for the generateContent API that replies with a fixed status and body.
pub struct MockUpstream {
    pub url: String,
    state: web::Data<MockState>,
    handle: ServerHandle,
}

impl MockUpstream {
    pub async fn start(status: u16, body: Value) -> Self {
        Self::start_with_delay(status, body, None).await
    }

    pub async fn start_with_delay(status: u16, body: Value, delay: Option<Duration>) -> Self {
        let state = web::Data::new(MockState {
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
            status,
            body,
            delay,
        });

        let data = state.clone();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(data.clone())
                .default_service(web::to(record))
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();
        let addr = server.addrs()[0];
        let server = server.run();
        let handle = server.handle();
        actix_web::rt::spawn(server);

        Self {
            url: format!("http://{}", addr),
            state,
            handle,
        }
    }

    pub fn calls(&self) -> usize {
        self.state.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.state.last_request.lock().unwrap().clone()
    }

    pub async fn stop(self) {
        self.handle.stop(false).await;
    }
}

async fn record(req: HttpRequest, body: web::Bytes, state: web::Data<MockState>) -> HttpResponse {
    state.calls.fetch_add(1, Ordering::SeqCst);
    *state.last_request.lock().unwrap() = Some(RecordedRequest {
        path: req.path().to_string(),
        query: req.query_string().to_string(),
        api_key_header: req
            .headers()
            .get("x-goog-api-key")
            .and_then(|v| v.to_str().ok())
            .map(String::from),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    });

    if let Some(delay) = state.delay {
        actix_web::rt::time::sleep(delay).await;
    }

    HttpResponse::build(StatusCode::from_u16(state.status).unwrap()).json(&state.body)
}
