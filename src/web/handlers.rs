use actix_web::{web, HttpResponse, Responder};
use log::{debug, error, info, warn};

use crate::error::RelayError;
use crate::web::models::{ChatRequest, ChatResponse, HealthResponse, RootResponse};
use crate::AppState;

// Liveness / info endpoint
pub async fn root(data: web::Data<AppState>) -> impl Responder {
    let ai_model = if data.model.is_configured() {
        data.model.label().to_string()
    } else {
        "Not configured".to_string()
    };
    HttpResponse::Ok().json(RootResponse {
        message: "AI Chatbot API is running".to_string(),
        status: "ok".to_string(),
        ai_model,
    })
}

// Health check endpoint
pub async fn health_check(data: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        ai_configured: data.model.is_configured(),
    })
}

// Chat API endpoint
pub async fn chat(
    data: web::Data<AppState>,
    req: web::Json<ChatRequest>,
) -> Result<HttpResponse, RelayError> {
    let req = req.into_inner();
    info!(
        "Chat request: {} characters, {} history entries",
        req.message.len(),
        req.history.len()
    );
    debug!("Requested language: {}", req.language);

    match data.model.generate(&req).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ChatResponse { response })),
        Err(e) => {
            match &e {
                RelayError::InvalidRequest(_) | RelayError::ContentBlocked(_) => {
                    warn!("Chat request rejected: {}", e)
                }
                _ => error!("Error in chat endpoint: {}", e),
            }
            Err(e)
        }
    }
}
