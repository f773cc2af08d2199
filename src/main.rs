use actix_files as fs;
use actix_web::{middleware::Logger, web::Data, App, HttpServer};
use dotenv::dotenv;
use log::{error, info, warn};

use gemini_chat_relay::config::RelayConfig;
use gemini_chat_relay::model::GeminiModel;
use gemini_chat_relay::web::routes;
use gemini_chat_relay::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize environment
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting Gemini chat relay");

    let config = match RelayConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    let model = match GeminiModel::new(&config) {
        Ok(model) => model,
        Err(e) => {
            error!("Failed to initialize Gemini client: {:#}", e);
            std::process::exit(1);
        }
    };
    if model.is_configured() {
        info!("Gemini AI initialized with model {}", config.model);
    } else {
        warn!("GEMINI_API_KEY is not set; chat requests will fail until it is configured");
    }

    let app_state = Data::new(AppState { model });

    let static_dir = config.static_dir.clone().filter(|dir| dir.is_dir());
    if let Some(dir) = &static_dir {
        info!("Serving static files from {}", dir.display());
    }

    info!("Listening on {}:{}", config.host, config.port);
    HttpServer::new(move || {
        let mut app = App::new()
            .wrap(Logger::default())
            .app_data(app_state.clone())
            .configure(routes::configure);
        if let Some(dir) = &static_dir {
            app = app.service(fs::Files::new("/static", dir).index_file("index.html"));
        }
        app
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
