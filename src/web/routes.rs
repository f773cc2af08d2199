use actix_web::web;

use crate::error::RelayError;
use crate::web::handlers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    // Malformed bodies get the same {"detail": ...} shape as every other error
    let json_config = web::JsonConfig::default()
        .error_handler(|err, _req| RelayError::InvalidRequest(err.to_string()).into());

    cfg.app_data(json_config)
        .service(
            web::scope("/api")
                .route("/chat", web::post().to(handlers::chat))
                .route("/health", web::get().to(handlers::health_check)),
        )
        .route("/", web::get().to(handlers::root));
}
