use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("AI model is not configured. Please set GEMINI_API_KEY environment variable.")]
    NotConfigured,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Upstream request timed out")]
    UpstreamTimeout,

    #[error("Failed to reach upstream: {0}")]
    UpstreamTransport(String),

    #[error("Upstream returned status {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("Response blocked by content safety filters: {0}")]
    ContentBlocked(String),

    #[error("Invalid upstream response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RelayError::UpstreamTimeout
        } else if err.is_decode() {
            RelayError::InvalidResponse(err.to_string())
        } else {
            RelayError::UpstreamTransport(err.to_string())
        }
    }
}

impl ResponseError for RelayError {
    fn status_code(&self) -> StatusCode {
        match self {
            RelayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            RelayError::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
            RelayError::UpstreamTransport(_) => StatusCode::BAD_GATEWAY,
            RelayError::UpstreamStatus { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            RelayError::NotConfigured
            | RelayError::ContentBlocked(_)
            | RelayError::InvalidResponse(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "detail": self.to_string() }))
    }
}
