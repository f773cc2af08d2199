#![allow(dead_code)]

pub mod mock_upstream;

use actix_web::web;
use gemini_chat_relay::config::RelayConfig;
use gemini_chat_relay::model::GeminiModel;
use gemini_chat_relay::AppState;
use serde_json::{json, Value};

pub const TEST_KEY: &str = "test-key";
pub const TEST_MODEL: &str = "gemini-test";

/// Relay configuration pointing at `api_base` with a credential set.
pub fn relay_config(api_base: &str) -> RelayConfig {
    RelayConfig {
        api_key: Some(TEST_KEY.to_string()),
        api_base: api_base.to_string(),
        model: TEST_MODEL.to_string(),
        request_timeout_secs: 5,
        static_dir: None,
        ..RelayConfig::default()
    }
}

pub fn app_state(config: &RelayConfig) -> web::Data<AppState> {
    let model = GeminiModel::new(config).unwrap();
    web::Data::new(AppState { model })
}

/// A `generateContent` body with a single candidate.
pub fn candidate_response(text: &str, finish_reason: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": finish_reason,
            "index": 0
        }]
    })
}
