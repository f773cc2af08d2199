pub mod config;
pub mod error;
pub mod model;
pub mod web;

use model::GeminiModel;

// Shared, read-only application state
pub struct AppState {
    pub model: GeminiModel,
}
