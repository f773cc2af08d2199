use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    /// Any role the relay does not forward, e.g. "system".
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatMessage>,
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    "en".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub ai_configured: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
    pub status: String,
    pub ai_model: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_defaults_history_and_language() {
        let req: ChatRequest = serde_json::from_value(json!({ "message": "Hi" })).unwrap();
        assert!(req.history.is_empty());
        assert_eq!(req.language, "en");
    }

    #[test]
    fn unknown_roles_deserialize_as_other() {
        let req: ChatRequest = serde_json::from_value(json!({
            "message": "Hi",
            "history": [
                { "role": "system", "content": "be nice" },
                { "role": "assistant", "content": "ok" }
            ],
            "language": "ja"
        }))
        .unwrap();
        assert_eq!(req.history[0].role, Role::Other);
        assert_eq!(req.history[1].role, Role::Assistant);
        assert_eq!(req.language, "ja");
    }
}
