pub mod types;

use std::time::Duration;

use anyhow::Result;
use log::{debug, info, warn};
use reqwest::Client;

use crate::config::{KeyPlacement, RelayConfig, MAX_HISTORY};
use crate::error::RelayError;
use crate::web::models::{ChatMessage, ChatRequest, Role};
use types::{
    Content, ContentRole, FinishReason, GenerateContentRequest, GenerateContentResponse,
    GenerationConfig, SafetySetting, HARM_CATEGORIES,
};

/// Text pulled out of a successful upstream response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    pub text: String,
    /// Generation stopped on the output token limit.
    pub truncated: bool,
}

/// Keeps the last `limit` history entries, drops roles that have no upstream
/// counterpart and appends `message` as the final user turn.
pub fn build_contents(history: &[ChatMessage], message: &str, limit: usize) -> Vec<Content> {
    let start = history.len().saturating_sub(limit);
    let mut contents: Vec<Content> = history[start..]
        .iter()
        .filter_map(|msg| {
            let role = match msg.role {
                Role::User => ContentRole::User,
                Role::Assistant => ContentRole::Model,
                Role::Other => return None,
            };
            Some(Content::new(role, msg.content.clone()))
        })
        .collect();
    contents.push(Content::new(ContentRole::User, message));
    contents
}

/// Interprets the first candidate of an upstream response.
pub fn extract_text(response: GenerateContentResponse) -> Result<Generation, RelayError> {
    let candidate = match response.candidates.into_iter().next() {
        Some(candidate) => candidate,
        None => {
            let block_reason = response
                .prompt_feedback
                .and_then(|feedback| feedback.block_reason);
            return Err(match block_reason {
                Some(reason) => RelayError::ContentBlocked(reason),
                None => RelayError::InvalidResponse("response contained no candidates".into()),
            });
        }
    };

    if candidate.finish_reason == Some(FinishReason::Safety) {
        return Err(RelayError::ContentBlocked("SAFETY".into()));
    }

    let texts: Vec<String> = candidate
        .content
        .map(|content| content.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|part| part.text)
        .collect();
    if texts.is_empty() {
        return Err(RelayError::InvalidResponse(
            "candidate has no text content".into(),
        ));
    }

    Ok(Generation {
        text: texts.concat(),
        truncated: candidate.finish_reason == Some(FinishReason::MaxTokens),
    })
}

// Client for the Gemini generateContent API
pub struct GeminiModel {
    client: Client,
    api_key: Option<String>,
    api_base: String,
    model: String,
    label: String,
    key_placement: KeyPlacement,
    history_limit: usize,
    generation_config: GenerationConfig,
    safety_settings: Vec<SafetySetting>,
}

impl GeminiModel {
    pub fn new(config: &RelayConfig) -> Result<Self> {
        info!(
            "Initializing Gemini client for model {} at {}",
            config.model, config.api_base
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        let settings = &config.generation;
        let safety_settings = HARM_CATEGORIES
            .iter()
            .map(|category| SafetySetting {
                category: category.to_string(),
                threshold: config.safety_threshold.clone(),
            })
            .collect();

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            api_base: config.api_base.clone(),
            model: config.model.clone(),
            label: config.model_label.clone(),
            key_placement: config.key_placement,
            history_limit: config.history_limit.min(MAX_HISTORY),
            generation_config: GenerationConfig {
                temperature: settings.temperature,
                top_p: settings.top_p,
                top_k: settings.top_k,
                max_output_tokens: settings.max_output_tokens,
            },
            safety_settings,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }

    pub async fn generate(&self, request: &ChatRequest) -> Result<String, RelayError> {
        let api_key = self.api_key.as_deref().ok_or(RelayError::NotConfigured)?;
        if request.message.trim().is_empty() {
            return Err(RelayError::InvalidRequest("message must not be empty".into()));
        }

        let payload = GenerateContentRequest {
            contents: build_contents(&request.history, &request.message, self.history_limit),
            generation_config: self.generation_config.clone(),
            safety_settings: self.safety_settings.clone(),
        };

        info!(
            "Sending {} content items to {} (history: {}, language: {})",
            payload.contents.len(),
            self.model,
            request.history.len(),
            request.language
        );
        debug!("Message: {}", request.message);

        let builder = self.client.post(self.endpoint()).json(&payload);
        let builder = match self.key_placement {
            KeyPlacement::Header => builder.header("x-goog-api-key", api_key),
            KeyPlacement::Query => builder.query(&[("key", api_key)]),
        };

        let response = builder.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    warn!("Failed to read upstream error body: {}", e);
                    String::new()
                }
            };
            warn!("Upstream returned {}: {}", status, body);
            return Err(RelayError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response.json().await?;
        debug!("Upstream response: {:?}", parsed);

        let generation = extract_text(parsed)?;
        if generation.truncated {
            warn!(
                "Response truncated at {} output tokens",
                self.generation_config.max_output_tokens
            );
        }

        info!("Response length: {} characters", generation.text.len());
        Ok(generation.text)
    }
}
