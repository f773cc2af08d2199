use anyhow::{anyhow, Context, Result};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-exp";
pub const DEFAULT_MODEL_LABEL: &str = "Gemini 2.0 Flash";
/// Upper bound on history entries forwarded upstream. `HISTORY_LIMIT` may
/// narrow the window but never widen it.
pub const MAX_HISTORY: usize = 10;

/// Where the credential goes on outbound requests. Older API versions only
/// accept the `?key=` query parameter, newer ones the `x-goog-api-key` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPlacement {
    Header,
    Query,
}

impl FromStr for KeyPlacement {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "header" => Ok(KeyPlacement::Header),
            "query" => Ok(KeyPlacement::Query),
            other => Err(anyhow!(
                "unknown key placement '{}', expected 'header' or 'query'",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.95,
            top_k: 40,
            max_output_tokens: 2048,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub model_label: String,
    pub api_base: String,
    pub key_placement: KeyPlacement,
    pub generation: GenerationSettings,
    pub safety_threshold: String,
    pub request_timeout_secs: u64,
    pub history_limit: usize,
    pub host: String,
    pub port: u16,
    pub static_dir: Option<PathBuf>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            model_label: DEFAULT_MODEL_LABEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            key_placement: KeyPlacement::Header,
            generation: GenerationSettings::default(),
            safety_threshold: "BLOCK_ONLY_HIGH".to_string(),
            request_timeout_secs: 30,
            history_limit: MAX_HISTORY,
            host: "127.0.0.1".to_string(),
            port: 8080,
            static_dir: Some(PathBuf::from("./public")),
        }
    }
}

impl RelayConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup. Unset
    /// variables fall back to the defaults; set but unparsable ones are errors.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let key_placement = match get("GEMINI_KEY_PLACEMENT") {
            Some(v) => v.parse()?,
            None => defaults.key_placement,
        };

        let generation = GenerationSettings {
            temperature: parse_or(&get, "TEMPERATURE", defaults.generation.temperature)?,
            top_p: parse_or(&get, "TOP_P", defaults.generation.top_p)?,
            top_k: parse_or(&get, "TOP_K", defaults.generation.top_k)?,
            max_output_tokens: parse_or(
                &get,
                "MAX_OUTPUT_TOKENS",
                defaults.generation.max_output_tokens,
            )?,
        };

        Ok(Self {
            api_key: get("GEMINI_API_KEY"),
            model: get("GEMINI_MODEL").unwrap_or(defaults.model),
            model_label: get("GEMINI_MODEL_LABEL").unwrap_or(defaults.model_label),
            api_base: get("GEMINI_API_BASE")
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base),
            key_placement,
            generation,
            safety_threshold: get("GEMINI_SAFETY_THRESHOLD").unwrap_or(defaults.safety_threshold),
            request_timeout_secs: parse_or(
                &get,
                "UPSTREAM_TIMEOUT_SECS",
                defaults.request_timeout_secs,
            )?,
            history_limit: parse_or(&get, "HISTORY_LIMIT", defaults.history_limit)?
                .min(MAX_HISTORY),
            host: get("HOST").unwrap_or(defaults.host),
            port: parse_or(&get, "PORT", defaults.port)?,
            static_dir: get("STATIC_DIR").map(PathBuf::from).or(defaults.static_dir),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("invalid value for {}: '{}'", key, raw)),
        None => Ok(default),
    }
}
