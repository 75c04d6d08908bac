//! OpenAI request configuration.

use serde::{Deserialize, Serialize};

/// OpenAI configuration.
///
/// # Fields
/// - `model`: chat model (default: `"gpt-4o"`)
/// - `max_tokens`: completion budget for commit messages, `10..=4000` (default: `150`)
/// - `temperature`: sampling temperature, `0.0..=2.0` (default: `0.7`)
/// - `timeout`: per-request timeout in milliseconds, `1000..=120000` (default: `30000`)
/// - `retries`: extra generation attempts after the first one (default: `2`)
/// - `base_url`: API root (default: `"https://api.openai.com"`)
///
/// The API key is never read from files; it comes from `OPENAI_API_KEY`.
///
/// # Example
/// ```toml
/// [openai]
/// model = "gpt-4o-mini"
/// max_tokens = 200
/// timeout = 20000
/// ```
#[derive(Clone, Deserialize, Serialize)]
pub struct OpenAIConfig {
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Milliseconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default = "default_retries")]
    pub retries: usize,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(skip)]
    pub api_key: Option<String>,
}

impl std::fmt::Debug for OpenAIConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use crate::llm::provider::utils::mask_api_key;
        let masked_key = self.api_key.as_deref().map(mask_api_key);
        f.debug_struct("OpenAIConfig")
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .field("retries", &self.retries)
            .field("base_url", &self.base_url)
            .field("api_key", &masked_key)
            .finish()
    }
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout: default_timeout(),
            retries: default_retries(),
            base_url: default_base_url(),
            api_key: None,
        }
    }
}

impl OpenAIConfig {
    /// Total generation attempts: the first call plus `retries`.
    pub fn max_attempts(&self) -> usize {
        self.retries + 1
    }

    pub(crate) fn collect_errors(&self, errors: &mut Vec<String>) {
        if self
            .api_key
            .as_deref()
            .is_none_or(|key| key.trim().is_empty())
        {
            errors.push("OPENAI_API_KEY not found in environment".to_string());
        }
        if self.model.trim().is_empty() {
            errors.push("openai.model cannot be empty".to_string());
        }
        if !(10..=4000).contains(&self.max_tokens) {
            errors.push(format!(
                "openai.max_tokens must be between 10 and 4000 (got {})",
                self.max_tokens
            ));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            errors.push(format!(
                "openai.temperature must be between 0 and 2 (got {})",
                self.temperature
            ));
        }
        if !(1000..=120_000).contains(&self.timeout) {
            errors.push(format!(
                "openai.timeout must be between 1000 and 120000 ms (got {})",
                self.timeout
            ));
        }
    }
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_max_tokens() -> u32 {
    150
}

fn default_temperature() -> f32 {
    0.7
}

fn default_timeout() -> u64 {
    30_000
}

fn default_retries() -> usize {
    2
}

fn default_base_url() -> String {
    crate::llm::provider::utils::DEFAULT_OPENAI_BASE.to_string()
}
