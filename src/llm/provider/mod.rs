pub mod base;
pub mod openai;
pub mod utils;

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use crate::config::OpenAIConfig;
use crate::error::{Result, WizardError};
use crate::llm::LLMProvider;

/// Connect timeout cap; the overall request timeout comes from config.
const CONNECT_TIMEOUT_MS: u64 = 10_000;

/// Installs the rustls crypto provider.
///
/// reqwest with `rustls-no-provider` needs one installed before the first
/// client is built. Repeated calls are harmless.
pub fn ensure_crypto_provider() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}

/// Builds the HTTP client used for LLM requests.
///
/// `timeout_ms` bounds every request end to end.
pub(crate) fn create_http_client(timeout_ms: u64) -> Result<Client> {
    ensure_crypto_provider();

    let user_agent = format!(
        "{}/{} ({})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS
    );

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_millis(timeout_ms))
        .connect_timeout(Duration::from_millis(timeout_ms.min(CONNECT_TIMEOUT_MS)))
        .build()
        .map_err(|e| WizardError::Llm(format!("Failed to create HTTP client: {}", e)))
}

/// Creates the LLM provider described by the config.
pub fn create_provider(config: &OpenAIConfig) -> Result<Arc<dyn LLMProvider>> {
    Ok(Arc::new(openai::OpenAIProvider::new(config)?))
}
