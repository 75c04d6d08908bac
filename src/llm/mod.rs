//! LLM abstractions: the provider trait, prompts and commit message generation.

pub mod message;
pub mod prompt;
pub mod provider;
pub mod retry;

use async_trait::async_trait;

use crate::error::Result;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

pub use message::{CommitSuggestion, CommitType, MessageGenerator};

/// Progress reporting interface.
///
/// The LLM layer reports status changes (retries mostly) through this trait
/// without depending on a concrete UI type.
pub trait ProgressReporter: Send + Sync {
    /// Appends a suffix to the base progress message.
    fn append_suffix(&self, suffix: &str);
}

/// Sampling settings of one completion request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    pub temperature: f32,
    pub max_tokens: u32,
}

/// A chat completion backend.
///
/// Implementations send a single user prompt and return the raw completion
/// text. Retries, prompt building and response cleanup live above this trait.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Sends `prompt` and returns the completion text.
    ///
    /// # Errors
    /// - [`WizardError::MissingApiKey`](crate::error::WizardError::MissingApiKey) without credentials
    /// - [`WizardError::Timeout`](crate::error::WizardError::Timeout) when the configured timeout elapses
    /// - [`WizardError::LlmApi`](crate::error::WizardError::LlmApi) for non-2xx responses
    /// - [`WizardError::Llm`](crate::error::WizardError::Llm) for empty or undecodable completions
    async fn send_prompt(&self, prompt: &str, params: SamplingParams) -> Result<String>;

    /// Provider name for logs.
    fn name(&self) -> &str;

    /// Model identifier; part of the grouping cache fingerprint.
    fn model(&self) -> &str;
}
