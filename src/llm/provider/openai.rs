use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::base::send_llm_request;
use super::utils::{OPENAI_API_SUFFIX, complete_endpoint};
use crate::config::OpenAIConfig;
use crate::error::{Result, WizardError};
use crate::llm::{LLMProvider, SamplingParams};

/// OpenAI chat completions provider.
pub struct OpenAIProvider {
    client: Client,
    api_key: Option<String>,
    endpoint: String,
    model: String,
    timeout_ms: u64,
}

#[derive(Serialize)]
struct OpenAIRequest<'a> {
    model: &'a str,
    messages: Vec<MessagePayload<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct MessagePayload<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Deserialize)]
struct MessageContent {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAIProvider {
    /// Builds a provider from the OpenAI section of the config.
    ///
    /// A missing key is not an error here; every request fails with
    /// [`WizardError::MissingApiKey`] instead, so callers can surface it
    /// where it matters.
    pub fn new(config: &OpenAIConfig) -> Result<Self> {
        Ok(Self {
            client: super::create_http_client(config.timeout)?,
            api_key: config.api_key.clone(),
            endpoint: complete_endpoint(&config.base_url, OPENAI_API_SUFFIX),
            model: config.model.clone(),
            timeout_ms: config.timeout,
        })
    }
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    async fn send_prompt(&self, prompt: &str, params: SamplingParams) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(WizardError::MissingApiKey)?;

        let request = OpenAIRequest {
            model: &self.model,
            messages: vec![MessagePayload {
                role: "user",
                content: prompt,
            }],
            temperature: params.temperature,
            max_tokens: params.max_tokens,
        };

        tracing::debug!(
            "OpenAI API request: model={}, temperature={}, max_tokens={}, prompt={} chars",
            self.model,
            params.temperature,
            params.max_tokens,
            prompt.len()
        );

        let auth = format!("Bearer {}", api_key);
        let response: OpenAIResponse = send_llm_request(
            &self.client,
            &self.endpoint,
            &[("Authorization", auth.as_str())],
            &request,
            "OpenAI",
            self.timeout_ms,
        )
        .await?;

        let text = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(WizardError::EmptyResponse("OpenAI".to_string()));
        }

        Ok(text)
    }

    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn params() -> SamplingParams {
        SamplingParams {
            temperature: 0.7,
            max_tokens: 150,
        }
    }

    fn provider_for(server: &mockito::Server, api_key: Option<&str>) -> OpenAIProvider {
        super::super::ensure_crypto_provider();
        let config = OpenAIConfig {
            base_url: server.url(),
            api_key: api_key.map(str::to_string),
            timeout: 5_000,
            ..Default::default()
        };
        OpenAIProvider::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_send_prompt_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "model": "gpt-4o",
                "max_tokens": 150,
                "messages": [{"role": "user", "content": "hello"}]
            })))
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"  feat: add login \n"}}]}"#)
            .create_async()
            .await;

        let provider = provider_for(&server, Some("sk-test"));
        let text = provider.send_prompt("hello", params()).await.unwrap();

        assert_eq!(text, "feat: add login");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_send_prompt_api_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(401)
            .with_body(r#"{"error":{"message":"Incorrect API key provided"}}"#)
            .create_async()
            .await;

        let provider = provider_for(&server, Some("sk-bad"));
        let err = provider.send_prompt("hello", params()).await.unwrap_err();

        match err {
            WizardError::LlmApi { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Incorrect API key provided");
            }
            other => panic!("expected LlmApi, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_send_prompt_empty_completion() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"content":"   "}}]}"#)
            .create_async()
            .await;

        let provider = provider_for(&server, Some("sk-test"));
        let err = provider.send_prompt("hello", params()).await.unwrap_err();
        assert!(matches!(err, WizardError::EmptyResponse(_)));
    }

    #[tokio::test]
    async fn test_send_prompt_without_key_skips_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .expect(0)
            .create_async()
            .await;

        let provider = provider_for(&server, None);
        let err = provider.send_prompt("hello", params()).await.unwrap_err();

        assert!(matches!(err, WizardError::MissingApiKey));
        mock.assert_async().await;
    }

    #[test]
    fn test_model_and_name() {
        super::super::ensure_crypto_provider();
        let provider = OpenAIProvider::new(&OpenAIConfig {
            model: "gpt-4o-mini".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(provider.model(), "gpt-4o-mini");
        assert_eq!(provider.name(), "openai");
    }
}
