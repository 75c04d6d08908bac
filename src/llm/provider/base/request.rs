//! Sends one LLM API request and maps transport failures.
//!
//! No retries happen here; a failed request surfaces immediately and the
//! caller's retry policy decides whether to try again.

use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::response::truncate_for_preview;
use crate::error::{Result, WizardError};

/// Maps a reqwest send error onto the crate error.
fn map_send_error(e: reqwest::Error, provider_name: &str, timeout_ms: u64) -> WizardError {
    if e.is_timeout() {
        tracing::debug!("{} API request timed out: {}", provider_name, e);
        WizardError::Timeout(timeout_ms)
    } else if e.is_connect() {
        tracing::debug!("{} API connection failed: {}", provider_name, e);
        WizardError::Llm(format!("{provider_name} API connection failed: {e}"))
    } else {
        WizardError::Network(e)
    }
}

/// Pulls `error.message` out of an OpenAI-style error body.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                "unknown error".to_string()
            } else {
                truncate_for_preview(body)
            }
        })
}

/// POSTs `request_body` as JSON and decodes a successful response.
///
/// # Errors
/// - [`WizardError::Timeout`] when the client timeout elapses
/// - [`WizardError::LlmApi`] for non-2xx statuses, carrying the API message
/// - [`WizardError::Llm`] for connection failures and undecodable bodies
pub async fn send_llm_request<Req, Resp>(
    client: &Client,
    endpoint: &str,
    headers: &[(&str, &str)],
    request_body: &Req,
    provider_name: &str,
    timeout_ms: u64,
) -> Result<Resp>
where
    Req: Serialize,
    Resp: DeserializeOwned,
{
    let mut req = client
        .post(endpoint)
        .header("Content-Type", "application/json");
    for (key, value) in headers {
        req = req.header(*key, *value);
    }

    tracing::debug!("Sending request to: {}", endpoint);

    let response = req
        .json(request_body)
        .send()
        .await
        .map_err(|e| map_send_error(e, provider_name, timeout_ms))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| map_send_error(e, provider_name, timeout_ms))?;

    tracing::debug!("{} API response status: {}", provider_name, status);

    if !status.is_success() {
        return Err(WizardError::LlmApi {
            status: status.as_u16(),
            message: api_error_message(&body),
        });
    }

    serde_json::from_str(&body).map_err(|e| {
        WizardError::Llm(format!(
            "Failed to parse {} response: {}. Raw response: {}",
            provider_name,
            e,
            truncate_for_preview(&body)
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_api_error_message_from_json() {
        let body = r#"{"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}}"#;
        assert_eq!(api_error_message(body), "Incorrect API key provided");
    }

    #[test]
    fn test_api_error_message_plain_text() {
        assert_eq!(api_error_message("Bad Gateway"), "Bad Gateway");
        assert_eq!(api_error_message("  "), "unknown error");
    }
}
