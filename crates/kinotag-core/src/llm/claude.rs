//! Claude API provider implementation.

use async_trait::async_trait;
use tracing::debug;

use super::provider::{
    CompletionRequest, CompletionResponse, LlmProvider, StopReason, TokenUsage,
};
use crate::{Error, Result};

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";

/// LLM provider backed by Anthropic's Claude Messages API.
///
/// Rate-limit (429) and server (5xx) responses surface as retryable oracle
/// errors so the [`RetryWrapper`](super::RetryWrapper) can back off and
/// repeat them; every other failure is terminal for the call.
pub struct ClaudeProvider {
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl ClaudeProvider {
    /// Create a new Claude provider.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Anthropic API key
    /// * `model` - Model ID (e.g., "claude-sonnet-4-20250514")
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            client: reqwest::Client::new(),
        }
    }

    /// The model ID this provider calls.
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl LlmProvider for ClaudeProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let mut body = serde_json::json!({
            "model": self.model,
            "max_tokens": request.max_tokens,
            "messages": request.messages,
        });

        if let Some(system) = request.system_prompt {
            body["system"] = serde_json::json!(system);
        }

        if let Some(temp) = request.temperature {
            body["temperature"] = serde_json::json!(temp);
        }

        let response = self
            .client
            .post(MESSAGES_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::oracle_transport("failed to reach Claude API", e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            let message = format!("Claude API error {status}: {error_text}");
            // 429 and 5xx are worth repeating after a backoff; 4xx are not.
            return if status.as_u16() == 429 || status.is_server_error() {
                Err(Error::oracle_transient(message))
            } else {
                Err(Error::oracle(message))
            };
        }

        let response_body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Error::oracle_transport("failed to read Claude response", e))?;

        let content = response_body["content"][0]["text"]
            .as_str()
            .ok_or_else(|| Error::oracle("missing content in Claude response"))?
            .to_string();

        let usage = response_body["usage"]
            .as_object()
            .ok_or_else(|| Error::oracle("missing usage data in Claude response"))?;
        let input_tokens = usage["input_tokens"]
            .as_u64()
            .ok_or_else(|| Error::oracle("invalid input_tokens"))?;
        let output_tokens = usage["output_tokens"]
            .as_u64()
            .ok_or_else(|| Error::oracle("invalid output_tokens"))?;

        let stop_reason = match response_body["stop_reason"].as_str() {
            Some("end_turn") => StopReason::EndTurn,
            Some("max_tokens") => StopReason::MaxTokens,
            Some("stop_sequence") => StopReason::StopSequence,
            other => {
                return Err(Error::oracle(format!(
                    "unexpected stop reason: {other:?}"
                )));
            }
        };

        debug!(
            model = %self.model,
            input_tokens,
            output_tokens,
            "claude completion finished"
        );

        Ok(CompletionResponse {
            content,
            tokens_used: TokenUsage {
                input: input_tokens,
                output: output_tokens,
            },
            stop_reason,
        })
    }
}
