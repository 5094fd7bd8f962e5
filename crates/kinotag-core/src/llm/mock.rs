//! Mock LLM provider for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::provider::{
    CompletionRequest, CompletionResponse, LlmProvider, StopReason, TokenUsage,
};
use crate::{Error, Result};

/// One scripted step of a [`MockLlmProvider`].
#[derive(Debug, Clone)]
pub enum MockStep {
    /// Return this content successfully.
    Reply(String),
    /// Fail with a retryable oracle error.
    TransientError(String),
    /// Fail with a terminal oracle error.
    TerminalError(String),
}

/// Mock LLM provider that plays back a script of replies and failures.
///
/// Steps are consumed in order and cycle once exhausted, so a single-step
/// script behaves as a constant provider. Useful for testing retry and
/// enrichment behavior without real API calls.
#[derive(Clone)]
pub struct MockLlmProvider {
    state: Arc<Mutex<ScriptState>>,
}

struct ScriptState {
    script: Vec<MockStep>,
    index: usize,
    calls: usize,
}

impl MockLlmProvider {
    /// Create a mock that plays back `script`, cycling when exhausted.
    pub fn with_script(script: Vec<MockStep>) -> Self {
        Self {
            state: Arc::new(Mutex::new(ScriptState {
                script,
                index: 0,
                calls: 0,
            })),
        }
    }

    /// Create a mock that always replies with `response`.
    pub fn with_response(response: impl Into<String>) -> Self {
        Self::with_script(vec![MockStep::Reply(response.into())])
    }

    /// Create a mock that cycles through `responses` in order.
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self::with_script(responses.into_iter().map(MockStep::Reply).collect())
    }

    /// Number of completions requested so far.
    pub async fn calls(&self) -> usize {
        self.state.lock().await.calls
    }
}

#[async_trait]
impl LlmProvider for MockLlmProvider {
    async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse> {
        let mut state = self.state.lock().await;
        state.calls += 1;

        if state.script.is_empty() {
            return Err(Error::oracle("mock script is empty"));
        }

        let step = state.script[state.index].clone();
        state.index = (state.index + 1) % state.script.len();
        drop(state);

        match step {
            MockStep::Reply(content) => Ok(CompletionResponse {
                content,
                tokens_used: TokenUsage {
                    input: 10,
                    output: 20,
                },
                stop_reason: StopReason::EndTurn,
            }),
            MockStep::TransientError(msg) => Err(Error::oracle_transient(msg)),
            MockStep::TerminalError(msg) => Err(Error::oracle(msg)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::llm::Message;

    fn request() -> CompletionRequest {
        CompletionRequest::new(vec![Message::user("test")])
    }

    #[tokio::test]
    async fn test_mock_provider_single_response() {
        let provider = MockLlmProvider::with_response("tense, gritty");
        let response = provider.complete(request()).await.unwrap();
        assert_eq!(response.content, "tense, gritty");
    }

    #[tokio::test]
    async fn test_mock_provider_cycles_responses() {
        let provider = MockLlmProvider::with_responses(vec![
            "first".to_string(),
            "second".to_string(),
        ]);

        assert_eq!(provider.complete(request()).await.unwrap().content, "first");
        assert_eq!(
            provider.complete(request()).await.unwrap().content,
            "second"
        );
        // Cycles back
        assert_eq!(provider.complete(request()).await.unwrap().content, "first");
        assert_eq!(provider.calls().await, 3);
    }

    #[tokio::test]
    async fn test_mock_provider_scripted_failure() {
        let provider = MockLlmProvider::with_script(vec![
            MockStep::TransientError("throttled".into()),
            MockStep::Reply("recovered".into()),
        ]);

        let err = provider.complete(request()).await.unwrap_err();
        assert!(err.is_retryable());
        let ok = provider.complete(request()).await.unwrap();
        assert_eq!(ok.content, "recovered");
    }

    #[tokio::test]
    async fn test_mock_provider_shared_state_across_clones() {
        let provider = MockLlmProvider::with_responses(vec![
            "one".to_string(),
            "two".to_string(),
        ]);
        let clone = provider.clone();

        provider.complete(request()).await.unwrap();
        let response = clone.complete(request()).await.unwrap();
        assert_eq!(response.content, "two");
    }
}
