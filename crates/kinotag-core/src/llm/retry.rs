//! Retry wrapper for LLM providers.

use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use super::provider::{CompletionRequest, CompletionResponse, LlmProvider};
use crate::{Error, Result};

/// Wraps an LLM provider with exponential-backoff retry.
///
/// Only errors reporting [`Error::is_retryable`] are repeated: rate limits
/// and transport failures, never malformed responses or auth problems.
pub struct RetryWrapper {
    inner: Arc<dyn LlmProvider>,
    max_attempts: u32,
    initial_delay: Duration,
    max_delay: Duration,
}

impl RetryWrapper {
    /// Wrap a provider with the default policy: 3 attempts, 1s initial
    /// delay, 10s cap, exponential backoff.
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            inner: provider,
            max_attempts: 3,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(10),
        }
    }

    /// Set the maximum number of attempts.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the initial delay between retries.
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Set the maximum delay between retries.
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }
}

#[async_trait]
impl LlmProvider for RetryWrapper {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let backoff = ExponentialBuilder::default()
            .with_min_delay(self.initial_delay)
            .with_max_delay(self.max_delay)
            .with_max_times(self.max_attempts as usize);

        let provider = self.inner.clone();
        let request_clone = request.clone();

        (|| async { provider.complete(request_clone.clone()).await })
            .retry(backoff)
            .when(Error::is_retryable)
            .notify(|err: &Error, dur: Duration| {
                warn!(error = %err, backoff = ?dur, "retrying oracle call");
            })
            .await
    }
}
