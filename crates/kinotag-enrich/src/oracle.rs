//! The tag oracle seam.
//!
//! [`TagOracle`] is the engine's only view of the outside world: one call
//! that classifies a movie into candidate tags, one that repairs a rejected
//! candidate line, and one that rephrases arbitrary user text as dictionary
//! words. The production implementation drives an [`LlmProvider`]; tests
//! substitute scripted implementations.

use std::sync::Arc;

use async_trait::async_trait;
use kinotag_core::llm::{CompletionRequest, LlmProvider, Message, StopReason};
use kinotag_core::{Result, TagVocabulary};
use tracing::warn;

use crate::engine::TagPolicy;
use crate::prompts;

/// Classification input for one movie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieSeed {
    /// Primary title.
    pub title: String,
    /// Release year.
    pub year: i32,
}

impl MovieSeed {
    /// Create a seed.
    pub fn new(title: impl Into<String>, year: i32) -> Self {
        Self {
            title: title.into(),
            year,
        }
    }
}

/// External classification service producing comma-separated tag lines.
///
/// Implementations may fail transiently; callers treat every error as a
/// per-item condition, never a batch-level one. Retry policy belongs behind
/// this seam (see `RetryWrapper` in the provider layer), not in front of it.
#[async_trait]
pub trait TagOracle: Send + Sync {
    /// Classify one movie into a candidate tag line.
    async fn classify(&self, seed: &MovieSeed) -> Result<String>;

    /// Repair a rejected candidate line into a vocabulary-only line.
    ///
    /// The output is trusted: implementations guarantee dictionary-only
    /// words within the configured count range.
    async fn repair(&self, raw: &str) -> Result<String>;

    /// Rephrase arbitrary user text as a dictionary tag line.
    async fn interpret(&self, text: &str) -> Result<String>;
}

/// [`TagOracle`] backed by an LLM provider.
///
/// Prompts are rendered once at construction from the injected vocabulary
/// and policy; every call runs at temperature 0 and expects a single short
/// line back.
pub struct LlmTagOracle {
    provider: Arc<dyn LlmProvider>,
    classify_system: String,
    repair_system: String,
    interpret_system: String,
    policy: TagPolicy,
    max_tokens: u32,
}

impl LlmTagOracle {
    /// Create an oracle over `provider` for `vocabulary`.
    pub fn new(provider: Arc<dyn LlmProvider>, vocabulary: &TagVocabulary) -> Self {
        Self::with_policy(provider, vocabulary, TagPolicy::default())
    }

    /// Create an oracle with an explicit tag-count policy.
    pub fn with_policy(
        provider: Arc<dyn LlmProvider>,
        vocabulary: &TagVocabulary,
        policy: TagPolicy,
    ) -> Self {
        Self {
            provider,
            classify_system: prompts::classify_system(vocabulary),
            repair_system: prompts::repair_system(vocabulary, &policy),
            interpret_system: prompts::interpret_system(vocabulary),
            policy,
            max_tokens: 256,
        }
    }

    async fn one_line(&self, system: &str, user: String) -> Result<String> {
        let request = CompletionRequest::new(vec![Message::user(user)])
            .with_system_prompt(system)
            .with_max_tokens(self.max_tokens)
            .with_temperature(0.0);

        let response = self.provider.complete(request).await?;
        if response.stop_reason == StopReason::MaxTokens {
            // A truncated line would validate as a short-but-wrong tag set;
            // flag it rather than silently passing it downstream.
            warn!("oracle answer truncated at {} tokens", self.max_tokens);
        }
        Ok(response.content.trim().to_string())
    }
}

#[async_trait]
impl TagOracle for LlmTagOracle {
    async fn classify(&self, seed: &MovieSeed) -> Result<String> {
        let user = prompts::classify_user(&seed.title, seed.year, &self.policy);
        self.one_line(&self.classify_system, user).await
    }

    async fn repair(&self, raw: &str) -> Result<String> {
        self.one_line(&self.repair_system, prompts::repair_user(raw))
            .await
    }

    async fn interpret(&self, text: &str) -> Result<String> {
        let user = prompts::interpret_user(text, &self.policy);
        self.one_line(&self.interpret_system, user).await
    }
}
