//! Batch enrichment under bounded concurrency.
//!
//! The engine fans a batch of movies out to the oracle with at most
//! `max_concurrency` classification calls in flight. The bound is a
//! correctness requirement, not a tuning knob: the oracle is rate- and
//! cost-constrained, and unbounded fan-out trips its throttling.
//!
//! Each result is recorded against the item's submission index in a
//! pre-sized buffer, so the output sequence always matches the input
//! sequence position for position, whatever order completions arrive in.
//! A failed item occupies its slot as [`TagOutcome::Failed`] and never
//! disturbs its siblings.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures::stream::{self, StreamExt};
use kinotag_core::{Result, TagVocabulary};
use tracing::{debug, info, warn};

use crate::oracle::{MovieSeed, TagOracle};

/// Default cap on concurrently in-flight classification calls.
pub const DEFAULT_MAX_CONCURRENCY: usize = 10;

/// Default completion interval between progress log lines.
const DEFAULT_PROGRESS_EVERY: usize = 10;

/// Accepted tag-count range for a candidate line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagPolicy {
    /// Minimum accepted tag count.
    pub min_tags: usize,
    /// Maximum accepted tag count.
    pub max_tags: usize,
}

impl Default for TagPolicy {
    fn default() -> Self {
        Self {
            min_tags: 5,
            max_tags: 10,
        }
    }
}

/// One slot of a batch result: a validated tag list, or the failure marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagOutcome {
    /// The item produced a usable tag list.
    Tagged(Vec<String>),
    /// Classification could not be completed for this item.
    Failed,
}

impl TagOutcome {
    /// The tag list, or `None` for the failure marker.
    pub fn tags(&self) -> Option<&[String]> {
        match self {
            Self::Tagged(tags) => Some(tags),
            Self::Failed => None,
        }
    }

    /// Whether this slot holds the failure marker.
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }
}

/// Split a comma-separated oracle answer into candidate tags.
///
/// Trims whitespace around each candidate and drops empty fragments; no
/// other normalisation happens here.
pub fn parse_tag_line(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Ordered, failure-isolating batch tag extraction.
pub struct EnrichmentEngine {
    oracle: Arc<dyn TagOracle>,
    vocabulary: Arc<TagVocabulary>,
    policy: TagPolicy,
    max_concurrency: usize,
    progress_every: usize,
}

impl EnrichmentEngine {
    /// Create an engine with default policy and concurrency.
    pub fn new(oracle: Arc<dyn TagOracle>, vocabulary: Arc<TagVocabulary>) -> Self {
        Self {
            oracle,
            vocabulary,
            policy: TagPolicy::default(),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            progress_every: DEFAULT_PROGRESS_EVERY,
        }
    }

    /// Set the accepted tag-count range.
    pub fn with_policy(mut self, policy: TagPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Cap concurrently in-flight oracle calls. A cap of 0 is clamped to 1.
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    /// Log progress every `every` completions. 0 is clamped to 1.
    pub fn with_progress_every(mut self, every: usize) -> Self {
        self.progress_every = every.max(1);
        self
    }

    /// Enrich a batch: one outcome per seed, in seed order.
    ///
    /// The output always has the same length as the input; callers must
    /// inspect each slot for [`TagOutcome::Failed`] before using its tags.
    /// Oracle failures never abort the batch.
    pub async fn enrich(&self, seeds: &[MovieSeed]) -> Vec<TagOutcome> {
        let total = seeds.len();
        if total == 0 {
            return Vec::new();
        }
        info!(
            total,
            max_concurrency = self.max_concurrency,
            "starting enrichment batch"
        );

        let completed = AtomicUsize::new(0);
        let indexed: Vec<(usize, TagOutcome)> = stream::iter(seeds.iter().enumerate())
            .map(|(index, seed)| {
                let completed = &completed;
                async move {
                    let outcome = self.enrich_one(seed).await;
                    let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                    if done % self.progress_every == 0 || done == total {
                        info!(done, total, "enrichment progress");
                    }
                    (index, outcome)
                }
            })
            .buffer_unordered(self.max_concurrency)
            .collect()
            .await;

        // Completion order is nondeterministic under concurrency; the
        // submission index is the only ordering that may reach the caller.
        let mut outcomes: Vec<TagOutcome> = vec![TagOutcome::Failed; total];
        for (index, outcome) in indexed {
            outcomes[index] = outcome;
        }

        let failed = outcomes.iter().filter(|o| o.is_failed()).count();
        if failed > 0 {
            warn!(failed, total, "enrichment batch finished with failures");
        } else {
            info!(total, "enrichment batch finished");
        }
        outcomes
    }

    /// Rephrase free-form user text as a candidate tag list.
    ///
    /// Unknown words in the answer are tolerated; the codec drops them at
    /// encoding time.
    pub async fn interpret_query(&self, text: &str) -> Result<Vec<String>> {
        let line = self.oracle.interpret(text).await?;
        Ok(parse_tag_line(&line))
    }

    async fn enrich_one(&self, seed: &MovieSeed) -> TagOutcome {
        let raw = match self.oracle.classify(seed).await {
            Ok(raw) => raw,
            Err(err) => {
                warn!(
                    title = %seed.title,
                    year = seed.year,
                    error = %err,
                    "classification failed"
                );
                return TagOutcome::Failed;
            }
        };

        let candidates = parse_tag_line(&raw);
        if self.is_acceptable(&candidates) {
            return TagOutcome::Tagged(candidates);
        }

        debug!(title = %seed.title, raw = %raw, "candidate line rejected, repairing");
        match self.oracle.repair(&raw).await {
            // The repair contract guarantees dictionary-only words in range,
            // so its answer is accepted without re-validation.
            Ok(fixed) => TagOutcome::Tagged(parse_tag_line(&fixed)),
            Err(err) => {
                warn!(
                    title = %seed.title,
                    year = seed.year,
                    error = %err,
                    "repair failed"
                );
                TagOutcome::Failed
            }
        }
    }

    fn is_acceptable(&self, candidates: &[String]) -> bool {
        candidates.len() >= self.policy.min_tags
            && candidates.len() <= self.policy.max_tags
            && candidates.iter().all(|tag| self.vocabulary.contains(tag))
    }
}
