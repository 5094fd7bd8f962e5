//! Kinotag enrichment — oracle-backed tag extraction.
//!
//! Given a batch of movies and a classification oracle, the engine produces
//! one validated tag list per movie, running oracle calls under bounded
//! concurrency, preserving input order in the output, and isolating per-item
//! failure behind a sentinel marker.

#![doc = include_str!("../README.md")]

pub mod engine;
pub mod oracle;
mod prompts;

pub use engine::{EnrichmentEngine, TagOutcome, TagPolicy, parse_tag_line};
pub use oracle::{LlmTagOracle, MovieSeed, TagOracle};
