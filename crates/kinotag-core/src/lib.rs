//! Kinotag core — shared types for the tagging and retrieval system.
//!
//! This crate provides the foundational pieces used across all Kinotag
//! crates. It has no internal Kinotag dependencies (dependency level 0).
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`vocab`]: The fixed controlled vocabulary of movie descriptors
//! - [`bitmask`]: Fixed-width tag bitmasks and bitwise overlap
//! - [`llm`]: LLM provider abstraction and implementations

#![doc = include_str!("../README.md")]

pub mod bitmask;
pub mod error;
pub mod llm;
pub mod vocab;

// Re-export key types at crate root for convenience
pub use bitmask::TagBitmask;
pub use error::{Error, Result};
pub use vocab::TagVocabulary;
