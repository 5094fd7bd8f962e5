//! Error types for Kinotag operations.
//!
//! This module provides the common `Error` type and `Result<T>` alias used
//! across all Kinotag crates. Uses `thiserror` for derive macros.
//!
//! Two failure classes matter to callers: oracle errors carry a `retryable`
//! flag consumed by the provider-level retry wrapper, and storage errors are
//! always fatal to the operation that hit them.

use thiserror::Error;

/// Boxed error source attached to oracle and storage failures.
type Source = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur in Kinotag operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Vocabulary construction error (duplicate or empty tags).
    #[error("vocabulary error: {0}")]
    Vocabulary(String),

    /// Two bitmasks (or a bitmask and the vocabulary) disagree on width.
    #[error("bitmask width mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Width the operation required.
        expected: usize,
        /// Width actually supplied.
        actual: usize,
    },

    /// A caller-supplied argument is out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The classification oracle failed.
    #[error("oracle error: {message}")]
    Oracle {
        /// Human-readable failure description.
        message: String,
        /// Whether the retry wrapper should attempt the call again.
        retryable: bool,
        /// Underlying cause, when one exists.
        #[source]
        source: Option<Source>,
    },

    /// The durable store failed (connectivity or schema).
    #[error("storage error: {message}")]
    Storage {
        /// Human-readable failure description.
        message: String,
        /// Underlying cause, when one exists.
        #[source]
        source: Option<Source>,
    },
}

impl Error {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a vocabulary error.
    pub fn vocabulary(msg: impl Into<String>) -> Self {
        Self::Vocabulary(msg.into())
    }

    /// Create an invalid-argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a terminal oracle error (the call is not worth repeating).
    pub fn oracle(msg: impl Into<String>) -> Self {
        Self::Oracle {
            message: msg.into(),
            retryable: false,
            source: None,
        }
    }

    /// Create a transient oracle error (rate limit, overload).
    pub fn oracle_transient(msg: impl Into<String>) -> Self {
        Self::Oracle {
            message: msg.into(),
            retryable: true,
            source: None,
        }
    }

    /// Create a transient oracle error from a transport failure.
    pub fn oracle_transport(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Oracle {
            message: msg.into(),
            retryable: true,
            source: Some(Box::new(source)),
        }
    }

    /// Create a storage error.
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a storage error with an underlying cause.
    pub fn storage_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Storage {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Whether a retry of the failed call could reasonably succeed.
    ///
    /// Only transient oracle failures qualify; everything else is either a
    /// programming error or a condition a retry cannot fix.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Oracle {
                retryable: true,
                ..
            }
        )
    }
}

/// Result type alias using Kinotag's Error type.
pub type Result<T> = std::result::Result<T, Error>;
