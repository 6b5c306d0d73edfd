//! Error types for catalog fetching, storage and configuration.
//!
//! # Design
//! - Fetch failures carry the human-readable message shown in error blocks.
//! - Storage failures never leave [`crate::storage::PersistentStore`].

use thiserror::Error;

/// Failure surfaced by [`crate::fetch::FetchCache::fetch_data`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FetchError {
    /// Server answered with a non-2xx status.
    #[error("HTTP error! status: {status}")]
    Http {
        /// Status code returned by the server.
        status: u16,
    },
    /// Request could not be issued or the connection failed.
    #[error("Network request failed: {detail}")]
    Network {
        /// Transport-level detail.
        detail: String,
    },
    /// Body was not valid JSON.
    #[error("Invalid JSON response from server")]
    InvalidJson,
    /// Body decoded but had the wrong top-level shape.
    #[error("Expected {expected} data from server")]
    UnexpectedShape {
        /// Shape the caller asked for ("array" or "array or object").
        expected: &'static str,
    },
    /// Request exceeded the abort timeout.
    #[error("Request timed out")]
    TimedOut,
}

impl FetchError {
    /// Whether this failure came from the abort timeout.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::TimedOut)
    }
}

/// Failure reported by a [`crate::fetch::Transport`] before any response
/// arrived.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{detail}")]
pub struct TransportError {
    /// Transport-level detail.
    pub detail: String,
}

impl TransportError {
    /// Wrap a transport detail message.
    #[must_use]
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

impl From<TransportError> for FetchError {
    fn from(err: TransportError) -> Self {
        Self::Network { detail: err.detail }
    }
}

/// Failure reported by a [`crate::storage::KeyValueStore`] backend.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StorageError {
    /// Storage is disabled or not present in this environment.
    #[error("storage unavailable")]
    Unavailable,
    /// Write rejected because the origin quota is exhausted.
    #[error("storage quota exceeded for key {key}")]
    QuotaExceeded {
        /// Key being written.
        key: String,
    },
    /// Backend-specific failure.
    #[error("storage backend error: {detail}")]
    Backend {
        /// Backend detail.
        detail: String,
    },
}

/// Invalid configuration value.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Document could not be parsed.
    #[error("invalid configuration document: {detail}")]
    Parse {
        /// Parser detail.
        detail: String,
    },
    /// Field contained an invalid value.
    #[error("invalid configuration field {field}: {reason}")]
    InvalidField {
        /// Field that failed validation.
        field: &'static str,
        /// Machine-readable reason for the failure.
        reason: &'static str,
    },
}

/// Detail page could not be resolved.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum DetailError {
    /// Index parameter missing, malformed or out of range.
    #[error("Invalid {noun} ID. Please return to the home page.")]
    InvalidIndex {
        /// Item noun used in the message ("movie" or "season").
        noun: &'static str,
    },
}
