//! Error types for email-sink
//!
//! This module provides the error handling for the library:
//! - A crate-wide [`Error`] with a [`Result`] alias
//! - Focused error types for each pipeline stage (encoding, artifact, delivery)
//! - Machine-readable error codes for hosts that report failures by code

use crate::types::BatchState;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for email-sink operations
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed transport error, so any [`Relay`](crate::delivery::Relay) can report its own fault type
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type for email-sink
///
/// Every variant is fatal for the batch that produced it. Nothing is retried.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "email_host")
        key: Option<String>,
    },

    /// A record could not be encoded into a line
    #[error("record encoding error: {0}")]
    RecordEncoding(#[from] RecordEncodingError),

    /// The artifact could not be written or read back
    #[error("artifact error: {0}")]
    Artifact(#[from] ArtifactWriteError),

    /// The email could not be built or transmitted
    #[error("delivery error: {0}")]
    Delivery(#[from] DeliveryError),

    /// The batch already reached a terminal state
    #[error("batch is {state}: no further operations permitted")]
    BatchClosed {
        /// The terminal state the batch is in
        state: BatchState,
    },

    /// Configuration file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be parsed
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a configuration error pointing at a specific key
    pub fn config(key: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.into()),
        }
    }

    /// Machine-readable error code
    ///
    /// Hosts that fail a whole job on sink errors can use this to classify the
    /// failure without matching on display strings.
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Config { .. } => "config_error",
            Error::RecordEncoding(_) => "record_encoding_error",
            Error::Artifact(_) => "artifact_write_error",
            Error::Delivery(DeliveryError::InvalidAddress { .. }) => "invalid_address",
            Error::Delivery(_) => "delivery_error",
            Error::BatchClosed { .. } => "batch_closed",
            Error::Io(_) => "io_error",
            Error::Serialization(_) => "serialization_error",
        }
    }
}

/// Record encoding errors
#[derive(Debug, Error)]
pub enum RecordEncodingError {
    /// Field count differs from the row type arity
    #[error("record has {actual} fields but row type declares {expected}")]
    ArityMismatch {
        /// Arity declared by the row type
        expected: usize,
        /// Field count of the rejected record
        actual: usize,
    },

    /// A field has no text representation
    #[error("field {index} ({name}) is null and has no text representation")]
    NullField {
        /// Zero-based field position
        index: usize,
        /// Field name from the row type
        name: String,
    },
}

/// Artifact materialization errors
#[derive(Debug, Error)]
pub enum ArtifactWriteError {
    /// Creating, truncating or writing the artifact failed
    #[error("failed to write artifact {path}: {source}")]
    Write {
        /// The artifact path
        path: PathBuf,
        /// Underlying filesystem error
        source: std::io::Error,
    },

    /// Reading the artifact back for attachment failed
    #[error("failed to read artifact {path}: {source}")]
    Read {
        /// The artifact path
        path: PathBuf,
        /// Underlying filesystem error
        source: std::io::Error,
    },

    /// The artifact path has no usable file name
    #[error("artifact path {path} has no file name")]
    NoFileName {
        /// The offending path
        path: PathBuf,
    },
}

/// Delivery errors (message construction and SMTP transport)
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// A configured address is not a valid mailbox
    #[error("invalid {field} address {address:?}")]
    InvalidAddress {
        /// Which address was invalid ("from" or "to")
        field: &'static str,
        /// The rejected address
        address: String,
    },

    /// The MIME message could not be assembled
    #[error("failed to build message: {0}")]
    Build(String),

    /// The transport session could not be configured (TLS parameters, etc.)
    #[error("failed to set up session with {relay}: {source}")]
    Session {
        /// Relay host
        relay: String,
        /// Underlying transport error
        source: BoxError,
    },

    /// Sending failed (connect, TLS handshake, auth or relay rejection)
    #[error("failed to send email via {relay}: {source}")]
    Transport {
        /// Relay host
        relay: String,
        /// Underlying transport error
        source: BoxError,
    },
}
