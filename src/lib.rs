//! # email-sink
//!
//! Batch sink that turns a stream of records into a comma-delimited file and
//! mails it as an attachment over an authenticated TLS SMTP session.
//!
//! ## Lifecycle
//!
//! A batch is driven by one caller:
//! - **construct** a writer from a row type and an [`EmailSinkConfig`]
//! - **write** any number of rows; each becomes one line in memory
//! - **close** once: the text is written to the artifact file, which is then
//!   attached to an email and sent synchronously
//!
//! Every failure is fatal for the batch and nothing is retried.
//!
//! ## Quick Start
//!
//! ```no_run
//! use email_sink::{EmailSinkConfig, EmailSinkWriter, FieldType, Row, RowType};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = EmailSinkConfig::from_json_str(r#"{
//!         "email_host": "smtp.example.com",
//!         "email_transport_protocol": "smtp",
//!         "email_smtp_auth": true,
//!         "email_from_address": "reports@example.com",
//!         "email_authorization_code": "app-password",
//!         "email_to_address": "ops@example.com",
//!         "email_message_headline": "Nightly export",
//!         "email_message_content": "see attached"
//!     }"#)?;
//!
//!     let row_type = RowType::from_pairs([
//!         ("name", FieldType::String),
//!         ("count", FieldType::Int),
//!     ]);
//!
//!     let mut writer = EmailSinkWriter::new(row_type, config)?;
//!     writer.write(&Row::new(vec!["a".into(), 1i64.into()]))?;
//!     writer.write(&Row::new(vec!["b".into(), 2i64.into()]))?;
//!     writer.close()?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Artifact file handling
pub mod artifact;
/// In-memory record encoding
pub mod buffer;
/// Configuration types
pub mod config;
/// Message construction and SMTP delivery
pub mod delivery;
/// Error types
pub mod error;
/// Connector entry point
pub mod sink;
/// Core types (rows, values, batch state)
pub mod types;
/// Per-batch writer
pub mod writer;

pub use buffer::RecordBuffer;
pub use config::{CsvQuoting, EmailSinkConfig, SmtpSecurity};
pub use delivery::{DeliveryEngine, Relay, SmtpRelay};
pub use error::{ArtifactWriteError, DeliveryError, Error, RecordEncodingError, Result};
pub use sink::EmailSink;
pub use types::{BatchState, Field, FieldType, Row, RowType, Value};
pub use writer::{EmailSinkWriter, SinkWriter};
