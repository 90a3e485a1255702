//! Connector entry point
//!
//! A host pipeline creates one [`EmailSink`] per job, hands it the row type
//! once it is known, and asks it for a writer per batch.

use crate::config::EmailSinkConfig;
use crate::delivery::{Relay, SmtpRelay};
use crate::error::{Error, Result};
use crate::types::RowType;
use crate::writer::EmailSinkWriter;
use std::path::Path;
use tracing::debug;

/// Plugin name under which the sink is registered by hosts
pub const PLUGIN_NAME: &str = "EmailSink";

/// Validated sink configuration plus the row type of its input
#[derive(Debug, Clone)]
pub struct EmailSink {
    config: EmailSinkConfig,
    row_type: Option<RowType>,
}

impl EmailSink {
    /// Validate `config` and create the sink
    pub fn prepare(config: EmailSinkConfig) -> Result<Self> {
        config.validate()?;
        debug!(
            host = %config.email_host,
            to = %config.email_to_address,
            artifact = ?config.artifact_path,
            "email sink prepared"
        );
        Ok(Self {
            config,
            row_type: None,
        })
    }

    /// Load, validate and create the sink from a JSON configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::prepare(EmailSinkConfig::from_file(path)?)
    }

    /// Plugin name
    pub fn plugin_name(&self) -> &'static str {
        PLUGIN_NAME
    }

    /// Record the row type of the incoming stream
    pub fn set_row_type(&mut self, row_type: RowType) {
        self.row_type = Some(row_type);
    }

    /// The row type, once set
    pub fn row_type(&self) -> Option<&RowType> {
        self.row_type.as_ref()
    }

    /// The validated configuration
    pub fn config(&self) -> &EmailSinkConfig {
        &self.config
    }

    fn require_row_type(&self) -> Result<RowType> {
        self.row_type.clone().ok_or_else(|| Error::Config {
            message: "row type must be set before creating a writer".to_string(),
            key: None,
        })
    }

    /// Create a writer delivering over SMTP
    pub fn create_writer(&self) -> Result<EmailSinkWriter<SmtpRelay>> {
        let row_type = self.require_row_type()?;
        let relay = SmtpRelay::from_config(&self.config);
        Ok(EmailSinkWriter::with_relay(
            row_type,
            self.config.clone(),
            relay,
        ))
    }

    /// Create a writer delivering through `relay`
    pub fn create_writer_with<R: Relay>(&self, relay: R) -> Result<EmailSinkWriter<R>> {
        let row_type = self.require_row_type()?;
        Ok(EmailSinkWriter::with_relay(
            row_type,
            self.config.clone(),
            relay,
        ))
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BatchState, FieldType};

    const CONFIG: &str = r#"{
        "email_host": "smtp.example.com",
        "email_transport_protocol": "smtps",
        "email_smtp_auth": false,
        "email_from_address": "reports@example.com",
        "email_authorization_code": "",
        "email_to_address": "ops@example.com",
        "email_message_headline": "Report",
        "email_message_content": "see attached"
    }"#;

    #[test]
    fn writer_requires_row_type() {
        let sink = EmailSink::prepare(EmailSinkConfig::from_json_str(CONFIG).unwrap()).unwrap();
        assert!(matches!(
            sink.create_writer(),
            Err(Error::Config { key: None, .. })
        ));
    }

    #[test]
    fn writer_starts_open_with_sink_row_type() {
        let mut sink =
            EmailSink::prepare(EmailSinkConfig::from_json_str(CONFIG).unwrap()).unwrap();
        sink.set_row_type(RowType::from_pairs([("id", FieldType::Int)]));

        let writer = sink.create_writer().unwrap();
        assert_eq!(writer.state(), BatchState::Open);
        assert_eq!(writer.relay().host(), "smtp.example.com");
        assert_eq!(sink.row_type().map(RowType::arity), Some(1));
        assert_eq!(sink.plugin_name(), "EmailSink");
    }

    #[test]
    fn prepare_rejects_invalid_config() {
        let mut config = EmailSinkConfig::from_json_str(CONFIG).unwrap();
        config.email_host.clear();
        assert!(matches!(
            EmailSink::prepare(config),
            Err(Error::Config { .. })
        ));
    }

    #[test]
    fn from_file_prepares_sink() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("sink.json");
        std::fs::write(&path, CONFIG).unwrap();

        let sink = EmailSink::from_file(&path).unwrap();
        assert_eq!(sink.config().email_transport_protocol, "smtps");
    }
}
