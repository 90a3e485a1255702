//! Configuration types for email-sink
//!
//! The option keys match the connector's original configuration names so that
//! existing job definitions deserialize unchanged.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{path::Path, path::PathBuf, time::Duration};

/// Default artifact file name
pub const DEFAULT_ARTIFACT_PATH: &str = "emailsink.csv";

/// Default port for implicit-TLS SMTP submission
pub const DEFAULT_SMTPS_PORT: u16 = 465;

/// How the SMTP session is secured
///
/// TLS is always forced; this only picks how it is negotiated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmtpSecurity {
    /// TLS from the first byte (SMTPS)
    #[default]
    Tls,
    /// Plain connect, then mandatory STARTTLS upgrade
    StartTls,
}

/// Field quoting applied when encoding records
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CsvQuoting {
    /// Fields are written verbatim, delimiters inside values are not escaped
    #[default]
    None,
    /// Fields containing `,`, `"`, CR or LF are quoted, with `"` doubled
    Rfc4180,
}

/// Mail session and artifact configuration
///
/// Immutable once handed to a writer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailSinkConfig {
    /// SMTP relay hostname
    pub email_host: String,

    /// Transport protocol name ("smtp" or "smtps")
    pub email_transport_protocol: String,

    /// Whether to authenticate with the relay
    pub email_smtp_auth: bool,

    /// Sender address, also used as the SMTP login
    pub email_from_address: String,

    /// Authorization code or password for the sender account
    pub email_authorization_code: String,

    /// Single recipient address
    pub email_to_address: String,

    /// Subject line
    pub email_message_headline: String,

    /// Plain-text body
    pub email_message_content: String,

    /// Relay port (default: 465)
    #[serde(default = "default_port")]
    pub email_smtp_port: u16,

    /// TLS negotiation mode (default: implicit TLS)
    #[serde(default)]
    pub email_security: SmtpSecurity,

    /// Accept any server certificate and hostname (default: false)
    ///
    /// Disables certificate validation entirely. Only for relays with
    /// self-signed certificates on trusted networks.
    #[serde(default)]
    pub email_accept_invalid_certs: bool,

    /// Connection and command timeout in seconds (None = transport default)
    #[serde(
        default,
        with = "optional_duration_serde",
        skip_serializing_if = "Option::is_none"
    )]
    pub email_timeout_secs: Option<Duration>,

    /// Where the artifact is written; its file name is the attachment name
    #[serde(default = "default_artifact_path")]
    pub artifact_path: PathBuf,

    /// Quoting mode for field values (default: none)
    #[serde(default)]
    pub csv_quoting: CsvQuoting,
}

impl EmailSinkConfig {
    /// Parse a configuration from JSON
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Read and parse a JSON configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&contents)
    }

    /// Check that required options are present and usable
    ///
    /// Returns the first problem found, naming the offending key.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("email_host", &self.email_host),
            ("email_transport_protocol", &self.email_transport_protocol),
            ("email_from_address", &self.email_from_address),
            ("email_to_address", &self.email_to_address),
            ("email_message_headline", &self.email_message_headline),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(Error::config(key, format!("{key} must not be empty")));
            }
        }

        if self.email_smtp_auth && self.email_authorization_code.is_empty() {
            return Err(Error::config(
                "email_authorization_code",
                "email_authorization_code is required when email_smtp_auth is true",
            ));
        }

        if !matches!(
            self.email_transport_protocol.to_ascii_lowercase().as_str(),
            "smtp" | "smtps"
        ) {
            return Err(Error::config(
                "email_transport_protocol",
                format!(
                    "unsupported transport protocol {:?} (expected smtp or smtps)",
                    self.email_transport_protocol
                ),
            ));
        }

        if self.email_smtp_port == 0 {
            return Err(Error::config(
                "email_smtp_port",
                "email_smtp_port must be non-zero",
            ));
        }

        if self.artifact_path.file_name().is_none() {
            return Err(Error::config(
                "artifact_path",
                format!("{} has no file name", self.artifact_path.display()),
            ));
        }

        Ok(())
    }

    /// The attachment display name, taken from the artifact path
    pub fn artifact_file_name(&self) -> Option<String> {
        self.artifact_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
    }
}

fn default_port() -> u16 {
    DEFAULT_SMTPS_PORT
}

fn default_artifact_path() -> PathBuf {
    PathBuf::from(DEFAULT_ARTIFACT_PATH)
}

// Optional Duration serialization helper
mod optional_duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => serializer.serialize_some(&d.as_secs()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = Option::<u64>::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}
