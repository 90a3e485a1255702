//! Test configuration helpers

use email_sink::{CsvQuoting, EmailSinkConfig, SmtpSecurity};
use std::path::Path;
use std::time::Duration;

/// Error type for test configuration
#[derive(Debug)]
pub struct ConfigError(pub String);

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Config error: {}", self.0)
    }
}

impl std::error::Error for ConfigError {}

/// Configuration with the artifact placed inside `dir`
pub fn test_config(dir: &Path) -> EmailSinkConfig {
    EmailSinkConfig {
        email_host: "h".to_string(),
        email_transport_protocol: "smtp".to_string(),
        email_smtp_auth: true,
        email_from_address: "f@x.example".to_string(),
        email_authorization_code: "s".to_string(),
        email_to_address: "t@y.example".to_string(),
        email_message_headline: "Report".to_string(),
        email_message_content: "see attached".to_string(),
        email_smtp_port: 465,
        email_security: SmtpSecurity::Tls,
        email_accept_invalid_certs: false,
        email_timeout_secs: Some(Duration::from_secs(5)),
        artifact_path: dir.join("emailsink.csv"),
        csv_quoting: CsvQuoting::None,
    }
}

/// Check if live relay credentials are available in the environment
pub fn has_live_credentials() -> bool {
    dotenvy::dotenv().ok();
    ["SMTP_HOST", "SMTP_FROM", "SMTP_PASSWORD", "SMTP_TO"]
        .iter()
        .all(|key| std::env::var(key).is_ok())
}

/// Load relay configuration from environment variables
///
/// Required environment variables:
/// - `SMTP_HOST` - Relay hostname
/// - `SMTP_FROM` - Sender address (also the login)
/// - `SMTP_PASSWORD` - Authorization code
/// - `SMTP_TO` - Recipient address
///
/// Optional environment variables:
/// - `SMTP_PORT` - Port (default: 465)
/// - `SMTP_SECURITY` - `tls` or `starttls` (default: tls)
pub fn load_live_config(dir: &Path) -> Result<EmailSinkConfig, ConfigError> {
    dotenvy::dotenv().ok();

    let var = |key: &str| {
        std::env::var(key).map_err(|_| ConfigError(format!("{key} not set in environment")))
    };

    let port: u16 = std::env::var("SMTP_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(465);

    let security = match std::env::var("SMTP_SECURITY").ok().as_deref() {
        Some("starttls") => SmtpSecurity::StartTls,
        _ => SmtpSecurity::Tls,
    };

    let mut config = test_config(dir);
    config.email_host = var("SMTP_HOST")?;
    config.email_from_address = var("SMTP_FROM")?;
    config.email_authorization_code = var("SMTP_PASSWORD")?;
    config.email_to_address = var("SMTP_TO")?;
    config.email_message_headline = "email-sink live test".to_string();
    config.email_smtp_port = port;
    config.email_security = security;
    config.email_timeout_secs = Some(Duration::from_secs(30));
    Ok(config)
}
