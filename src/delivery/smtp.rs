//! SMTP relay session
//!
//! A fresh transport is built for every send and dropped afterwards, so no
//! connection outlives the batch that opened it.

use super::Relay;
use crate::config::{EmailSinkConfig, SmtpSecurity};
use crate::error::DeliveryError;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{Message, SmtpTransport, Transport};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Supplies the SMTP login when a session is built
type CredentialSource = Box<dyn Fn() -> Credentials + Send + Sync>;

/// TLS-secured, optionally authenticated SMTP relay
pub struct SmtpRelay {
    host: String,
    port: u16,
    security: SmtpSecurity,
    accept_invalid_certs: bool,
    timeout: Option<Duration>,
    credentials: Option<CredentialSource>,
}

impl SmtpRelay {
    /// Create a relay from the sink configuration
    ///
    /// When `email_smtp_auth` is set, the sender address and authorization code
    /// are captured as the login pair.
    pub fn from_config(config: &EmailSinkConfig) -> Self {
        let credentials: Option<CredentialSource> = if config.email_smtp_auth {
            let user = config.email_from_address.clone();
            let secret = config.email_authorization_code.clone();
            Some(Box::new(move || Credentials::new(user.clone(), secret.clone())))
        } else {
            None
        };

        Self {
            host: config.email_host.clone(),
            port: config.email_smtp_port,
            security: config.email_security,
            accept_invalid_certs: config.email_accept_invalid_certs,
            timeout: config.email_timeout_secs,
            credentials,
        }
    }

    /// Relay host
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Relay port
    pub fn port(&self) -> u16 {
        self.port
    }

    fn session_error(&self, e: lettre::transport::smtp::Error) -> DeliveryError {
        DeliveryError::Session {
            relay: self.host.clone(),
            source: Box::new(e),
        }
    }

    /// Build the transport for one session
    fn transport(&self) -> Result<SmtpTransport, DeliveryError> {
        if self.accept_invalid_certs {
            warn!(
                host = %self.host,
                "server certificate validation disabled for SMTP relay"
            );
        }

        let tls_parameters = TlsParameters::builder(self.host.clone())
            .dangerous_accept_invalid_certs(self.accept_invalid_certs)
            .dangerous_accept_invalid_hostnames(self.accept_invalid_certs)
            .build()
            .map_err(|e| self.session_error(e))?;

        let tls = match self.security {
            SmtpSecurity::Tls => Tls::Wrapper(tls_parameters),
            SmtpSecurity::StartTls => Tls::Required(tls_parameters),
        };

        let mut builder = SmtpTransport::builder_dangerous(&self.host)
            .port(self.port)
            .tls(tls);

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(Some(timeout));
        }

        if let Some(credentials) = &self.credentials {
            builder = builder.credentials(credentials());
        }

        debug!(
            host = %self.host,
            port = self.port,
            security = ?self.security,
            auth = self.credentials.is_some(),
            "SMTP session configured"
        );

        Ok(builder.build())
    }
}

impl std::fmt::Debug for SmtpRelay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpRelay")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("security", &self.security)
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .field("timeout", &self.timeout)
            .field("auth", &self.credentials.is_some())
            .finish()
    }
}

impl Relay for SmtpRelay {
    fn send(&self, message: &Message) -> Result<(), DeliveryError> {
        let transport = self.transport()?;

        match transport.send(message) {
            Ok(response) => {
                info!(
                    host = %self.host,
                    code = %response.code(),
                    "relay accepted message"
                );
                Ok(())
            }
            Err(e) => {
                warn!(host = %self.host, port = self.port, error = %e, "SMTP send failed");
                Err(DeliveryError::Transport {
                    relay: self.host.clone(),
                    source: Box::new(e),
                })
            }
        }
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CsvQuoting;
    use lettre::message::header::ContentType;
    use std::net::TcpListener;
    use std::path::PathBuf;

    fn config(port: u16) -> EmailSinkConfig {
        EmailSinkConfig {
            email_host: "127.0.0.1".into(),
            email_transport_protocol: "smtp".into(),
            email_smtp_auth: true,
            email_from_address: "reports@example.com".into(),
            email_authorization_code: "s3cret".into(),
            email_to_address: "ops@example.com".into(),
            email_message_headline: "Report".into(),
            email_message_content: "see attached".into(),
            email_smtp_port: port,
            email_security: SmtpSecurity::Tls,
            email_accept_invalid_certs: false,
            email_timeout_secs: Some(Duration::from_secs(5)),
            artifact_path: PathBuf::from("emailsink.csv"),
            csv_quoting: CsvQuoting::None,
        }
    }

    /// A local port with nothing listening on it
    fn closed_port() -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    }

    fn message() -> Message {
        Message::builder()
            .from("reports@example.com".parse().unwrap())
            .to("ops@example.com".parse().unwrap())
            .subject("Report")
            .header(ContentType::TEXT_PLAIN)
            .body(String::from("body"))
            .unwrap()
    }

    #[test]
    fn credentials_follow_auth_flag() {
        let relay = SmtpRelay::from_config(&config(465));
        assert!(relay.credentials.is_some());

        let mut no_auth = config(465);
        no_auth.email_smtp_auth = false;
        assert!(SmtpRelay::from_config(&no_auth).credentials.is_none());
    }

    #[test]
    fn transport_builds_without_connecting() {
        let mut config = config(closed_port());
        config.email_accept_invalid_certs = true;
        config.email_security = SmtpSecurity::StartTls;

        let relay = SmtpRelay::from_config(&config);
        assert!(relay.transport().is_ok());
        assert_eq!(relay.host(), "127.0.0.1");
    }

    #[test]
    fn unreachable_relay_is_a_transport_error() {
        let relay = SmtpRelay::from_config(&config(closed_port()));

        match relay.send(&message()).unwrap_err() {
            DeliveryError::Transport { relay, .. } => assert_eq!(relay, "127.0.0.1"),
            other => panic!("expected Transport error, got {other:?}"),
        }
    }

    #[test]
    fn debug_output_hides_secret() {
        let relay = SmtpRelay::from_config(&config(465));
        let debug = format!("{relay:?}");
        assert!(!debug.contains("s3cret"));
        assert!(debug.contains("auth: true"));
    }
}
