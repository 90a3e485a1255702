//! Delivery engine: artifact materialization and email transmission
//!
//! The engine turns finished batch text into a file on disk and mails that
//! file through a [`Relay`]. Each step is fatal on failure; nothing is retried.

mod message;
mod smtp;

pub use message::{AttachmentPayload, compose};
pub use smtp::SmtpRelay;

use crate::artifact;
use crate::config::EmailSinkConfig;
use crate::error::{ArtifactWriteError, DeliveryError, Result};
use lettre::Message;
use std::path::Path;
use tracing::{info, warn};

/// Transport that hands a finished message to a mail relay
///
/// [`SmtpRelay`] is the production implementation. Hosts can substitute
/// their own, e.g. to capture messages in tests or route through an API.
pub trait Relay {
    /// Transmit `message` synchronously
    fn send(&self, message: &Message) -> std::result::Result<(), DeliveryError>;
}

impl<R: Relay + ?Sized> Relay for Box<R> {
    fn send(&self, message: &Message) -> std::result::Result<(), DeliveryError> {
        (**self).send(message)
    }
}

impl<R: Relay + ?Sized> Relay for &R {
    fn send(&self, message: &Message) -> std::result::Result<(), DeliveryError> {
        (**self).send(message)
    }
}

/// Materializes batch text and delivers it by email
#[derive(Debug)]
pub struct DeliveryEngine<R> {
    config: EmailSinkConfig,
    relay: R,
}

impl DeliveryEngine<SmtpRelay> {
    /// Engine delivering through an [`SmtpRelay`] built from `config`
    pub fn smtp(config: EmailSinkConfig) -> Self {
        let relay = SmtpRelay::from_config(&config);
        Self { config, relay }
    }
}

impl<R: Relay> DeliveryEngine<R> {
    /// Engine delivering through `relay`
    pub fn new(config: EmailSinkConfig, relay: R) -> Self {
        Self { config, relay }
    }

    /// Configuration in use
    pub fn config(&self) -> &EmailSinkConfig {
        &self.config
    }

    /// The relay in use
    pub fn relay(&self) -> &R {
        &self.relay
    }

    /// Write `content` to the configured artifact path
    ///
    /// Creates the file if absent, otherwise truncates and rewrites it.
    pub fn materialize(&self, content: &str) -> std::result::Result<(), ArtifactWriteError> {
        artifact::materialize(&self.config.artifact_path, content)
    }

    /// Build the message around the artifact and send it
    ///
    /// The artifact is read back from disk so the attachment always matches
    /// what was materialized.
    pub fn deliver(&self) -> Result<()> {
        let path: &Path = &self.config.artifact_path;
        let payload = AttachmentPayload {
            file_name: artifact::file_name(path)?,
            content_type: artifact::content_type_for(path),
            bytes: artifact::read(path)?,
        };
        let attachment_bytes = payload.bytes.len();

        let message = compose(&self.config, payload).inspect_err(|e| {
            warn!(error = %e, "failed to build email");
        })?;

        self.relay.send(&message).inspect_err(|e| {
            warn!(
                to = %self.config.email_to_address,
                error = %e,
                "send email failed"
            );
        })?;

        info!(
            to = %self.config.email_to_address,
            subject = %self.config.email_message_headline,
            attachment_bytes,
            "email sent"
        );
        Ok(())
    }
}
