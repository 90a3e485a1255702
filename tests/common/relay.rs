//! In-memory relay doubles

use email_sink::{DeliveryError, Relay};
use lettre::Message;
use std::cell::RefCell;

/// What a relay saw for one message
#[derive(Debug, Clone)]
pub struct SentMessage {
    /// Envelope sender
    pub from: Option<String>,
    /// Envelope recipients
    pub to: Vec<String>,
    /// Full RFC 5322 text
    pub raw: String,
}

/// Relay that records every message and accepts or rejects them all
#[derive(Debug, Default)]
pub struct RecordingRelay {
    sent: RefCell<Vec<SentMessage>>,
    attempts: RefCell<usize>,
    reject: Option<String>,
}

impl RecordingRelay {
    /// Relay that accepts every message
    pub fn accepting() -> Self {
        Self::default()
    }

    /// Relay that rejects every message with `reason`
    pub fn rejecting(reason: &str) -> Self {
        Self {
            reject: Some(reason.to_string()),
            ..Self::default()
        }
    }

    /// Messages accepted so far
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.borrow().clone()
    }

    /// Send attempts, accepted or not
    pub fn attempts(&self) -> usize {
        *self.attempts.borrow()
    }
}

impl Relay for RecordingRelay {
    fn send(&self, message: &Message) -> Result<(), DeliveryError> {
        *self.attempts.borrow_mut() += 1;

        if let Some(reason) = &self.reject {
            return Err(DeliveryError::Transport {
                relay: "recording-relay".to_string(),
                source: reason.clone().into(),
            });
        }

        let envelope = message.envelope();
        self.sent.borrow_mut().push(SentMessage {
            from: envelope.from().map(ToString::to_string),
            to: envelope.to().iter().map(ToString::to_string).collect(),
            raw: String::from_utf8_lossy(&message.formatted()).into_owned(),
        });
        Ok(())
    }
}
