//! Outbound message construction

use crate::config::EmailSinkConfig;
use crate::error::DeliveryError;
use lettre::Message;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};

/// The artifact as it will be attached
#[derive(Debug, Clone)]
pub struct AttachmentPayload {
    /// Display file name
    pub file_name: String,
    /// MIME type, e.g. `text/csv`
    pub content_type: &'static str,
    /// Raw artifact bytes
    pub bytes: Vec<u8>,
}

fn parse_mailbox(field: &'static str, address: &str) -> Result<Mailbox, DeliveryError> {
    address
        .parse()
        .map_err(|_| DeliveryError::InvalidAddress {
            field,
            address: address.to_string(),
        })
}

/// Build the outbound message
///
/// `multipart/mixed` with the configured body as `text/plain` followed by the
/// artifact attachment. One sender, one recipient.
pub fn compose(
    config: &EmailSinkConfig,
    attachment: AttachmentPayload,
) -> Result<Message, DeliveryError> {
    let from = parse_mailbox("from", &config.email_from_address)?;
    let to = parse_mailbox("to", &config.email_to_address)?;

    let content_type = ContentType::parse(attachment.content_type)
        .map_err(|e| DeliveryError::Build(e.to_string()))?;

    let body = MultiPart::mixed()
        .singlepart(SinglePart::plain(config.email_message_content.clone()))
        .singlepart(Attachment::new(attachment.file_name).body(attachment.bytes, content_type));

    Message::builder()
        .from(from)
        .to(to)
        .subject(config.email_message_headline.clone())
        .multipart(body)
        .map_err(|e| DeliveryError::Build(e.to_string()))
}
