//! Message value type and attachment metadata
//!
//! Defines the normalized record of one retrieved message. Messages are
//! immutable once constructed; the cache and browser only ever clone or
//! borrow them. All types derive `Serialize`/`Deserialize` so mailbox
//! fixtures can be loaded from JSON.

use serde::{Deserialize, Serialize};

/// Attachment metadata
///
/// The payload itself is never fetched by this core; `payload_ref` is an
/// opaque reference the remote provider understands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentRef {
    /// Filename as reported by the provider
    pub filename: String,
    /// MIME content type (e.g., `application/pdf`, `image/jpeg`)
    pub mime_type: String,
    /// Opaque provider-side reference to the attachment payload
    #[serde(default)]
    pub payload_ref: String,
}

/// One retrieved mail message
///
/// Normalized from whatever the remote provider returns. The `timestamp`
/// field keeps the provider's own formatting and is never parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Opaque identifier, globally unique per remote provider
    pub id: String,
    /// Subject header
    #[serde(default)]
    pub subject: String,
    /// From header
    #[serde(default)]
    pub sender: String,
    /// To header
    #[serde(default)]
    pub recipient: String,
    /// Date header, provider-formatted, kept as-is
    #[serde(default)]
    pub timestamp: String,
    /// Plain text body
    #[serde(default)]
    pub plain_body: String,
    /// HTML body
    #[serde(default)]
    pub html_body: String,
    /// Attachment metadata in provider order
    #[serde(default)]
    pub attachments: Vec<AttachmentRef>,
}

impl Message {
    /// One-line summary for paginated listings
    ///
    /// Carries at least sender and subject per the display contract.
    pub fn summary_line(&self) -> String {
        format!("From: {} | Subject: {}", self.sender, self.subject)
    }

    /// Case-insensitive substring match across all searchable fields
    ///
    /// `needle_lower` must already be lowercased; the caller lowercases the
    /// query once instead of per message.
    pub fn contains_text(&self, needle_lower: &str) -> bool {
        [
            &self.sender,
            &self.subject,
            &self.recipient,
            &self.plain_body,
            &self.html_body,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(needle_lower))
    }
}
