//! Mailbox contract for job-alert ingestion.

use async_trait::async_trait;

use crate::error::MailboxError;
use crate::types::EmailMessage;

/// Read-side mailbox access.
///
/// Implementations handle multipart extraction themselves: text/plain
/// parts are preferred, HTML parts are reduced to text (see
/// [`crate::email::html_to_text`]) before the message is returned.
#[async_trait]
pub trait Mailbox: Send + Sync {
    /// Unread messages under the given label, oldest first, capped at
    /// `max`.
    async fn fetch_unread(&self, label: &str, max: usize) -> Result<Vec<EmailMessage>, MailboxError>;

    /// Mark one message as read once its jobs have been extracted.
    async fn mark_read(&self, id: &str) -> Result<(), MailboxError>;
}
