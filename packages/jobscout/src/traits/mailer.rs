//! Outbound-email contract.

use async_trait::async_trait;
use std::path::PathBuf;

use crate::error::BoxError;

/// Transport for cold emails.
///
/// The boolean result reports delivery acceptance; the dispatcher
/// records it as a note and never lets it change the outcome tag.
#[async_trait]
pub trait OutboundMailer: Send + Sync {
    async fn send(
        &self,
        to: &str,
        subject: &str,
        body: &str,
        attachments: &[PathBuf],
    ) -> Result<bool, BoxError>;
}
