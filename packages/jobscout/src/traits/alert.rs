//! Operational alerting contract.

use async_trait::async_trait;

/// Sink for run-level and platform-level failure notifications.
///
/// Alerting is best-effort: implementations swallow their own delivery
/// failures, so callers can fire and forget.
#[async_trait]
pub trait Alerter: Send + Sync {
    async fn notify(&self, message: &str);
}
