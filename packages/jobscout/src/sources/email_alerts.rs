//! Job-alert mailbox as a discovery source.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::JobSource;
use crate::dedupe::dedupe;
use crate::email::parse_job_email;
use crate::error::ScrapeResult;
use crate::traits::Mailbox;
use crate::types::JobPosting;

const MAX_EMAILS_PER_RUN: usize = 50;

pub struct EmailAlertSource {
    mailbox: Arc<dyn Mailbox>,
    label: String,
}

impl EmailAlertSource {
    pub fn new(mailbox: Arc<dyn Mailbox>, label: impl Into<String>) -> Self {
        Self {
            mailbox,
            label: label.into(),
        }
    }
}

#[async_trait]
impl JobSource for EmailAlertSource {
    fn name(&self) -> &str {
        "email_alerts"
    }

    async fn discover(&self) -> ScrapeResult<Vec<JobPosting>> {
        let messages = self
            .mailbox
            .fetch_unread(&self.label, MAX_EMAILS_PER_RUN)
            .await?;
        debug!(label = %self.label, messages = messages.len(), "unread alerts fetched");

        let mut jobs = Vec::new();
        for message in &messages {
            let parsed = parse_job_email(&message.body);
            debug!(id = %message.id, jobs = parsed.len(), "alert parsed");
            jobs.extend(parsed);

            // A message that fails to mark stays unread and will be
            // re-parsed next run; dedup absorbs the repeats.
            if let Err(e) = self.mailbox.mark_read(&message.id).await {
                warn!(id = %message.id, error = %e, "could not mark alert as read");
            }
        }

        let jobs = dedupe(jobs);
        info!(
            emails = messages.len(),
            jobs = jobs.len(),
            "email alert scan complete"
        );
        Ok(jobs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StaticMailbox;
    use crate::types::EmailMessage;

    fn message(id: &str, body: &str) -> EmailMessage {
        EmailMessage {
            id: id.into(),
            subject: "New jobs for you".into(),
            sender: "alerts@example.com".into(),
            body: body.into(),
        }
    }

    #[tokio::test]
    async fn jobs_from_all_messages_are_merged_and_marked_read() {
        let mailbox = Arc::new(StaticMailbox::new(vec![
            message(
                "m1",
                "Senior AI Engineer at TechCorp\nDubai, UAE\nhttps://www.linkedin.com/jobs/view/1",
            ),
            message(
                "m2",
                "Data Engineer at PipeCo\nRemote\nhttps://www.linkedin.com/jobs/view/2",
            ),
        ]));
        let source = EmailAlertSource::new(mailbox.clone(), "Job Alerts");

        let jobs = source.discover().await.unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(mailbox.read_ids(), vec!["m1", "m2"]);
    }

    #[tokio::test]
    async fn repeated_listing_across_messages_collapses() {
        let body =
            "Senior AI Engineer at TechCorp\nDubai, UAE\nhttps://www.linkedin.com/jobs/view/7";
        let mailbox = Arc::new(StaticMailbox::new(vec![
            message("m1", body),
            message("m2", body),
        ]));
        let source = EmailAlertSource::new(mailbox, "Job Alerts");

        let jobs = source.discover().await.unwrap();
        assert_eq!(jobs.len(), 1);
    }
}
