//! Application routing.
//!
//! `dispatch` is a decision table evaluated in order, first match wins.
//! The outcome tag names the path taken, never whether that path then
//! succeeded; send and submit results are recorded as notes. Collaborator
//! failures inside a branch become notes too — the only thing that
//! degrades the outcome to [`DispatchOutcome::Error`] is failing to
//! write the outcome itself to the tracking store.

use std::sync::Arc;
use tracing::{info, warn};

use crate::apply::WebFormEngine;
use crate::traits::{JobTracker, OutboundMailer, ResumeTailor};
use crate::types::{Dispatch, DispatchOutcome, JobPosting, UserProfile};

pub struct Dispatcher {
    tracker: Arc<dyn JobTracker>,
    mailer: Arc<dyn OutboundMailer>,
    tailor: Arc<dyn ResumeTailor>,
    engine: WebFormEngine,
    profile: UserProfile,
    review_before_apply: bool,
    auto_apply_enabled: bool,
}

impl Dispatcher {
    pub fn new(
        tracker: Arc<dyn JobTracker>,
        mailer: Arc<dyn OutboundMailer>,
        tailor: Arc<dyn ResumeTailor>,
        engine: WebFormEngine,
        profile: UserProfile,
        review_before_apply: bool,
        auto_apply_enabled: bool,
    ) -> Self {
        Self {
            tracker,
            mailer,
            tailor,
            engine,
            profile,
            review_before_apply,
            auto_apply_enabled,
        }
    }

    /// Route one posting through exactly one handling path.
    pub async fn dispatch(&self, job: &JobPosting) -> Dispatch {
        let (outcome, note) = self.route(job).await;

        info!(
            title = %job.title,
            company = %job.company,
            outcome = outcome.as_str(),
            %note,
            "job dispatched"
        );

        if let Err(e) = self.record(job, outcome, &note).await {
            warn!(url = %job.job_url, error = %e, "failed to record dispatch outcome");
            return Dispatch {
                outcome: DispatchOutcome::Error,
                note: format!("failed to record outcome: {e}"),
            };
        }

        Dispatch { outcome, note }
    }

    async fn route(&self, job: &JobPosting) -> (DispatchOutcome, String) {
        if self.review_before_apply {
            return (
                DispatchOutcome::ReviewQueue,
                "queued for review".to_string(),
            );
        }

        if let Some(recruiter) = job.recruiter_email.as_deref().filter(|e| !e.is_empty()) {
            let note = self.send_cold_email(job, recruiter).await;
            return (DispatchOutcome::ColdEmail, note);
        }

        if job.apply_url.as_deref().is_some_and(|u| !u.is_empty()) {
            if !self.auto_apply_enabled {
                return (
                    DispatchOutcome::ManualReview,
                    "Manual review required (auto-apply off)".to_string(),
                );
            }
            let result = self.engine.apply_to_job(job, &self.profile).await;
            return (DispatchOutcome::WebForm, result.note());
        }

        (
            DispatchOutcome::ManualReview,
            "Manual review required".to_string(),
        )
    }

    /// The cold-email path; every failure mode folds into the note.
    async fn send_cold_email(&self, job: &JobPosting, recruiter: &str) -> String {
        let tailored = match self.tailor.tailor(job).await {
            Ok(t) => t,
            Err(e) => return format!("cold email failed: tailoring error: {e}"),
        };

        let subject = format!("Application for {} at {}", job.title, job.company);
        let attachments: Vec<_> = self.profile.resume_path.iter().cloned().collect();

        match self
            .mailer
            .send(recruiter, &subject, &tailored.cover_letter, &attachments)
            .await
        {
            Ok(true) => format!("cold email sent to {recruiter}"),
            Ok(false) => format!("cold email failed: delivery rejected for {recruiter}"),
            Err(e) => format!("cold email failed: {e}"),
        }
    }

    /// Persist the terminal annotation for this posting.
    async fn record(
        &self,
        job: &JobPosting,
        outcome: DispatchOutcome,
        note: &str,
    ) -> Result<(), crate::error::BoxError> {
        let mut status_written = false;
        match outcome {
            DispatchOutcome::ReviewQueue => self.tracker.append_review_row(job).await?,
            DispatchOutcome::ColdEmail => {
                if note.starts_with("cold email sent") {
                    self.tracker.mark_cold_email_sent(&job.job_url).await?;
                }
            }
            DispatchOutcome::WebForm => {
                // A submitted application outranks the path tag.
                if note == "application submitted" {
                    self.tracker.mark_applied(&job.job_url).await?;
                    status_written = true;
                }
            }
            DispatchOutcome::ManualReview | DispatchOutcome::Error => {}
        }
        if !status_written {
            self.tracker
                .update_by_url(&job.job_url, crate::traits::TrackedField::Status, outcome.as_str())
                .await?;
        }
        self.tracker.update_notes(&job.job_url, note).await?;
        Ok(())
    }
}
