//! Tracking-store contract.
//!
//! The store, not this core, owns long-term identity: rows are keyed by
//! job URL and `get_existing_urls` is the authoritative
//! already-processed set across runs.

use async_trait::async_trait;
use std::collections::HashSet;

use crate::error::BoxError;
use crate::types::{JobPosting, TailorOutput};

/// Columns the core updates after the initial append.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackedField {
    Status,
    Notes,
    RecruiterEmail,
    ColdEmailSent,
}

impl TrackedField {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackedField::Status => "status",
            TrackedField::Notes => "notes",
            TrackedField::RecruiterEmail => "recruiter_email",
            TrackedField::ColdEmailSent => "cold_email_sent",
        }
    }
}

/// External tracking store for postings and their outcomes.
#[async_trait]
pub trait JobTracker: Send + Sync {
    /// Append one posting (with optional tailoring output) to the main
    /// sheet.
    async fn append_row(&self, job: &JobPosting, tailor: Option<&TailorOutput>) -> Result<(), BoxError>;

    /// Append one posting to the human-review queue.
    async fn append_review_row(&self, job: &JobPosting) -> Result<(), BoxError>;

    /// Update a single field on the row keyed by `url`.
    async fn update_by_url(&self, url: &str, field: TrackedField, value: &str) -> Result<(), BoxError>;

    /// All job URLs the store already knows about.
    async fn get_existing_urls(&self) -> Result<HashSet<String>, BoxError>;

    /// Record that an application was submitted.
    async fn mark_applied(&self, url: &str) -> Result<(), BoxError> {
        self.update_by_url(url, TrackedField::Status, "applied").await
    }

    /// Record that a cold email went out.
    async fn mark_cold_email_sent(&self, url: &str) -> Result<(), BoxError> {
        self.update_by_url(url, TrackedField::ColdEmailSent, "yes").await
    }

    /// Attach a free-text note to the row.
    async fn update_notes(&self, url: &str, notes: &str) -> Result<(), BoxError> {
        self.update_by_url(url, TrackedField::Notes, notes).await
    }
}
