//! Canonical-identity deduplication.
//!
//! Identity is the job URL when present, else a content digest of the
//! normalized (title, company, location) tuple. Dedup keeps the first
//! occurrence per identity and is idempotent: re-running it on its own
//! output is a no-op.

use std::collections::HashSet;

use crate::types::{JobIdentity, JobPosting};

/// Drop duplicate postings, keeping the first occurrence per identity.
pub fn dedupe(jobs: Vec<JobPosting>) -> Vec<JobPosting> {
    let mut seen: HashSet<JobIdentity> = HashSet::new();
    let before = jobs.len();
    let unique: Vec<JobPosting> = jobs
        .into_iter()
        .filter(|job| seen.insert(job.identity()))
        .collect();
    if unique.len() < before {
        tracing::debug!(before, after = unique.len(), "deduplicated postings");
    }
    unique
}

/// Global dedup pass: drops duplicates and anything whose identity is
/// already in the externally supplied already-processed URL set.
pub fn dedupe_with_existing(jobs: Vec<JobPosting>, existing_urls: &HashSet<String>) -> Vec<JobPosting> {
    let mut seen: HashSet<JobIdentity> = HashSet::new();
    jobs.into_iter()
        .filter(|job| {
            if let JobIdentity::Url(url) = job.identity() {
                if existing_urls.contains(&url) {
                    return false;
                }
            }
            seen.insert(job.identity())
        })
        .collect()
}
