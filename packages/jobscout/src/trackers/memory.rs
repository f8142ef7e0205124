//! In-memory tracker for tests and dry runs.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;

use crate::error::BoxError;
use crate::traits::{JobTracker, TrackedField};
use crate::types::{JobPosting, TailorOutput};

#[derive(Default)]
struct Inner {
    rows: Vec<(JobPosting, Option<TailorOutput>)>,
    review_rows: Vec<JobPosting>,
    updates: HashMap<String, HashMap<&'static str, String>>,
    existing: HashSet<String>,
}

/// Tracker backed by process memory. Rows are visible through the
/// accessor methods so tests can assert on what was written.
#[derive(Default)]
pub struct MemoryTracker {
    inner: RwLock<Inner>,
}

impl MemoryTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the already-processed URL set.
    pub fn with_existing_urls(mut self, urls: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.inner.get_mut().existing = urls.into_iter().map(Into::into).collect();
        self
    }

    pub async fn rows(&self) -> Vec<JobPosting> {
        self.inner
            .read()
            .await
            .rows
            .iter()
            .map(|(job, _)| job.clone())
            .collect()
    }

    pub async fn review_rows(&self) -> Vec<JobPosting> {
        self.inner.read().await.review_rows.clone()
    }

    /// Last value written to `field` for `url`, if any.
    pub async fn field(&self, url: &str, field: TrackedField) -> Option<String> {
        self.inner
            .read()
            .await
            .updates
            .get(url)
            .and_then(|fields| fields.get(field.as_str()))
            .cloned()
    }
}

#[async_trait]
impl JobTracker for MemoryTracker {
    async fn append_row(
        &self,
        job: &JobPosting,
        tailor: Option<&TailorOutput>,
    ) -> Result<(), BoxError> {
        let mut inner = self.inner.write().await;
        inner.rows.push((job.clone(), tailor.cloned()));
        inner.existing.insert(job.job_url.clone());
        Ok(())
    }

    async fn append_review_row(&self, job: &JobPosting) -> Result<(), BoxError> {
        let mut inner = self.inner.write().await;
        inner.review_rows.push(job.clone());
        inner.existing.insert(job.job_url.clone());
        Ok(())
    }

    async fn update_by_url(
        &self,
        url: &str,
        field: TrackedField,
        value: &str,
    ) -> Result<(), BoxError> {
        let mut inner = self.inner.write().await;
        inner
            .updates
            .entry(url.to_string())
            .or_default()
            .insert(field.as_str(), value.to_string());
        Ok(())
    }

    async fn get_existing_urls(&self) -> Result<HashSet<String>, BoxError> {
        Ok(self.inner.read().await.existing.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Source;

    fn job(url: &str) -> JobPosting {
        let mut job = JobPosting::new(Source::LinkedIn);
        job.title = "AI Engineer".into();
        job.company = "TechCorp".into();
        job.job_url = url.into();
        job
    }

    #[tokio::test]
    async fn appended_rows_join_the_existing_set() {
        let tracker = MemoryTracker::new().with_existing_urls(["https://a.example/1"]);
        tracker.append_row(&job("https://a.example/2"), None).await.unwrap();

        let existing = tracker.get_existing_urls().await.unwrap();
        assert!(existing.contains("https://a.example/1"));
        assert!(existing.contains("https://a.example/2"));
    }

    #[tokio::test]
    async fn updates_track_the_latest_value_per_field() {
        let tracker = MemoryTracker::new();
        let url = "https://a.example/3";
        tracker
            .update_by_url(url, TrackedField::Notes, "first")
            .await
            .unwrap();
        tracker
            .update_by_url(url, TrackedField::Notes, "second")
            .await
            .unwrap();
        tracker.mark_applied(url).await.unwrap();

        assert_eq!(
            tracker.field(url, TrackedField::Notes).await.as_deref(),
            Some("second")
        );
        assert_eq!(
            tracker.field(url, TrackedField::Status).await.as_deref(),
            Some("applied")
        );
    }
}
