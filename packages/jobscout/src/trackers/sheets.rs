//! Google Sheets tracker.
//!
//! Sheet layout, one row per posting:
//! A title, B company, C location, D source, E date posted, F job URL,
//! G tailored resume, H cover letter, I (spare), J recruiter email,
//! K status, L cold email sent, M notes. URL lookups scan column F.

use async_trait::async_trait;
use sheets::{SheetsOptions, SheetsService};
use std::collections::HashSet;
use tracing::warn;

use crate::error::BoxError;
use crate::traits::{JobTracker, TrackedField};
use crate::types::{JobPosting, TailorOutput};

const URL_COLUMN: &str = "F";

fn column_for(field: TrackedField) -> &'static str {
    match field {
        TrackedField::RecruiterEmail => "J",
        TrackedField::Status => "K",
        TrackedField::ColdEmailSent => "L",
        TrackedField::Notes => "M",
    }
}

#[derive(Debug, Clone)]
pub struct SheetsTrackerOptions {
    pub access_token: String,
    pub spreadsheet_id: String,
    /// Main worksheet name.
    pub jobs_sheet: String,
    /// Human-review worksheet name.
    pub review_sheet: String,
}

pub struct SheetsTracker {
    service: SheetsService,
    jobs_sheet: String,
    review_sheet: String,
}

impl SheetsTracker {
    pub fn new(options: SheetsTrackerOptions) -> Self {
        let service = SheetsService::new(SheetsOptions {
            access_token: options.access_token,
            spreadsheet_id: options.spreadsheet_id,
        });
        Self {
            service,
            jobs_sheet: options.jobs_sheet,
            review_sheet: options.review_sheet,
        }
    }

    fn job_row(job: &JobPosting, tailor: Option<&TailorOutput>) -> Vec<String> {
        vec![
            job.title.clone(),
            job.company.clone(),
            job.location.clone(),
            job.source.to_string(),
            job.date_posted.map(|d| d.to_string()).unwrap_or_default(),
            job.job_url.clone(),
            tailor
                .and_then(|t| t.delta_resume.clone())
                .unwrap_or_default(),
            tailor.map(|t| t.cover_letter.clone()).unwrap_or_default(),
            String::new(),
            job.recruiter_email.clone().unwrap_or_default(),
            String::new(),
            String::new(),
            String::new(),
        ]
    }

    /// 1-based sheet row holding `url`, if present.
    async fn row_of(&self, url: &str) -> Result<Option<usize>, BoxError> {
        let range = format!("{}!{URL_COLUMN}:{URL_COLUMN}", self.jobs_sheet);
        let column = self.service.get_values(&range).await?;
        Ok(column
            .values
            .iter()
            .position(|row| row.first().map(String::as_str) == Some(url))
            .map(|idx| idx + 1))
    }
}

#[async_trait]
impl JobTracker for SheetsTracker {
    async fn append_row(
        &self,
        job: &JobPosting,
        tailor: Option<&TailorOutput>,
    ) -> Result<(), BoxError> {
        let range = format!("{}!A:M", self.jobs_sheet);
        self.service
            .append_values(&range, vec![Self::job_row(job, tailor)])
            .await?;
        Ok(())
    }

    async fn append_review_row(&self, job: &JobPosting) -> Result<(), BoxError> {
        let range = format!("{}!A:M", self.review_sheet);
        self.service
            .append_values(&range, vec![Self::job_row(job, None)])
            .await?;
        Ok(())
    }

    async fn update_by_url(
        &self,
        url: &str,
        field: TrackedField,
        value: &str,
    ) -> Result<(), BoxError> {
        let Some(row) = self.row_of(url).await? else {
            // Not fatal: the row may live in the review sheet only.
            warn!(url, field = field.as_str(), "url not found in jobs sheet");
            return Ok(());
        };
        let column = column_for(field);
        let range = format!("{}!{column}{row}", self.jobs_sheet);
        self.service
            .update_values(&range, vec![vec![value.to_string()]])
            .await?;
        Ok(())
    }

    async fn get_existing_urls(&self) -> Result<HashSet<String>, BoxError> {
        let range = format!("{}!{URL_COLUMN}:{URL_COLUMN}", self.jobs_sheet);
        let column = self.service.get_values(&range).await?;
        Ok(column
            .values
            .into_iter()
            .filter_map(|row| row.into_iter().next())
            .filter(|url| url.starts_with("http"))
            .collect())
    }
}
