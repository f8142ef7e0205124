use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A job board the scraper can drive directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    LinkedIn,
    Indeed,
    Bayt,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::LinkedIn => "linkedin",
            Platform::Indeed => "indeed",
            Platform::Bayt => "bayt",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a posting came from: a scraped board or a parsed alert email.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    LinkedIn,
    Indeed,
    Bayt,
    LinkedInEmail,
    IndeedEmail,
    GlassdoorEmail,
    GenericEmail,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::LinkedIn => "linkedin",
            Source::Indeed => "indeed",
            Source::Bayt => "bayt",
            Source::LinkedInEmail => "linkedin_email",
            Source::IndeedEmail => "indeed_email",
            Source::GlassdoorEmail => "glassdoor_email",
            Source::GenericEmail => "generic_email",
        }
    }

    /// The board platform this source maps to for apply automation,
    /// if any.
    pub fn platform(&self) -> Option<Platform> {
        match self {
            Source::LinkedIn | Source::LinkedInEmail => Some(Platform::LinkedIn),
            Source::Indeed | Source::IndeedEmail => Some(Platform::Indeed),
            Source::Bayt => Some(Platform::Bayt),
            Source::GlassdoorEmail | Source::GenericEmail => None,
        }
    }
}

impl From<Platform> for Source {
    fn from(p: Platform) -> Self {
        match p {
            Platform::LinkedIn => Source::LinkedIn,
            Platform::Indeed => Source::Indeed,
            Platform::Bayt => Source::Bayt,
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical normalized record of one job listing, regardless of
/// originating source.
///
/// Optional data stays optional: a posting missing location or salary is
/// preserved as-is, never dropped. The validity floor is
/// [`JobPosting::is_valid`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPosting {
    pub title: String,
    pub company: String,
    pub location: String,

    /// Primary identity when present.
    pub job_url: String,

    /// Direct application URL, when the source exposes one distinct
    /// from the view URL.
    pub apply_url: Option<String>,

    pub salary_text: String,
    pub description: String,

    /// Recruiter contact, when known (scraped or tailor-derived).
    pub recruiter_email: Option<String>,

    pub source: Source,
    pub date_posted: Option<NaiveDate>,
    pub scraped_at: DateTime<Utc>,
}

impl JobPosting {
    /// Create a minimally populated posting.
    pub fn new(source: Source) -> Self {
        Self {
            title: String::new(),
            company: String::new(),
            location: String::new(),
            job_url: String::new(),
            apply_url: None,
            salary_text: String::new(),
            description: String::new(),
            recruiter_email: None,
            source,
            date_posted: None,
            scraped_at: Utc::now(),
        }
    }

    /// A record with neither a job URL nor (title and company) carries
    /// no usable identity and must not be emitted.
    pub fn is_valid(&self) -> bool {
        !self.job_url.trim().is_empty()
            || (!self.title.trim().is_empty() && !self.company.trim().is_empty())
    }

    /// The URL an application should target: `apply_url` when present,
    /// else `job_url`.
    pub fn apply_target(&self) -> &str {
        match &self.apply_url {
            Some(url) if !url.is_empty() => url,
            _ => &self.job_url,
        }
    }

    /// Canonical identity for deduplication.
    pub fn identity(&self) -> JobIdentity {
        if !self.job_url.trim().is_empty() {
            JobIdentity::Url(self.job_url.trim().to_string())
        } else {
            JobIdentity::digest(&self.title, &self.company, &self.location)
        }
    }
}

/// Canonical identity of a posting: its URL, or a content digest of the
/// normalized (title, company, location) tuple when no URL is known.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum JobIdentity {
    Url(String),
    Digest(String),
}

impl JobIdentity {
    /// Digest of the lower-cased, trimmed (title, company, location)
    /// tuple.
    pub fn digest(title: &str, company: &str, location: &str) -> Self {
        let normalized = format!(
            "{}|{}|{}",
            title.trim().to_lowercase(),
            company.trim().to_lowercase(),
            location.trim().to_lowercase()
        );
        let mut hasher = Sha256::new();
        hasher.update(normalized.as_bytes());
        JobIdentity::Digest(hex::encode(hasher.finalize()))
    }
}

/// Which handling path a posting took.
///
/// The tag names the path, not whether that path ultimately succeeded;
/// send/submit failures are recorded separately as notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchOutcome {
    ReviewQueue,
    ColdEmail,
    WebForm,
    ManualReview,
    Error,
}

impl DispatchOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            DispatchOutcome::ReviewQueue => "review_queue",
            DispatchOutcome::ColdEmail => "cold_email",
            DispatchOutcome::WebForm => "web_form",
            DispatchOutcome::ManualReview => "manual_review",
            DispatchOutcome::Error => "error",
        }
    }
}

impl std::fmt::Display for DispatchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal annotation attached to a posting after dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dispatch {
    pub outcome: DispatchOutcome,
    /// Concrete success/failure detail for the path taken.
    pub note: String,
}

impl Dispatch {
    pub fn new(outcome: DispatchOutcome, note: impl Into<String>) -> Self {
        Self {
            outcome,
            note: note.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validity_floor() {
        let mut job = JobPosting::new(Source::LinkedIn);
        assert!(!job.is_valid());

        job.title = "Engineer".to_string();
        assert!(!job.is_valid());

        job.company = "Acme".to_string();
        assert!(job.is_valid());

        let mut url_only = JobPosting::new(Source::Indeed);
        url_only.job_url = "https://example.com/job/1".to_string();
        assert!(url_only.is_valid());
    }

    #[test]
    fn apply_target_falls_back_to_job_url() {
        let mut job = JobPosting::new(Source::LinkedIn);
        job.job_url = "https://example.com/view/1".to_string();
        assert_eq!(job.apply_target(), "https://example.com/view/1");

        job.apply_url = Some("https://example.com/apply/1".to_string());
        assert_eq!(job.apply_target(), "https://example.com/apply/1");
    }

    #[test]
    fn digest_identity_normalizes_case_and_whitespace() {
        let a = JobIdentity::digest("Engineer", " Acme ", "Dubai");
        let b = JobIdentity::digest("engineer", "acme", "DUBAI ");
        assert_eq!(a, b);

        let c = JobIdentity::digest("Engineer", "Other", "Dubai");
        assert_ne!(a, c);
    }

    #[test]
    fn url_identity_wins_over_digest() {
        let mut job = JobPosting::new(Source::Bayt);
        job.title = "Engineer".to_string();
        job.company = "Acme".to_string();
        job.job_url = "https://example.com/j/9".to_string();
        assert_eq!(
            job.identity(),
            JobIdentity::Url("https://example.com/j/9".to_string())
        );
    }
}
