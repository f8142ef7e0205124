//! Run configuration.
//!
//! One immutable [`AgentConfig`] value is built at startup and passed
//! explicitly to each component; nothing reads ambient global state.

use std::collections::HashMap;
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::types::Platform;

/// Configuration for one agent run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Search keywords, combined pairwise with `locations`.
    pub keywords: Vec<String>,

    /// Search locations.
    pub locations: Vec<String>,

    /// Maximum result pages per (keyword, location) pair.
    pub max_pages: usize,

    /// When true, every new job is queued for human review instead of
    /// being applied to.
    pub review_before_apply: bool,

    /// When false, jobs with an apply URL are logged for manual review
    /// instead of being driven through the web-form engine.
    pub auto_apply_enabled: bool,

    /// Cookie jars older than this are treated as absent.
    ///
    /// Default: 7 days.
    #[serde(with = "duration_secs")]
    pub cookie_max_age: Duration,

    /// Gmail label carrying job-alert emails.
    pub job_alert_label: String,

    /// Minimum acceptable salary in AED per month, if any.
    ///
    /// Only enforced when a posting's salary text is present and
    /// parseable; postings without salary data always pass.
    pub min_monthly_aed: Option<u32>,

    /// Approximate currency conversion rates for salary normalization.
    pub currency_rates: CurrencyRates,

    /// Egress proxy ring, rotated between browser launches.
    pub proxies: Vec<String>,

    /// Randomized delay bounds between scrape requests.
    pub jitter: Jitter,

    /// Backoff policy for login and outbound API retries.
    pub retry: RetryPolicy,

    /// Base timeout for a single page operation.
    #[serde(with = "duration_secs")]
    pub op_timeout: Duration,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            keywords: vec![],
            locations: vec![],
            max_pages: 3,
            review_before_apply: true,
            auto_apply_enabled: false,
            cookie_max_age: Duration::from_secs(7 * 24 * 60 * 60),
            job_alert_label: "Job Alerts".to_string(),
            min_monthly_aed: None,
            currency_rates: CurrencyRates::default(),
            proxies: vec![],
            jitter: Jitter::default(),
            retry: RetryPolicy::default(),
            op_timeout: Duration::from_secs(30),
        }
    }
}

impl AgentConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set search keywords.
    pub fn with_keywords(mut self, keywords: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.keywords = keywords.into_iter().map(|k| k.into()).collect();
        self
    }

    /// Set search locations.
    pub fn with_locations(mut self, locations: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.locations = locations.into_iter().map(|l| l.into()).collect();
        self
    }

    /// Set the page cap per search.
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Set review-before-apply.
    pub fn with_review_before_apply(mut self, review: bool) -> Self {
        self.review_before_apply = review;
        self
    }

    /// Set auto-apply.
    pub fn with_auto_apply(mut self, enabled: bool) -> Self {
        self.auto_apply_enabled = enabled;
        self
    }

    /// Set the cookie staleness threshold.
    pub fn with_cookie_max_age(mut self, max_age: Duration) -> Self {
        self.cookie_max_age = max_age;
        self
    }

    /// Set the minimum monthly salary in AED.
    pub fn with_min_monthly_aed(mut self, min: u32) -> Self {
        self.min_monthly_aed = Some(min);
        self
    }
}

/// Approximate conversion rates used for salary normalization.
///
/// These are configuration, not verified exchange rates; deployments
/// should override them when accuracy matters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyRates {
    /// AED per USD.
    pub usd_to_aed: f64,
    /// AED per CAD.
    pub cad_to_aed: f64,
}

impl Default for CurrencyRates {
    fn default() -> Self {
        Self {
            usd_to_aed: 3.67,
            cad_to_aed: 2.7,
        }
    }
}

/// Randomized inter-request delay.
///
/// This exists purely to reduce detection probability while crawling.
/// It is not a retry mechanism; see [`RetryPolicy`] for failure
/// recovery.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Jitter {
    /// Lower bound in milliseconds.
    pub min_ms: u64,
    /// Upper bound in milliseconds.
    pub max_ms: u64,
}

impl Default for Jitter {
    fn default() -> Self {
        Self {
            min_ms: 3_000,
            max_ms: 7_000,
        }
    }
}

impl Jitter {
    /// Draw one delay from the configured range.
    pub fn sample(&self) -> Duration {
        if self.max_ms <= self.min_ms {
            return Duration::from_millis(self.min_ms);
        }
        let ms = rand::rng().random_range(self.min_ms..=self.max_ms);
        Duration::from_millis(ms)
    }

    /// Sleep for one sampled delay.
    pub async fn wait(&self) {
        tokio::time::sleep(self.sample()).await;
    }
}

/// Bounded exponential backoff for login and outbound API retries.
///
/// Deterministic given the attempt index, unlike [`Jitter`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts before giving up.
    pub max_attempts: u32,
    /// Delay before the second attempt, in milliseconds.
    pub base_delay_ms: u64,
    /// Cap on any single delay, in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 4_000,
            max_delay_ms: 10_000,
        }
    }
}

impl RetryPolicy {
    /// Backoff delay after a failed attempt (0-based index).
    ///
    /// Doubles per attempt, capped at `max_delay_ms`.
    pub fn delay(&self, attempt: u32) -> Duration {
        let ms = self
            .base_delay_ms
            .saturating_mul(1u64 << attempt.min(16))
            .min(self.max_delay_ms);
        Duration::from_millis(ms)
    }

    /// Per-operation timeout for the given attempt, escalating slightly
    /// on each retry.
    pub fn op_timeout(&self, base: Duration, attempt: u32) -> Duration {
        base + base / 2 * attempt
    }
}

/// Per-platform login credentials.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Credential lookup by platform.
#[derive(Debug, Clone, Default)]
pub struct CredentialSet {
    entries: HashMap<Platform, Credentials>,
}

impl CredentialSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register credentials for one platform.
    pub fn with(mut self, platform: Platform, email: impl Into<String>, password: impl Into<String>) -> Self {
        self.entries.insert(
            platform,
            Credentials {
                email: email.into(),
                password: password.into(),
            },
        );
        self
    }

    pub fn get(&self, platform: Platform) -> Option<&Credentials> {
        self.entries.get(&platform)
    }

    /// Load credentials from `<PLATFORM>_EMAIL` / `<PLATFORM>_PASSWORD`
    /// environment variables, reading a `.env` file if present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        let mut set = Self::new();
        for platform in [Platform::LinkedIn, Platform::Indeed, Platform::Bayt] {
            let prefix = platform.as_str().to_uppercase();
            if let (Ok(email), Ok(password)) = (
                std::env::var(format!("{prefix}_EMAIL")),
                std::env::var(format!("{prefix}_PASSWORD")),
            ) {
                set.entries.insert(platform, Credentials { email, password });
            }
        }
        set
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(d)?))
    }
}
