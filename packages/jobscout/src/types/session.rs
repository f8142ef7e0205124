use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Lifecycle state of one platform's browser session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Uninitialized,
    AuthenticatedViaCookies,
    AuthenticatedViaLogin,
    Expired,
    Closed,
}

/// One browser cookie, driver-agnostic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    #[serde(default = "default_path")]
    pub path: String,
    /// Seconds since epoch; None for session cookies.
    pub expires: Option<f64>,
    #[serde(default)]
    pub secure: bool,
    #[serde(default)]
    pub http_only: bool,
}

fn default_path() -> String {
    "/".to_string()
}

/// Persisted authentication state for one scraping target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CookieJar {
    pub cookies: Vec<Cookie>,
    /// When the jar was persisted; drives the staleness policy.
    pub saved_at: DateTime<Utc>,
}

impl CookieJar {
    pub fn new(cookies: Vec<Cookie>) -> Self {
        Self {
            cookies,
            saved_at: Utc::now(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// A jar older than `max_age` is treated as absent, even if
    /// otherwise well-formed.
    pub fn is_stale(&self, max_age: Duration) -> bool {
        let age = Utc::now().signed_duration_since(self.saved_at);
        age.num_seconds() < 0 || age.num_seconds() as u64 > max_age.as_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;

    fn jar_saved_days_ago(days: i64) -> CookieJar {
        CookieJar {
            cookies: vec![Cookie {
                name: "li_at".to_string(),
                value: "token".to_string(),
                domain: ".linkedin.com".to_string(),
                path: "/".to_string(),
                expires: None,
                secure: true,
                http_only: true,
            }],
            saved_at: Utc::now() - ChronoDuration::days(days),
        }
    }

    #[test]
    fn fresh_jar_is_not_stale() {
        let jar = jar_saved_days_ago(1);
        assert!(!jar.is_stale(Duration::from_secs(7 * 24 * 3600)));
    }

    #[test]
    fn old_jar_is_stale() {
        let jar = jar_saved_days_ago(8);
        assert!(jar.is_stale(Duration::from_secs(7 * 24 * 3600)));
    }
}
