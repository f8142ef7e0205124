//! Session lifecycle: cookie restore, credential login, verification.
//!
//! The cheap path is always tried first: restore a saved cookie jar and
//! probe an authenticated page. Only when that fails does the manager
//! fall back to a credential login with human-paced typing. Checkpoint
//! walls abort immediately with
//! [`SessionError::ManualInterventionRequired`]; retrying into one only
//! flags the account harder.

mod auth;
mod cookie_store;

pub use auth::{auth_spec, AuthSpec};
pub use cookie_store::{CookieStore, FileCookieStore};

use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::antibot;
use crate::browser::BrowserPage;
use crate::config::{CredentialSet, RetryPolicy};
use crate::error::{SessionError, SessionResult};
use crate::types::{CookieJar, Platform, SessionState};

/// Per-character typing delay bounds, in milliseconds.
const TYPE_DELAY_MIN: Duration = Duration::from_millis(50);
const TYPE_DELAY_MAX: Duration = Duration::from_millis(150);

/// How long to wait for a success indicator after submitting a login.
const LOGIN_SETTLE: Duration = Duration::from_secs(15);

/// How long to wait for an indicator when probing restored cookies.
const VERIFY_WAIT: Duration = Duration::from_secs(8);

pub struct SessionManager {
    store: Arc<dyn CookieStore>,
    credentials: CredentialSet,
    cookie_max_age: Duration,
    retry: RetryPolicy,
    nav_timeout: Duration,
    /// Failure screenshots land here when set.
    screenshot_dir: Option<PathBuf>,
}

impl SessionManager {
    pub fn new(
        store: Arc<dyn CookieStore>,
        credentials: CredentialSet,
        cookie_max_age: Duration,
        retry: RetryPolicy,
        nav_timeout: Duration,
    ) -> Self {
        Self {
            store,
            credentials,
            cookie_max_age,
            retry,
            nav_timeout,
            screenshot_dir: None,
        }
    }

    pub fn with_screenshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.screenshot_dir = Some(dir.into());
        self
    }

    /// Get the page into an authenticated state, by restore or by login.
    pub async fn establish(
        &self,
        page: &dyn BrowserPage,
        platform: Platform,
    ) -> SessionResult<SessionState> {
        if self.restore(page, platform).await? {
            info!(platform = platform.as_str(), "session restored from cookies");
            return Ok(SessionState::AuthenticatedViaCookies);
        }

        self.login(page, platform).await?;
        info!(platform = platform.as_str(), "session established via login");
        Ok(SessionState::AuthenticatedViaLogin)
    }

    /// Restore a saved jar and probe it. False means "no usable jar",
    /// which is not an error; the caller falls through to login.
    async fn restore(&self, page: &dyn BrowserPage, platform: Platform) -> SessionResult<bool> {
        let jar = match self
            .store
            .load(platform)
            .await
            .map_err(SessionError::CookieStore)?
        {
            Some(jar) => jar,
            None => {
                debug!(platform = platform.as_str(), "no saved cookies");
                return Ok(false);
            }
        };

        if jar.is_stale(self.cookie_max_age) {
            debug!(platform = platform.as_str(), "saved cookies are stale");
            return Ok(false);
        }

        page.set_cookies(&jar.cookies).await.map_err(SessionError::from)?;
        if self.verify(page, platform).await? {
            Ok(true)
        } else {
            warn!(platform = platform.as_str(), "restored cookies rejected");
            self.store
                .clear(platform)
                .await
                .map_err(SessionError::CookieStore)?;
            Ok(false)
        }
    }

    /// Probe an authenticated page for a logged-in indicator.
    pub async fn verify(&self, page: &dyn BrowserPage, platform: Platform) -> SessionResult<bool> {
        let spec = auth_spec(platform);
        page.goto(spec.verify_url, self.nav_timeout).await?;
        self.checkpoint_guard(page, platform).await?;

        for indicator in spec.success_indicators {
            if page.wait_for_selector(indicator, VERIFY_WAIT).await? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn login(&self, page: &dyn BrowserPage, platform: Platform) -> SessionResult<()> {
        let creds = self
            .credentials
            .get(platform)
            .ok_or_else(|| SessionError::MissingCredentials {
                platform: platform.as_str().to_string(),
            })?;
        let spec = auth_spec(platform);

        for attempt in 0..self.retry.max_attempts {
            match self.login_once(page, platform, spec, &creds.email, &creds.password).await {
                Ok(true) => {
                    self.save(page, platform).await?;
                    return Ok(());
                }
                Ok(false) => {
                    warn!(
                        platform = platform.as_str(),
                        attempt, "login attempt did not reach a logged-in page"
                    );
                }
                // A checkpoint wall ends the whole login, not just the attempt.
                Err(e @ SessionError::ManualInterventionRequired { .. }) => return Err(e),
                Err(e) => {
                    warn!(platform = platform.as_str(), attempt, error = %e, "login attempt failed");
                }
            }
            // No backoff after the last attempt; the caller gets the
            // failure immediately.
            if attempt + 1 < self.retry.max_attempts {
                tokio::time::sleep(self.retry.delay(attempt)).await;
            }
        }

        self.capture_failure(page, platform).await;
        Err(SessionError::LoginFailed {
            platform: platform.as_str().to_string(),
            attempts: self.retry.max_attempts,
        })
    }

    async fn login_once(
        &self,
        page: &dyn BrowserPage,
        platform: Platform,
        spec: &AuthSpec,
        email: &str,
        password: &str,
    ) -> SessionResult<bool> {
        page.goto(spec.login_url, self.nav_timeout).await?;
        self.checkpoint_guard(page, platform).await?;

        let email_sel = first_present(page, spec.email_field).await;
        let password_sel = first_present(page, spec.password_field).await;
        let (Some(email_sel), Some(password_sel)) = (email_sel, password_sel) else {
            warn!(platform = platform.as_str(), "login form fields not found");
            return Ok(false);
        };

        page.type_slowly(email_sel, email, TYPE_DELAY_MIN, TYPE_DELAY_MAX)
            .await?;
        page.type_slowly(password_sel, password, TYPE_DELAY_MIN, TYPE_DELAY_MAX)
            .await?;

        let mut submitted = false;
        for submit in spec.submit {
            if page.click(submit).await? {
                submitted = true;
                break;
            }
        }
        if !submitted {
            warn!(platform = platform.as_str(), "no submit button matched");
            return Ok(false);
        }

        for indicator in spec.success_indicators {
            if page.wait_for_selector(indicator, LOGIN_SETTLE).await? {
                return Ok(true);
            }
        }

        // Not logged in; a checkpoint is the most likely reason.
        self.checkpoint_guard(page, platform).await?;
        Ok(false)
    }

    /// Error out if the page landed on a checkpoint or CAPTCHA wall.
    async fn checkpoint_guard(
        &self,
        page: &dyn BrowserPage,
        platform: Platform,
    ) -> SessionResult<()> {
        let url = page.current_url().await?;
        if antibot::url_is_checkpoint(&url) || antibot::page_is_blocked(&page.content().await?) {
            self.capture_failure(page, platform).await;
            return Err(SessionError::ManualInterventionRequired {
                platform: platform.as_str().to_string(),
                url,
            });
        }
        Ok(())
    }

    /// Persist the page's cookies as this platform's session.
    pub async fn save(&self, page: &dyn BrowserPage, platform: Platform) -> SessionResult<()> {
        let jar = CookieJar {
            cookies: page.cookies().await?,
            saved_at: Utc::now(),
        };
        self.store
            .save(platform, &jar)
            .await
            .map_err(SessionError::CookieStore)?;
        debug!(
            platform = platform.as_str(),
            cookies = jar.cookies.len(),
            "session saved"
        );
        Ok(())
    }

    /// Best-effort postmortem screenshot.
    async fn capture_failure(&self, page: &dyn BrowserPage, platform: Platform) {
        let Some(dir) = &self.screenshot_dir else {
            return;
        };
        let stamp = Utc::now().format("%Y%m%d_%H%M%S");
        let path = dir.join(format!("{}_{stamp}.png", platform.as_str()));
        if let Err(e) = page.screenshot(&path).await {
            debug!(error = %e, "failure screenshot not captured");
        }
    }
}

/// First selector in a fallback chain that matches on the page.
async fn first_present<'a>(page: &dyn BrowserPage, chain: &[&'a str]) -> Option<&'a str> {
    for selector in chain {
        if page.exists(selector).await {
            return Some(selector);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakePage, ScriptedStep};
    use crate::types::Cookie;

    fn manager(store: Arc<dyn CookieStore>) -> SessionManager {
        SessionManager::new(
            store,
            CredentialSet::new().with(Platform::LinkedIn, "me@example.com", "hunter2"),
            Duration::from_secs(7 * 24 * 3600),
            RetryPolicy {
                max_attempts: 2,
                base_delay_ms: 1,
                max_delay_ms: 2,
            },
            Duration::from_secs(5),
        )
    }

    fn fresh_jar() -> CookieJar {
        CookieJar {
            cookies: vec![Cookie {
                name: "li_at".into(),
                value: "tok".into(),
                domain: ".linkedin.com".into(),
                path: "/".into(),
                expires: None,
                secure: true,
                http_only: true,
            }],
            saved_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn fresh_cookies_restore_without_login() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FileCookieStore::new(dir.path()));
        store.save(Platform::LinkedIn, &fresh_jar()).await.unwrap();

        let page = FakePage::new().with_selector(".global-nav__me");
        let state = manager(store)
            .establish(&page, Platform::LinkedIn)
            .await
            .unwrap();
        assert_eq!(state, SessionState::AuthenticatedViaCookies);
        assert_eq!(page.cookies_installed().await, 1);
    }

    #[tokio::test]
    async fn stale_cookies_fall_through_to_login() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FileCookieStore::new(dir.path()));
        let mut jar = fresh_jar();
        jar.saved_at = Utc::now() - chrono::Duration::days(8);
        store.save(Platform::LinkedIn, &jar).await.unwrap();

        // Login form plus post-submit indicator, no cookie probe needed.
        let page = FakePage::new()
            .with_selector("#username")
            .with_selector("#password")
            .with_selector("button[type='submit']")
            .with_selector(".global-nav__me");
        let state = manager(store.clone())
            .establish(&page, Platform::LinkedIn)
            .await
            .unwrap();
        assert_eq!(state, SessionState::AuthenticatedViaLogin);
        // The fresh session replaced the stale jar.
        let saved = store.load(Platform::LinkedIn).await.unwrap().unwrap();
        assert!(!saved.is_stale(Duration::from_secs(60)));
    }

    #[tokio::test]
    async fn checkpoint_wall_is_not_retried() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FileCookieStore::new(dir.path()));

        let page = FakePage::new().with_step(ScriptedStep::RedirectTo(
            "https://www.linkedin.com/checkpoint/challenge/x".into(),
        ));
        let err = manager(store)
            .establish(&page, Platform::LinkedIn)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::ManualInterventionRequired { .. }
        ));
        // One navigation, no retry loop.
        assert_eq!(page.goto_count().await, 1);
    }

    #[tokio::test]
    async fn missing_credentials_fail_before_navigation() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FileCookieStore::new(dir.path()));

        let page = FakePage::new();
        let err = manager(store)
            .establish(&page, Platform::Bayt)
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::MissingCredentials { .. }));
        assert_eq!(page.goto_count().await, 0);
    }

    #[tokio::test]
    async fn exhausted_attempts_become_login_failed() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FileCookieStore::new(dir.path()));

        // Form present but no success indicator ever appears.
        let page = FakePage::new()
            .with_selector("#username")
            .with_selector("#password")
            .with_selector("button[type='submit']");
        let err = manager(store)
            .establish(&page, Platform::LinkedIn)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::LoginFailed { attempts: 2, .. }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn no_backoff_after_the_final_attempt() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FileCookieStore::new(dir.path()));
        let manager = SessionManager::new(
            store,
            CredentialSet::new().with(Platform::LinkedIn, "me@example.com", "hunter2"),
            Duration::from_secs(7 * 24 * 3600),
            RetryPolicy {
                max_attempts: 2,
                base_delay_ms: 100,
                max_delay_ms: 1000,
            },
            Duration::from_secs(5),
        );

        let page = FakePage::new()
            .with_selector("#username")
            .with_selector("#password")
            .with_selector("button[type='submit']");

        // Only the inter-attempt backoff runs; a trailing one would
        // push this to 300ms of virtual time.
        let started = tokio::time::Instant::now();
        let err = manager.establish(&page, Platform::LinkedIn).await.unwrap_err();
        assert!(matches!(err, SessionError::LoginFailed { .. }));
        assert_eq!(started.elapsed(), Duration::from_millis(100));
    }
}
