//! Typed errors for the jobscout library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so callers can
//! distinguish "skipped", "degraded" and "failed" at each unit boundary
//! instead of parsing log text.

use thiserror::Error;

/// Boxed error type for external collaborators (tracker, mailer, tailor).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors from the headless-browser driver.
#[derive(Debug, Error)]
pub enum BrowserError {
    /// Browser process failed to launch
    #[error("browser launch failed: {0}")]
    Launch(String),

    /// Navigation failed or the page never loaded
    #[error("navigation failed: {url}: {reason}")]
    Navigation { url: String, reason: String },

    /// A bounded page operation expired
    #[error("{op} timed out after {millis}ms")]
    Timeout { op: String, millis: u64 },

    /// CDP-level failure (evaluate, element op, cookie op)
    #[error("browser protocol error: {0}")]
    Protocol(String),

    /// The page or context was already closed
    #[error("page closed")]
    Closed,
}

/// Errors from session lifecycle and authentication.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Driver failure during session work
    #[error("browser error: {0}")]
    Browser(#[from] BrowserError),

    /// Cookie jar could not be read or written
    #[error("cookie store error: {0}")]
    CookieStore(#[source] BoxError),

    /// A checkpoint or CAPTCHA wall was hit; an operator must intervene.
    ///
    /// Never retried automatically: retrying into a checkpoint only
    /// burns the account.
    #[error("manual intervention required for {platform}: checkpoint at {url}")]
    ManualInterventionRequired { platform: String, url: String },

    /// Credential login exhausted its bounded retries
    #[error("login failed for {platform} after {attempts} attempts")]
    LoginFailed { platform: String, attempts: u32 },

    /// No credentials configured for a platform that requires login
    #[error("missing credentials for {platform}")]
    MissingCredentials { platform: String },
}

/// Errors that abort one platform's scrape.
///
/// Page-level trouble never surfaces here: a bad page degrades to zero
/// results for that page and the crawl continues.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Session could not be established for this platform
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// Driver failure outside any single page unit
    #[error("browser error: {0}")]
    Browser(#[from] BrowserError),

    /// Mailbox failure while collecting job-alert emails
    #[error("mailbox error: {0}")]
    Mailbox(#[from] MailboxError),
}

/// Errors from the mailbox collaborator.
#[derive(Debug, Error)]
pub enum MailboxError {
    /// Mailbox API failure
    #[error("mailbox error: {0}")]
    Api(#[source] BoxError),

    /// Configured label does not exist
    #[error("label not found: {label}")]
    LabelNotFound { label: String },
}

/// Result alias for browser operations.
pub type BrowserResult<T> = std::result::Result<T, BrowserError>;

/// Result alias for session operations.
pub type SessionResult<T> = std::result::Result<T, SessionError>;

/// Result alias for scrape operations.
pub type ScrapeResult<T> = std::result::Result<T, ScrapeError>;
