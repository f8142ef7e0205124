//! Headless-browser driver seam.
//!
//! Scrapers, the session manager and the web-form engine drive pages
//! through these traits; the chromiumoxide implementation lives in
//! [`chromium`], and a scripted fake lives in [`crate::testing`].
//!
//! Element-level reads return `Option`/`bool` rather than errors:
//! a missing node is an extraction miss, not a failure.

pub mod chromium;

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::BrowserResult;
use crate::types::Cookie;

pub use chromium::ChromiumDriver;

/// Launch options for a browser context.
#[derive(Debug, Clone, Default)]
pub struct DriverOptions {
    /// Run with a visible window (manual checkpoint recovery).
    pub headful: bool,
    /// Egress proxy for this launch. A chromium process pins its proxy,
    /// so rotation happens between launches, not per request.
    pub proxy: Option<String>,
    /// Explicit chrome binary; auto-discovered when unset.
    pub chrome_path: Option<PathBuf>,
}

/// A launched browser that can hand out isolated pages.
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    /// Open a fresh page with the realistic header set and automation
    /// fingerprints suppressed.
    async fn new_page(&self) -> BrowserResult<Box<dyn BrowserPage>>;
}

/// One browser page, driven sequentially by exactly one task.
#[async_trait]
pub trait BrowserPage: Send + Sync {
    /// Navigate and wait for the load to settle, bounded by `timeout`.
    async fn goto(&self, url: &str, timeout: Duration) -> BrowserResult<()>;

    /// URL the page ended up on (after redirects).
    async fn current_url(&self) -> BrowserResult<String>;

    /// Full rendered page content, for anti-bot marker scanning.
    async fn content(&self) -> BrowserResult<String>;

    /// Poll for a selector until it appears or `timeout` expires.
    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> BrowserResult<bool>;

    /// All elements matching `selector`.
    async fn query_all(&self, selector: &str) -> BrowserResult<Vec<Box<dyn PageElement>>>;

    /// Whether at least one element matches.
    async fn exists(&self, selector: &str) -> bool;

    /// Inner text of the first match, if any.
    async fn text_of(&self, selector: &str) -> Option<String>;

    /// Click the first match. False when nothing matched.
    async fn click(&self, selector: &str) -> BrowserResult<bool>;

    /// Replace the first match's value. False when nothing matched.
    async fn fill(&self, selector: &str, value: &str) -> BrowserResult<bool>;

    /// Type into the first match with a randomized per-character delay.
    ///
    /// The timing is an evasion measure, not a correctness one.
    async fn type_slowly(
        &self,
        selector: &str,
        text: &str,
        delay_min: Duration,
        delay_max: Duration,
    ) -> BrowserResult<bool>;

    /// Attach a local file to the first matching file input.
    async fn set_files(&self, selector: &str, path: &Path) -> BrowserResult<bool>;

    /// All cookies visible to this page.
    async fn cookies(&self) -> BrowserResult<Vec<Cookie>>;

    /// Install cookies before authenticated navigation.
    async fn set_cookies(&self, cookies: &[Cookie]) -> BrowserResult<()>;

    /// Screenshot for postmortem on fatal failures. Best-effort.
    async fn screenshot(&self, path: &Path) -> BrowserResult<()>;

    /// Close the page and release its target.
    async fn close(&self) -> BrowserResult<()>;
}

/// A handle to one result container inside a page.
#[async_trait]
pub trait PageElement: Send + Sync {
    /// Inner text of the first descendant matching `selector`.
    async fn text(&self, selector: &str) -> Option<String>;

    /// Attribute of the first descendant matching `selector`.
    async fn attr(&self, selector: &str, name: &str) -> Option<String>;

    /// Whether any descendant matches.
    async fn exists(&self, selector: &str) -> bool;

    /// Click the first matching descendant. False on miss.
    async fn click(&self, selector: &str) -> bool;

    /// Fill the first matching descendant. False on miss.
    async fn fill(&self, selector: &str, value: &str) -> bool;

    /// All descendants matching `selector`.
    async fn query_all(&self, selector: &str) -> Vec<Box<dyn PageElement>>;
}
