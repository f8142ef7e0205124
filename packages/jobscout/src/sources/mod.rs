//! Job discovery sources.
//!
//! Every source, browser-driven or mailbox-driven, implements
//! [`JobSource`] and yields [`JobPosting`]s tagged with its
//! [`Source`]. Board scraping itself is one engine,
//! [`BoardSource`], parameterized by a per-platform [`BoardSpec`];
//! the platform modules hold only data.

pub mod bayt;
pub mod email_alerts;
pub mod indeed;
pub mod linkedin;

pub use email_alerts::EmailAlertSource;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::browser::{BrowserDriver, BrowserPage};
use crate::config::{AgentConfig, Jitter};
use crate::error::ScrapeResult;
use crate::extract::{extract_field, SelectorSet};
use crate::session::SessionManager;
use crate::types::{JobPosting, Platform, Source};
use crate::antibot;

/// A place jobs come from.
#[async_trait]
pub trait JobSource: Send + Sync {
    fn name(&self) -> &str;

    /// Collect whatever the source currently has. Unit failures inside
    /// (one page, one email) are logged and skipped; only source-level
    /// failures surface as errors.
    async fn discover(&self) -> ScrapeResult<Vec<JobPosting>>;
}

/// What one results page navigation produced.
#[derive(Debug)]
pub enum PageStatus {
    Results(Vec<JobPosting>),
    /// Anti-bot wall; the page is skipped, the search goes on.
    Blocked,
    /// No result containers matched any fallback selector.
    Empty,
}

/// Everything that differs between boards.
pub struct BoardSpec {
    pub platform: Platform,
    pub source: Source,
    /// Results per page when full; a short page means the last one.
    pub page_size: usize,
    /// Resolves relative hrefs boards emit.
    pub base_url: &'static str,
    pub requires_auth: bool,
    pub selectors: SelectorSet,
    /// `(keyword, location, zero-based page index)` to a search URL.
    pub build_search_url: fn(&str, &str, usize) -> String,
}

/// The one scraping engine all boards share.
pub struct BoardSource {
    spec: BoardSpec,
    driver: Arc<dyn BrowserDriver>,
    sessions: Arc<SessionManager>,
    keywords: Vec<String>,
    locations: Vec<String>,
    max_pages: usize,
    jitter: Jitter,
    nav_timeout: Duration,
}

impl BoardSource {
    pub fn new(
        spec: BoardSpec,
        driver: Arc<dyn BrowserDriver>,
        sessions: Arc<SessionManager>,
        config: &AgentConfig,
    ) -> Self {
        Self {
            spec,
            driver,
            sessions,
            keywords: config.keywords.clone(),
            locations: config.locations.clone(),
            max_pages: config.max_pages,
            jitter: config.jitter.clone(),
            nav_timeout: config.op_timeout,
        }
    }

    /// Scrape one results page that the caller already navigated to.
    async fn read_results_page(&self, page: &dyn BrowserPage) -> ScrapeResult<PageStatus> {
        if antibot::page_is_blocked(&page.content().await?) {
            return Ok(PageStatus::Blocked);
        }

        let mut containers = Vec::new();
        for selector in &self.spec.selectors.containers {
            containers = page.query_all(selector).await?;
            if !containers.is_empty() {
                debug!(selector, hits = containers.len(), "containers located");
                break;
            }
        }
        if containers.is_empty() {
            return Ok(PageStatus::Empty);
        }

        let mut jobs = Vec::with_capacity(containers.len());
        for container in &containers {
            let job = self.read_container(container.as_ref()).await;
            // Partial rows are kept; rows below the validity floor are not.
            if job.is_valid() {
                jobs.push(job);
            }
        }
        Ok(PageStatus::Results(jobs))
    }

    async fn read_container(&self, container: &dyn crate::browser::PageElement) -> JobPosting {
        let sel = &self.spec.selectors;
        let mut job = JobPosting::new(self.spec.source);

        job.title = extract_field(container, &sel.title).await.unwrap_or_default();
        job.company = extract_field(container, &sel.company).await.unwrap_or_default();
        job.location = extract_field(container, &sel.location).await.unwrap_or_default();
        job.salary_text = extract_field(container, &sel.salary).await.unwrap_or_default();
        job.description = extract_field(container, &sel.description)
            .await
            .unwrap_or_default();
        if let Some(href) = extract_field(container, &sel.job_url).await {
            job.job_url = resolve_url(self.spec.base_url, &href);
        }
        if let Some(raw) = extract_field(container, &sel.date_posted).await {
            job.date_posted = parse_posted_date(&raw);
        }
        job
    }

    /// Run every keyword x location search to completion.
    async fn scrape_all(&self, page: &dyn BrowserPage) -> ScrapeResult<Vec<JobPosting>> {
        let mut jobs = Vec::new();

        for keyword in &self.keywords {
            for location in &self.locations {
                'pages: for page_idx in 0..self.max_pages {
                    self.jitter.wait().await;
                    let url = (self.spec.build_search_url)(keyword, location, page_idx);

                    if let Err(e) = page.goto(&url, self.nav_timeout).await {
                        // One lost page does not end the search.
                        warn!(url, error = %e, "results page navigation failed");
                        continue;
                    }

                    let status = match self.read_results_page(page).await {
                        Ok(status) => status,
                        Err(e) => {
                            // A broken page reads as zero results; jobs
                            // already collected stay collected.
                            warn!(url, error = %e, "results page read failed");
                            continue;
                        }
                    };

                    match status {
                        PageStatus::Blocked => {
                            warn!(
                                platform = self.spec.platform.as_str(),
                                keyword, location, page_idx, "anti-bot wall, skipping page"
                            );
                            continue;
                        }
                        PageStatus::Empty => {
                            debug!(keyword, location, page_idx, "no results, search exhausted");
                            break 'pages;
                        }
                        PageStatus::Results(page_jobs) => {
                            let count = page_jobs.len();
                            jobs.extend(page_jobs);
                            if count < self.spec.page_size {
                                debug!(keyword, location, page_idx, count, "short page, last one");
                                break 'pages;
                            }
                        }
                    }
                }
            }
        }

        Ok(jobs)
    }
}

#[async_trait]
impl JobSource for BoardSource {
    fn name(&self) -> &str {
        self.spec.platform.as_str()
    }

    async fn discover(&self) -> ScrapeResult<Vec<JobPosting>> {
        let page = self.driver.new_page().await?;

        if self.spec.requires_auth {
            self.sessions
                .establish(page.as_ref(), self.spec.platform)
                .await?;
        }

        let result = self.scrape_all(page.as_ref()).await;
        if let Err(e) = page.close().await {
            debug!(error = %e, "page close failed");
        }

        let jobs = result?;
        info!(
            platform = self.spec.platform.as_str(),
            jobs = jobs.len(),
            "board scrape complete"
        );
        Ok(jobs)
    }
}

/// Boards emit relative hrefs on some layouts.
fn resolve_url(base: &str, href: &str) -> String {
    if href.starts_with('/') {
        format!("{}{}", base.trim_end_matches('/'), href)
    } else {
        href.to_string()
    }
}

/// Only machine-readable dates parse; "3 days ago" stays unset.
fn parse_posted_date(raw: &str) -> Option<chrono::NaiveDate> {
    chrono::NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// Lowercase, hyphen-joined path segment for boards that put the query
/// in the path.
pub(crate) fn slug(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CredentialSet;
    use crate::config::RetryPolicy;
    use crate::session::FileCookieStore;
    use crate::testing::{FakeDriver, FakeElement, FakePage, FakeView, ScriptedStep};

    fn quiet_config() -> AgentConfig {
        let mut config = AgentConfig::new()
            .with_keywords(["ai engineer"])
            .with_locations(["Dubai"])
            .with_max_pages(3);
        config.jitter = Jitter { min_ms: 0, max_ms: 0 };
        config
    }

    fn sessions() -> Arc<SessionManager> {
        let dir = tempfile::tempdir().unwrap();
        Arc::new(SessionManager::new(
            Arc::new(FileCookieStore::new(dir.path().join("cookies"))),
            CredentialSet::new(),
            Duration::from_secs(7 * 24 * 3600),
            RetryPolicy::default(),
            Duration::from_secs(5),
        ))
    }

    fn card(title: &str, url: &str) -> FakeElement {
        FakeElement::new()
            .with_text("h3.base-search-card__title", title)
            .with_text("h4.base-search-card__subtitle", "TechCorp")
            .with_text("span.job-search-card__location", "Dubai, UAE")
            .with_attr("a.base-card__full-link", "href", url)
    }

    fn results_view(cards: Vec<FakeElement>) -> FakeView {
        FakeView::new().with_elements("ul.jobs-search__results-list > li", cards)
    }

    fn unauth_spec() -> BoardSpec {
        let mut spec = linkedin::spec();
        spec.requires_auth = false;
        spec
    }

    #[tokio::test]
    async fn short_page_ends_the_search() {
        // Page size 25; two cards means last page, no further navigation.
        let page = FakePage::new().with_view(results_view(vec![
            card("AI Engineer", "https://l.example/1"),
            card("ML Engineer", "https://l.example/2"),
        ]));
        let source = BoardSource::new(
            unauth_spec(),
            Arc::new(FakeDriver::new(vec![page])),
            sessions(),
            &quiet_config(),
        );

        let jobs = source.discover().await.unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].source, Source::LinkedIn);
        assert_eq!(jobs[0].title, "AI Engineer");
    }

    #[tokio::test]
    async fn blocked_page_is_skipped_and_the_search_continues() {
        // Wall on page one; page two still yields its results.
        let page = FakePage::new()
            .with_step(ScriptedStep::Blocked)
            .with_view(results_view(vec![
                card("AI Engineer", "https://l.example/1"),
                card("ML Engineer", "https://l.example/2"),
            ]));
        let driver = Arc::new(FakeDriver::new(vec![page]));
        let source = BoardSource::new(unauth_spec(), driver, sessions(), &quiet_config());

        let jobs = source.discover().await.unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].title, "AI Engineer");
    }

    #[tokio::test]
    async fn broken_page_reads_as_zero_results_and_keeps_earlier_jobs() {
        // 25 cards fill page one, so pagination continues; page two
        // errors at the protocol level, page three is a short page.
        let full_page: Vec<FakeElement> = (0..25)
            .map(|i| card("AI Engineer", &format!("https://l.example/{i}")))
            .collect();
        let page = FakePage::new()
            .with_view(results_view(full_page))
            .with_step(ScriptedStep::Broken)
            .with_view(results_view(vec![card("ML Engineer", "https://l.example/tail")]));
        let driver = Arc::new(FakeDriver::new(vec![page]));
        let source = BoardSource::new(unauth_spec(), driver, sessions(), &quiet_config());

        let jobs = source.discover().await.unwrap();
        assert_eq!(jobs.len(), 26);
        assert_eq!(jobs[25].title, "ML Engineer");
    }

    #[tokio::test]
    async fn invalid_rows_are_dropped_but_partial_rows_survive() {
        // Second card has no URL and no company, below the floor.
        let partial = FakeElement::new()
            .with_text("h3.base-search-card__title", "Data Analyst")
            .with_text("h4.base-search-card__subtitle", "DataCo");
        let empty = FakeElement::new();
        let page = FakePage::new().with_view(results_view(vec![partial, empty]));
        let source = BoardSource::new(
            unauth_spec(),
            Arc::new(FakeDriver::new(vec![page])),
            sessions(),
            &quiet_config(),
        );

        let jobs = source.discover().await.unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].title, "Data Analyst");
        assert!(jobs[0].job_url.is_empty());
    }

    #[test]
    fn relative_hrefs_resolve_against_the_board() {
        assert_eq!(
            resolve_url("https://ae.indeed.com", "/viewjob?jk=abc"),
            "https://ae.indeed.com/viewjob?jk=abc"
        );
        assert_eq!(
            resolve_url("https://ae.indeed.com", "https://x.example/j"),
            "https://x.example/j"
        );
    }

    #[test]
    fn only_iso_dates_parse() {
        assert_eq!(
            parse_posted_date("2026-08-01"),
            chrono::NaiveDate::from_ymd_opt(2026, 8, 1)
        );
        assert_eq!(parse_posted_date("3 days ago"), None);
    }

    #[test]
    fn slugs_are_lowercase_hyphenated() {
        assert_eq!(slug("  AI   Engineer "), "ai-engineer");
    }
}
