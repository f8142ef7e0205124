//! Scripted fakes for pipeline tests.
//!
//! `FakePage` replays scripted views per navigation so scraper,
//! session and apply flows run without a browser. Collaborator fakes
//! record their calls for assertion.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::browser::{BrowserDriver, BrowserPage, PageElement};
use crate::error::{BoxError, BrowserError, BrowserResult, MailboxError};
use crate::traits::{Alerter, Mailbox, OutboundMailer, ResumeTailor};
use crate::types::{Cookie, EmailMessage, JobPosting, TailorOutput};

/// One rendered page as the fakes see it.
#[derive(Debug, Clone, Default)]
pub struct FakeView {
    /// URL the navigation "landed on" instead of the requested one.
    pub redirect: Option<String>,
    pub content: String,
    pub selectors: HashSet<String>,
    pub elements: HashMap<String, Vec<FakeElement>>,
    pub texts: HashMap<String, String>,
    /// Reads against this view fail with a protocol error.
    pub broken: bool,
}

impl FakeView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content(mut self, content: &str) -> Self {
        self.content = content.to_string();
        self
    }

    pub fn with_selector(mut self, selector: &str) -> Self {
        self.selectors.insert(selector.to_string());
        self
    }

    pub fn with_text(mut self, selector: &str, text: &str) -> Self {
        self.selectors.insert(selector.to_string());
        self.texts.insert(selector.to_string(), text.to_string());
        self
    }

    pub fn with_elements(mut self, selector: &str, elements: Vec<FakeElement>) -> Self {
        self.elements.insert(selector.to_string(), elements);
        self
    }
}

/// A scripted navigation outcome.
#[derive(Debug, Clone)]
pub enum ScriptedStep {
    /// Land on a different URL (checkpoint redirects).
    RedirectTo(String),
    /// Serve a page whose content trips the anti-bot scan.
    Blocked,
    /// Serve a page whose reads error at the protocol level.
    Broken,
    /// Serve a full view.
    View(FakeView),
}

#[derive(Default)]
struct PageLog {
    gotos: Vec<String>,
    clicks: Vec<String>,
    fills: Vec<(String, String)>,
    typed: Vec<(String, String)>,
    files: Vec<(String, PathBuf)>,
    cookies_installed: Vec<Cookie>,
    screenshots: Vec<PathBuf>,
}

/// Scripted browser page. Each `goto` consumes the next queued view;
/// when the queue is empty the base view is served.
pub struct FakePage {
    base: Mutex<FakeView>,
    queue: Mutex<VecDeque<ScriptedStep>>,
    current: Mutex<FakeView>,
    cookies_out: Mutex<Vec<Cookie>>,
    log: Mutex<PageLog>,
}

impl FakePage {
    pub fn new() -> Self {
        Self {
            base: Mutex::new(FakeView::default()),
            queue: Mutex::new(VecDeque::new()),
            current: Mutex::new(FakeView::default()),
            cookies_out: Mutex::new(Vec::new()),
            log: Mutex::new(PageLog::default()),
        }
    }

    /// Add a selector to the base view (always present).
    pub fn with_selector(self, selector: &str) -> Self {
        {
            let mut base = self.base.lock().unwrap();
            base.selectors.insert(selector.to_string());
            *self.current.lock().unwrap() = base.clone();
        }
        self
    }

    /// Queue a scripted navigation outcome.
    pub fn with_step(self, step: ScriptedStep) -> Self {
        self.queue.lock().unwrap().push_back(step);
        self
    }

    /// Queue a full view for the next navigation.
    pub fn with_view(self, view: FakeView) -> Self {
        self.with_step(ScriptedStep::View(view))
    }

    /// Cookies the page reports via `cookies()`.
    pub fn with_cookies(self, cookies: Vec<Cookie>) -> Self {
        *self.cookies_out.lock().unwrap() = cookies;
        self
    }

    pub async fn goto_count(&self) -> usize {
        self.log.lock().unwrap().gotos.len()
    }

    pub async fn goto_log(&self) -> Vec<String> {
        self.log.lock().unwrap().gotos.clone()
    }

    pub async fn cookies_installed(&self) -> usize {
        self.log.lock().unwrap().cookies_installed.len()
    }

    pub async fn typed_values(&self) -> Vec<(String, String)> {
        self.log.lock().unwrap().typed.clone()
    }

    pub async fn clicked(&self) -> Vec<String> {
        self.log.lock().unwrap().clicks.clone()
    }

    pub async fn files_attached(&self) -> Vec<(String, PathBuf)> {
        self.log.lock().unwrap().files.clone()
    }

    fn view(&self) -> FakeView {
        self.current.lock().unwrap().clone()
    }

    fn has(&self, selector: &str) -> bool {
        let view = self.view();
        view.selectors.contains(selector) || view.elements.contains_key(selector)
    }
}

impl Default for FakePage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BrowserPage for FakePage {
    async fn goto(&self, url: &str, _timeout: Duration) -> BrowserResult<()> {
        self.log.lock().unwrap().gotos.push(url.to_string());
        let step = self.queue.lock().unwrap().pop_front();
        let view = match step {
            Some(ScriptedStep::RedirectTo(to)) => FakeView {
                redirect: Some(to),
                ..FakeView::default()
            },
            Some(ScriptedStep::Blocked) => FakeView {
                content: "<html>Security Check: please verify you're a human</html>".into(),
                ..FakeView::default()
            },
            Some(ScriptedStep::Broken) => FakeView {
                broken: true,
                ..FakeView::default()
            },
            Some(ScriptedStep::View(view)) => view,
            None => self.base.lock().unwrap().clone(),
        };
        *self.current.lock().unwrap() = view;
        Ok(())
    }

    async fn current_url(&self) -> BrowserResult<String> {
        let view = self.view();
        if let Some(redirect) = view.redirect {
            return Ok(redirect);
        }
        Ok(self
            .log
            .lock()
            .unwrap()
            .gotos
            .last()
            .cloned()
            .unwrap_or_default())
    }

    async fn content(&self) -> BrowserResult<String> {
        let view = self.view();
        if view.broken {
            return Err(BrowserError::Protocol("page read failed".to_string()));
        }
        Ok(view.content)
    }

    async fn wait_for_selector(&self, selector: &str, _timeout: Duration) -> BrowserResult<bool> {
        Ok(self.has(selector))
    }

    async fn query_all(&self, selector: &str) -> BrowserResult<Vec<Box<dyn PageElement>>> {
        let view = self.view();
        if view.broken {
            return Err(BrowserError::Protocol("page read failed".to_string()));
        }
        Ok(view
            .elements
            .get(selector)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .map(|e| Box::new(e) as Box<dyn PageElement>)
            .collect())
    }

    async fn exists(&self, selector: &str) -> bool {
        self.has(selector)
    }

    async fn text_of(&self, selector: &str) -> Option<String> {
        self.view().texts.get(selector).cloned()
    }

    async fn click(&self, selector: &str) -> BrowserResult<bool> {
        let hit = self.has(selector);
        if hit {
            self.log.lock().unwrap().clicks.push(selector.to_string());
        }
        Ok(hit)
    }

    async fn fill(&self, selector: &str, value: &str) -> BrowserResult<bool> {
        let hit = self.has(selector);
        if hit {
            self.log
                .lock()
                .unwrap()
                .fills
                .push((selector.to_string(), value.to_string()));
        }
        Ok(hit)
    }

    async fn type_slowly(
        &self,
        selector: &str,
        text: &str,
        _delay_min: Duration,
        _delay_max: Duration,
    ) -> BrowserResult<bool> {
        let hit = self.has(selector);
        if hit {
            self.log
                .lock()
                .unwrap()
                .typed
                .push((selector.to_string(), text.to_string()));
        }
        Ok(hit)
    }

    async fn set_files(&self, selector: &str, path: &Path) -> BrowserResult<bool> {
        let hit = self.has(selector);
        if hit {
            self.log
                .lock()
                .unwrap()
                .files
                .push((selector.to_string(), path.to_path_buf()));
        }
        Ok(hit)
    }

    async fn cookies(&self) -> BrowserResult<Vec<Cookie>> {
        Ok(self.cookies_out.lock().unwrap().clone())
    }

    async fn set_cookies(&self, cookies: &[Cookie]) -> BrowserResult<()> {
        self.log
            .lock()
            .unwrap()
            .cookies_installed
            .extend_from_slice(cookies);
        Ok(())
    }

    async fn screenshot(&self, path: &Path) -> BrowserResult<()> {
        self.log
            .lock()
            .unwrap()
            .screenshots
            .push(path.to_path_buf());
        Ok(())
    }

    async fn close(&self) -> BrowserResult<()> {
        Ok(())
    }
}

/// Hands out queued pages; panics in tests that request more pages than
/// were scripted.
pub struct FakeDriver {
    pages: Mutex<VecDeque<FakePage>>,
}

impl FakeDriver {
    pub fn new(pages: Vec<FakePage>) -> Self {
        Self {
            pages: Mutex::new(pages.into()),
        }
    }
}

#[async_trait]
impl BrowserDriver for FakeDriver {
    async fn new_page(&self) -> BrowserResult<Box<dyn BrowserPage>> {
        let page = self
            .pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(FakePage::new);
        Ok(Box::new(page))
    }
}

/// One scripted result container.
#[derive(Debug, Clone, Default)]
pub struct FakeElement {
    texts: HashMap<String, String>,
    attrs: HashMap<(String, String), String>,
    children: HashMap<String, Vec<FakeElement>>,
    clicks: Arc<Mutex<Vec<String>>>,
    fills: Arc<Mutex<Vec<(String, String)>>>,
}

impl FakeElement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, selector: &str, text: &str) -> Self {
        self.texts.insert(selector.to_string(), text.to_string());
        self
    }

    pub fn with_attr(mut self, selector: &str, attr: &str, value: &str) -> Self {
        self.attrs
            .insert((selector.to_string(), attr.to_string()), value.to_string());
        self
    }

    pub fn with_children(mut self, selector: &str, children: Vec<FakeElement>) -> Self {
        self.children.insert(selector.to_string(), children);
        self
    }

    /// Selectors clicked on this element (shared across clones).
    pub fn clicked(&self) -> Vec<String> {
        self.clicks.lock().unwrap().clone()
    }

    pub fn filled(&self) -> Vec<(String, String)> {
        self.fills.lock().unwrap().clone()
    }

    fn matches(&self, selector: &str) -> bool {
        self.texts.contains_key(selector)
            || self.children.contains_key(selector)
            || self.attrs.keys().any(|(s, _)| s == selector)
    }
}

#[async_trait]
impl PageElement for FakeElement {
    async fn text(&self, selector: &str) -> Option<String> {
        self.texts.get(selector).cloned()
    }

    async fn attr(&self, selector: &str, name: &str) -> Option<String> {
        self.attrs
            .get(&(selector.to_string(), name.to_string()))
            .cloned()
    }

    async fn exists(&self, selector: &str) -> bool {
        self.matches(selector)
    }

    async fn click(&self, selector: &str) -> bool {
        if self.matches(selector) {
            self.clicks.lock().unwrap().push(selector.to_string());
            true
        } else {
            false
        }
    }

    async fn fill(&self, selector: &str, value: &str) -> bool {
        if self.matches(selector) {
            self.fills
                .lock()
                .unwrap()
                .push((selector.to_string(), value.to_string()));
            true
        } else {
            false
        }
    }

    async fn query_all(&self, selector: &str) -> Vec<Box<dyn PageElement>> {
        self.children
            .get(selector)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .map(|e| Box::new(e) as Box<dyn PageElement>)
            .collect()
    }
}

/// Mailbox serving a fixed message set.
pub struct StaticMailbox {
    messages: Mutex<Vec<EmailMessage>>,
    read: Mutex<Vec<String>>,
}

impl StaticMailbox {
    pub fn new(messages: Vec<EmailMessage>) -> Self {
        Self {
            messages: Mutex::new(messages),
            read: Mutex::new(Vec::new()),
        }
    }

    pub fn read_ids(&self) -> Vec<String> {
        self.read.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailbox for StaticMailbox {
    async fn fetch_unread(
        &self,
        _label: &str,
        max: usize,
    ) -> Result<Vec<EmailMessage>, MailboxError> {
        let read = self.read.lock().unwrap().clone();
        Ok(self
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| !read.contains(&m.id))
            .take(max)
            .cloned()
            .collect())
    }

    async fn mark_read(&self, id: &str) -> Result<(), MailboxError> {
        self.read.lock().unwrap().push(id.to_string());
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub attachments: Vec<PathBuf>,
}

/// Mailer that records every send.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<SentMail>>,
    /// When set, `send` reports delivery rejection.
    pub reject: bool,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            reject: true,
        }
    }

    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl OutboundMailer for RecordingMailer {
    async fn send(
        &self,
        to: &str,
        subject: &str,
        body: &str,
        attachments: &[PathBuf],
    ) -> Result<bool, BoxError> {
        self.sent.lock().unwrap().push(SentMail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
            attachments: attachments.to_vec(),
        });
        Ok(!self.reject)
    }
}

/// Tailor returning a canned output.
pub struct StaticTailor {
    output: TailorOutput,
}

impl StaticTailor {
    pub fn new(output: TailorOutput) -> Self {
        Self { output }
    }
}

impl Default for StaticTailor {
    fn default() -> Self {
        Self {
            output: TailorOutput {
                delta_resume: None,
                cover_letter: "Dear hiring team,".to_string(),
                recruiter_email: None,
            },
        }
    }
}

#[async_trait]
impl ResumeTailor for StaticTailor {
    async fn tailor(&self, _job: &JobPosting) -> Result<TailorOutput, BoxError> {
        Ok(self.output.clone())
    }
}

/// Alerter that drops everything.
pub struct NullAlerter;

#[async_trait]
impl Alerter for NullAlerter {
    async fn notify(&self, _message: &str) {}
}

/// Alerter that records messages for assertion.
#[derive(Default)]
pub struct RecordingAlerter {
    notes: Mutex<Vec<String>>,
}

impl RecordingAlerter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.notes.lock().unwrap().clone()
    }
}

#[async_trait]
impl Alerter for RecordingAlerter {
    async fn notify(&self, message: &str) {
        self.notes.lock().unwrap().push(message.to_string());
    }
}
