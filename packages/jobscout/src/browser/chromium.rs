//! Chromium-backed driver using chromiumoxide.
//!
//! Element operations resolve through in-page JavaScript rather than CDP
//! node handles: board markup mutates under us, and a stale node id is a
//! hard protocol error where a re-resolved selector is just a miss. The
//! one exception is file upload, which has no JS path.

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::dom::SetFileInputFilesParams;
use chromiumoxide::cdp::browser_protocol::network::{CookieParam, TimeSinceEpoch};
use chromiumoxide::page::{Page, ScreenshotParams};
use futures::StreamExt;
use rand::Rng;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::task::JoinHandle;

use super::{BrowserDriver, BrowserPage, DriverOptions, PageElement};
use crate::error::{BrowserError, BrowserResult};
use crate::types::Cookie;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Suppresses the fingerprints board checkpoints key on first.
const STEALTH_SCRIPT: &str = r#"
Object.defineProperty(navigator, 'webdriver', { get: () => undefined });
Object.defineProperty(navigator, 'languages', { get: () => ['en-US', 'en'] });
Object.defineProperty(navigator, 'plugins', { get: () => [1, 2, 3, 4, 5] });
window.chrome = window.chrome || { runtime: {} };
"#;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Locate a chrome binary: env override, then PATH, then well-known paths.
pub fn find_chromium() -> Option<PathBuf> {
    if let Ok(p) = std::env::var("JOBSCOUT_CHROME_PATH") {
        let path = PathBuf::from(&p);
        if path.exists() {
            return Some(path);
        }
    }

    for name in ["google-chrome", "chromium", "chromium-browser"] {
        if let Ok(path) = which::which(name) {
            return Some(path);
        }
    }

    if cfg!(target_os = "macos") {
        let common = PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome");
        if common.exists() {
            return Some(common);
        }
    }

    None
}

/// A launched chromium process. Pages share the process but get their
/// own targets.
pub struct ChromiumDriver {
    browser: Browser,
    handler: JoinHandle<()>,
}

impl ChromiumDriver {
    pub async fn launch(options: &DriverOptions) -> BrowserResult<Self> {
        let chrome_path = match &options.chrome_path {
            Some(p) => p.clone(),
            None => find_chromium()
                .ok_or_else(|| BrowserError::Launch("no chrome binary found".into()))?,
        };

        let mut builder = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--window-size=1366,768")
            .arg("--lang=en-US");

        if options.headful {
            builder = builder.with_head();
        } else {
            builder = builder.arg("--headless=new");
        }
        if let Some(proxy) = &options.proxy {
            builder = builder.arg(format!("--proxy-server={proxy}"));
        }

        let config = builder.build().map_err(BrowserError::Launch)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        Ok(Self { browser, handler })
    }

    pub async fn shutdown(mut self) -> BrowserResult<()> {
        self.browser
            .close()
            .await
            .map_err(|e| BrowserError::Protocol(e.to_string()))?;
        self.handler.abort();
        Ok(())
    }
}

#[async_trait]
impl BrowserDriver for ChromiumDriver {
    async fn new_page(&self) -> BrowserResult<Box<dyn BrowserPage>> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::Protocol(e.to_string()))?;

        page.set_user_agent(USER_AGENT)
            .await
            .map_err(|e| BrowserError::Protocol(e.to_string()))?;
        page.evaluate_on_new_document(STEALTH_SCRIPT.to_string())
            .await
            .map_err(|e| BrowserError::Protocol(e.to_string()))?;

        Ok(Box::new(ChromiumPage { page }))
    }
}

pub struct ChromiumPage {
    page: Page,
}

/// One hop in an element path: the Nth match of a selector under the
/// previous node.
type Hop = (String, usize);

/// Emit JS that walks `path` from `document`, leaving the resolved node
/// in `node` (or returning `null` early on a miss).
fn js_resolve(path: &[Hop]) -> String {
    let mut out = String::from("let node = document;\n");
    for (selector, index) in path {
        let sel = js_str(selector);
        out.push_str(&format!(
            "node = node.querySelectorAll({sel})[{index}];\nif (!node) return null;\n"
        ));
    }
    out
}

/// JSON-escape a string for safe embedding in a JS snippet.
fn js_str(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| "\"\"".into())
}

async fn eval<T: DeserializeOwned>(page: &Page, body: &str) -> BrowserResult<T> {
    let script = format!("(() => {{\n{body}\n}})()");
    let result = page
        .evaluate(script)
        .await
        .map_err(|e| BrowserError::Protocol(e.to_string()))?;
    result
        .into_value()
        .map_err(|e| BrowserError::Protocol(format!("evaluate result: {e:?}")))
}

/// Element-level read: a protocol failure degrades to a miss.
async fn eval_opt<T: DeserializeOwned>(page: &Page, body: &str) -> Option<T> {
    eval::<Option<T>>(page, body).await.ok().flatten()
}

impl ChromiumPage {
    async fn count_matches(&self, path: &[Hop], selector: &str) -> usize {
        let body = format!(
            "{}return node.querySelectorAll({}).length;",
            js_resolve(path),
            js_str(selector)
        );
        eval_opt::<usize>(&self.page, &body).await.unwrap_or(0)
    }

    fn element_at(&self, path: Vec<Hop>) -> Box<dyn PageElement> {
        Box::new(ChromiumElement {
            page: self.page.clone(),
            path,
        })
    }
}

#[async_trait]
impl BrowserPage for ChromiumPage {
    async fn goto(&self, url: &str, timeout: Duration) -> BrowserResult<()> {
        let nav = tokio::time::timeout(timeout, async {
            self.page.goto(url).await?;
            self.page.wait_for_navigation().await?;
            Ok::<_, chromiumoxide::error::CdpError>(())
        })
        .await;

        match nav {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(BrowserError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            }),
            Err(_) => Err(BrowserError::Timeout {
                op: format!("goto {url}"),
                millis: timeout.as_millis() as u64,
            }),
        }
    }

    async fn current_url(&self) -> BrowserResult<String> {
        let url = self
            .page
            .url()
            .await
            .map_err(|e| BrowserError::Protocol(e.to_string()))?;
        Ok(url.map(|u| u.to_string()).unwrap_or_default())
    }

    async fn content(&self) -> BrowserResult<String> {
        eval(
            &self.page,
            "return document.documentElement.outerHTML || '';",
        )
        .await
    }

    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> BrowserResult<bool> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if self.exists(selector).await {
                return Ok(true);
            }
            if tokio::time::Instant::now() >= deadline {
                return Ok(false);
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn query_all(&self, selector: &str) -> BrowserResult<Vec<Box<dyn PageElement>>> {
        let count = self.count_matches(&[], selector).await;
        Ok((0..count)
            .map(|i| self.element_at(vec![(selector.to_string(), i)]))
            .collect())
    }

    async fn exists(&self, selector: &str) -> bool {
        let body = format!("return document.querySelector({}) !== null;", js_str(selector));
        eval_opt::<bool>(&self.page, &body).await.unwrap_or(false)
    }

    async fn text_of(&self, selector: &str) -> Option<String> {
        let body = format!(
            "const el = document.querySelector({});\nreturn el ? el.innerText : null;",
            js_str(selector)
        );
        eval_opt::<String>(&self.page, &body)
            .await
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    }

    async fn click(&self, selector: &str) -> BrowserResult<bool> {
        let body = format!(
            "const el = document.querySelector({});\nif (!el) return false;\nel.click();\nreturn true;",
            js_str(selector)
        );
        eval(&self.page, &body).await
    }

    async fn fill(&self, selector: &str, value: &str) -> BrowserResult<bool> {
        let body = format!(
            "const el = document.querySelector({sel});\nif (!el) return false;\n\
             el.focus();\nel.value = {val};\n\
             el.dispatchEvent(new Event('input', {{ bubbles: true }}));\n\
             el.dispatchEvent(new Event('change', {{ bubbles: true }}));\nreturn true;",
            sel = js_str(selector),
            val = js_str(value),
        );
        eval(&self.page, &body).await
    }

    async fn type_slowly(
        &self,
        selector: &str,
        text: &str,
        delay_min: Duration,
        delay_max: Duration,
    ) -> BrowserResult<bool> {
        let focus = format!(
            "const el = document.querySelector({sel});\nif (!el) return false;\n\
             el.focus();\nel.value = '';\nreturn true;",
            sel = js_str(selector),
        );
        if !eval::<bool>(&self.page, &focus).await? {
            return Ok(false);
        }

        let chars: Vec<String> = text.chars().map(|c| c.to_string()).collect();
        // Sample every delay up front; the rng handle is not Send.
        let delays: Vec<u64> = {
            let mut rng = rand::rng();
            let (lo, hi) = (delay_min.as_millis() as u64, delay_max.as_millis() as u64);
            chars
                .iter()
                .map(|_| if hi > lo { rng.random_range(lo..=hi) } else { lo })
                .collect()
        };

        for (ch, delay) in chars.iter().zip(delays) {
            let body = format!(
                "const el = document.querySelector({sel});\nif (!el) return false;\n\
                 el.value += {ch};\n\
                 el.dispatchEvent(new Event('input', {{ bubbles: true }}));\nreturn true;",
                sel = js_str(selector),
                ch = js_str(ch),
            );
            if !eval::<bool>(&self.page, &body).await? {
                return Ok(false);
            }
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        Ok(true)
    }

    async fn set_files(&self, selector: &str, path: &Path) -> BrowserResult<bool> {
        // The only element-handle operation: file inputs are unreachable
        // from page JS.
        let element = match self.page.find_element(selector).await {
            Ok(el) => el,
            Err(_) => return Ok(false),
        };

        let params = SetFileInputFilesParams::builder()
            .file(path.to_string_lossy())
            .backend_node_id(element.backend_node_id)
            .build()
            .map_err(BrowserError::Protocol)?;
        self.page
            .execute(params)
            .await
            .map_err(|e| BrowserError::Protocol(e.to_string()))?;
        Ok(true)
    }

    async fn cookies(&self) -> BrowserResult<Vec<Cookie>> {
        let raw = self
            .page
            .get_cookies()
            .await
            .map_err(|e| BrowserError::Protocol(e.to_string()))?;

        Ok(raw
            .into_iter()
            .map(|c| Cookie {
                name: c.name,
                value: c.value,
                domain: c.domain,
                path: c.path,
                expires: (c.expires >= 0.0).then_some(c.expires),
                secure: c.secure,
                http_only: c.http_only,
            })
            .collect())
    }

    async fn set_cookies(&self, cookies: &[Cookie]) -> BrowserResult<()> {
        let params = cookie_params(cookies)?;
        self.page
            .set_cookies(params)
            .await
            .map_err(|e| BrowserError::Protocol(e.to_string()))?;
        Ok(())
    }

    async fn screenshot(&self, path: &Path) -> BrowserResult<()> {
        self.page
            .save_screenshot(ScreenshotParams::builder().full_page(true).build(), path)
            .await
            .map_err(|e| BrowserError::Protocol(e.to_string()))?;
        Ok(())
    }

    async fn close(&self) -> BrowserResult<()> {
        // Page::close consumes the receiver; Page is a cheap handle clone.
        self.page
            .clone()
            .close()
            .await
            .map_err(|e| BrowserError::Protocol(e.to_string()))?;
        Ok(())
    }
}

/// CDP cookie params for a saved jar. Session cookies have no expiry;
/// persistent ones keep theirs so a restored jar outlives the browser.
fn cookie_params(cookies: &[Cookie]) -> BrowserResult<Vec<CookieParam>> {
    let mut params = Vec::with_capacity(cookies.len());
    for c in cookies {
        let mut builder = CookieParam::builder()
            .name(&c.name)
            .value(&c.value)
            .domain(&c.domain)
            .path(&c.path)
            .secure(c.secure)
            .http_only(c.http_only);
        if let Some(expires) = c.expires {
            builder = builder.expires(TimeSinceEpoch::new(expires));
        }
        params.push(builder.build().map_err(BrowserError::Protocol)?);
    }
    Ok(params)
}

struct ChromiumElement {
    page: Page,
    path: Vec<Hop>,
}

impl ChromiumElement {
    fn descend(&self, selector: &str, index: usize) -> Vec<Hop> {
        let mut path = self.path.clone();
        path.push((selector.to_string(), index));
        path
    }
}

#[async_trait]
impl PageElement for ChromiumElement {
    async fn text(&self, selector: &str) -> Option<String> {
        let body = format!(
            "{}const el = node.querySelector({});\nreturn el ? el.innerText : null;",
            js_resolve(&self.path),
            js_str(selector)
        );
        eval_opt::<String>(&self.page, &body)
            .await
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    }

    async fn attr(&self, selector: &str, name: &str) -> Option<String> {
        let body = format!(
            "{}const el = node.querySelector({});\nif (!el) return null;\nreturn el.getAttribute({});",
            js_resolve(&self.path),
            js_str(selector),
            js_str(name)
        );
        eval_opt::<String>(&self.page, &body)
            .await
            .filter(|v| !v.is_empty())
    }

    async fn exists(&self, selector: &str) -> bool {
        let body = format!(
            "{}return node.querySelector({}) !== null;",
            js_resolve(&self.path),
            js_str(selector)
        );
        eval_opt::<bool>(&self.page, &body).await.unwrap_or(false)
    }

    async fn click(&self, selector: &str) -> bool {
        let body = format!(
            "{}const el = node.querySelector({});\nif (!el) return false;\nel.click();\nreturn true;",
            js_resolve(&self.path),
            js_str(selector)
        );
        eval_opt::<bool>(&self.page, &body).await.unwrap_or(false)
    }

    async fn fill(&self, selector: &str, value: &str) -> bool {
        let body = format!(
            "{}const el = node.querySelector({sel});\nif (!el) return false;\n\
             el.focus();\nel.value = {val};\n\
             el.dispatchEvent(new Event('input', {{ bubbles: true }}));\n\
             el.dispatchEvent(new Event('change', {{ bubbles: true }}));\nreturn true;",
            js_resolve(&self.path),
            sel = js_str(selector),
            val = js_str(value),
        );
        eval_opt::<bool>(&self.page, &body).await.unwrap_or(false)
    }

    async fn query_all(&self, selector: &str) -> Vec<Box<dyn PageElement>> {
        let body = format!(
            "{}return node.querySelectorAll({}).length;",
            js_resolve(&self.path),
            js_str(selector)
        );
        let count = eval_opt::<usize>(&self.page, &body).await.unwrap_or(0);
        (0..count)
            .map(|i| {
                Box::new(ChromiumElement {
                    page: self.page.clone(),
                    path: self.descend(selector, i),
                }) as Box<dyn PageElement>
            })
            .collect()
    }
}
