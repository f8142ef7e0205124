//! Web-form application engine.
//!
//! One engine drives every board's apply flow; the per-platform
//! differences (trigger, field map, question markup, success
//! indicators) are data in [`ApplyFlow`]. Supplementary questions get
//! a fixed default answer (first option, or an affirmative text) —
//! completion is favored over per-question accuracy, and the outcome
//! note tells the operator which path ran.

mod indeed;
mod linkedin;

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::antibot;
use crate::browser::{BrowserDriver, BrowserPage};
use crate::error::BrowserResult;
use crate::types::{JobPosting, Platform, UserProfile};

/// Pause after clicks that mutate the form.
const FORM_SETTLE: Duration = Duration::from_millis(1500);

/// How long to wait for a success indicator after submitting.
const SUBMIT_SETTLE: Duration = Duration::from_secs(10);

const AFFIRMATIVE_SHORT: &str = "Yes";
const AFFIRMATIVE_LONG: &str = "I am interested in this position and meet the requirements.";

/// Terminal state of one apply attempt. Only [`ApplyResult::Submitted`]
/// counts as success; everything else carries the note the dispatcher
/// records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyResult {
    Submitted,
    /// Anti-bot wall on the apply page; never retried there.
    AntiBot,
    /// Page layout had no recognizable trigger or submit control.
    UnsupportedLayout { missing: String },
    /// Submitted but no success indicator appeared.
    NoSuccessIndicator,
    /// Navigation or driver failure.
    Failed { reason: String },
}

impl ApplyResult {
    pub fn succeeded(&self) -> bool {
        matches!(self, ApplyResult::Submitted)
    }

    /// Operator-facing note for the tracking store.
    pub fn note(&self) -> String {
        match self {
            ApplyResult::Submitted => "application submitted".to_string(),
            ApplyResult::AntiBot => {
                "Manual review required: CAPTCHA/anti-bot detected".to_string()
            }
            ApplyResult::UnsupportedLayout { missing } => {
                format!("Manual review required: unsupported layout ({missing})")
            }
            ApplyResult::NoSuccessIndicator => {
                "Manual review required: no success message after submit".to_string()
            }
            ApplyResult::Failed { reason } => {
                format!("Manual review required: apply failed ({reason})")
            }
        }
    }
}

/// Everything that differs between boards' apply flows.
pub struct ApplyFlow {
    pub platform: Platform,
    /// Control that opens the application form.
    pub triggers: &'static [&'static str],
    /// Profile key to input selector.
    pub fields: &'static [(&'static str, &'static str)],
    pub resume_input: &'static str,
    /// Containers holding supplementary questions.
    pub question_containers: &'static [&'static str],
    pub submit: &'static [&'static str],
    pub success_indicators: &'static [&'static str],
}

fn flow_for(platform: Platform) -> Option<&'static ApplyFlow> {
    match platform {
        Platform::LinkedIn => Some(linkedin::flow()),
        Platform::Indeed => Some(indeed::flow()),
        Platform::Bayt => None,
    }
}

pub struct WebFormEngine {
    driver: Arc<dyn BrowserDriver>,
    nav_timeout: Duration,
    /// Failure screenshots land here when set.
    screenshot_dir: Option<std::path::PathBuf>,
}

impl WebFormEngine {
    pub fn new(driver: Arc<dyn BrowserDriver>, nav_timeout: Duration) -> Self {
        Self {
            driver,
            nav_timeout,
            screenshot_dir: None,
        }
    }

    pub fn with_screenshot_dir(mut self, dir: impl Into<std::path::PathBuf>) -> Self {
        self.screenshot_dir = Some(dir.into());
        self
    }

    /// Drive one application end to end. Driver failures are folded
    /// into [`ApplyResult::Failed`]; nothing propagates to the
    /// dispatcher.
    pub async fn apply_to_job(&self, job: &JobPosting, profile: &UserProfile) -> ApplyResult {
        let Some(platform) = job.source.platform() else {
            return ApplyResult::UnsupportedLayout {
                missing: format!("no automation flow for source {:?}", job.source),
            };
        };
        let Some(flow) = flow_for(platform) else {
            return ApplyResult::UnsupportedLayout {
                missing: format!("no automation flow for {}", platform.as_str()),
            };
        };

        let apply_url = job.apply_target();
        if apply_url.is_empty() {
            return ApplyResult::Failed {
                reason: "no apply url".to_string(),
            };
        }

        let result = match self.run_flow(flow, apply_url, profile).await {
            Ok(result) => result,
            Err(e) => ApplyResult::Failed {
                reason: e.to_string(),
            },
        };

        match &result {
            ApplyResult::Submitted => {
                info!(title = %job.title, company = %job.company, "application submitted")
            }
            other => {
                warn!(title = %job.title, company = %job.company, note = %other.note(), "application not submitted")
            }
        }
        result
    }

    async fn run_flow(
        &self,
        flow: &ApplyFlow,
        apply_url: &str,
        profile: &UserProfile,
    ) -> BrowserResult<ApplyResult> {
        let page = self.driver.new_page().await?;
        let result = self.run_flow_on(page.as_ref(), flow, apply_url, profile).await;
        match &result {
            Ok(ApplyResult::Submitted) => {}
            _ => self.capture_failure(page.as_ref(), flow.platform).await,
        }
        if let Err(e) = page.close().await {
            debug!(error = %e, "apply page close failed");
        }
        result
    }

    /// Best-effort postmortem screenshot.
    async fn capture_failure(&self, page: &dyn BrowserPage, platform: Platform) {
        let Some(dir) = &self.screenshot_dir else {
            return;
        };
        let stamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
        let path = dir.join(format!("apply_{}_{stamp}.png", platform.as_str()));
        if let Err(e) = page.screenshot(&path).await {
            debug!(error = %e, "failure screenshot not captured");
        }
    }

    async fn run_flow_on(
        &self,
        page: &dyn BrowserPage,
        flow: &ApplyFlow,
        apply_url: &str,
        profile: &UserProfile,
    ) -> BrowserResult<ApplyResult> {
        page.goto(apply_url, self.nav_timeout).await?;

        if antibot::page_is_blocked(&page.content().await?)
            || antibot::url_is_checkpoint(&page.current_url().await?)
        {
            return Ok(ApplyResult::AntiBot);
        }

        let mut triggered = false;
        for trigger in flow.triggers {
            if page.click(trigger).await? {
                triggered = true;
                break;
            }
        }
        if !triggered {
            return Ok(ApplyResult::UnsupportedLayout {
                missing: "apply trigger".to_string(),
            });
        }
        tokio::time::sleep(FORM_SETTLE).await;

        // Empty profile values are skipped, and a missing input is not
        // an error; forms vary in which fields they ask for.
        for (key, selector) in flow.fields {
            let value = profile.field(key);
            if value.is_empty() {
                continue;
            }
            if !page.fill(selector, value).await? {
                debug!(field = key, "form input not present");
            }
        }
        if let Some(resume) = &profile.resume_path {
            if !page.set_files(flow.resume_input, resume).await? {
                debug!("resume input not present");
            }
        }

        self.answer_questions(page, flow).await?;

        let mut submitted = false;
        for submit in flow.submit {
            if page.click(submit).await? {
                submitted = true;
                break;
            }
        }
        if !submitted {
            return Ok(ApplyResult::UnsupportedLayout {
                missing: "submit control".to_string(),
            });
        }

        for indicator in flow.success_indicators {
            if page.wait_for_selector(indicator, SUBMIT_SETTLE).await? {
                return Ok(ApplyResult::Submitted);
            }
        }
        Ok(ApplyResult::NoSuccessIndicator)
    }

    /// Default-answer every supplementary question the form shows.
    async fn answer_questions(
        &self,
        page: &dyn BrowserPage,
        flow: &ApplyFlow,
    ) -> BrowserResult<()> {
        let mut containers = Vec::new();
        for selector in flow.question_containers {
            containers = page.query_all(selector).await?;
            if !containers.is_empty() {
                break;
            }
        }

        for container in &containers {
            // First option for choice controls, affirmative text for
            // free-form ones.
            if container.click("input[type='radio']").await
                || container.click("input[type='checkbox']").await
            {
                continue;
            }
            if container.fill("input[type='text']", AFFIRMATIVE_SHORT).await {
                continue;
            }
            if container.fill("textarea", AFFIRMATIVE_LONG).await {
                continue;
            }
            debug!("question container with no recognized control");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeDriver, FakeElement, FakePage, FakeView, ScriptedStep};
    use crate::types::Source;
    use std::path::PathBuf;

    fn engine(page: FakePage) -> WebFormEngine {
        WebFormEngine::new(
            Arc::new(FakeDriver::new(vec![page])),
            Duration::from_secs(5),
        )
    }

    fn profile() -> UserProfile {
        UserProfile {
            name: "Avery Example".into(),
            email: "avery@example.com".into(),
            phone: "+971500000000".into(),
            resume_path: Some(PathBuf::from("/tmp/resume.pdf")),
        }
    }

    fn linkedin_job() -> JobPosting {
        let mut job = JobPosting::new(Source::LinkedIn);
        job.title = "AI Engineer".into();
        job.company = "TechCorp".into();
        job.job_url = "https://www.linkedin.com/jobs/view/1".into();
        job.apply_url = Some("https://www.linkedin.com/jobs/view/1".into());
        job
    }

    fn full_linkedin_form() -> FakePage {
        FakePage::new()
            .with_selector("button[data-control-name='jobdetails_topcard_inapply']")
            .with_selector("input[name='name']")
            .with_selector("input[name='email']")
            .with_selector("input[name='phone']")
            .with_selector("input[type='file']")
            .with_selector("button[aria-label='Submit application']")
            .with_selector(".jobs-easy-apply-success-message")
    }

    #[tokio::test]
    async fn happy_path_submits_and_reports_success() {
        let result = engine(full_linkedin_form())
            .apply_to_job(&linkedin_job(), &profile())
            .await;
        assert_eq!(result, ApplyResult::Submitted);
        assert!(result.succeeded());
    }

    #[tokio::test]
    async fn anti_bot_wall_aborts_before_any_interaction() {
        let page = FakePage::new().with_step(ScriptedStep::Blocked);
        let result = engine(page).apply_to_job(&linkedin_job(), &profile()).await;
        assert_eq!(result, ApplyResult::AntiBot);
        assert!(result.note().contains("CAPTCHA"));
    }

    #[tokio::test]
    async fn missing_trigger_is_unsupported_layout() {
        let page = FakePage::new().with_view(FakeView::new().with_selector("div.job-details"));
        let result = engine(page).apply_to_job(&linkedin_job(), &profile()).await;
        assert!(matches!(result, ApplyResult::UnsupportedLayout { .. }));
        assert!(result.note().contains("apply trigger"));
    }

    #[tokio::test]
    async fn submit_without_success_indicator_degrades() {
        let page = FakePage::new()
            .with_selector("button[data-control-name='jobdetails_topcard_inapply']")
            .with_selector("button[aria-label='Submit application']");
        let result = engine(page).apply_to_job(&linkedin_job(), &profile()).await;
        assert_eq!(result, ApplyResult::NoSuccessIndicator);
    }

    #[tokio::test]
    async fn questions_get_first_option_or_affirmative_text() {
        let radio_q = FakeElement::new().with_attr("input[type='radio']", "name", "q1");
        let text_q = FakeElement::new().with_attr("input[type='text']", "name", "q2");
        let page = full_linkedin_form().with_view(
            FakeView::new()
                .with_selector("button[data-control-name='jobdetails_topcard_inapply']")
                .with_selector("button[aria-label='Submit application']")
                .with_selector(".jobs-easy-apply-success-message")
                .with_elements(
                    ".jobs-easy-apply-form-element",
                    vec![radio_q.clone(), text_q.clone()],
                ),
        );
        let result = engine(page).apply_to_job(&linkedin_job(), &profile()).await;
        assert_eq!(result, ApplyResult::Submitted);
        assert_eq!(radio_q.clicked(), vec!["input[type='radio']"]);
        assert_eq!(
            text_q.filled(),
            vec![("input[type='text']".to_string(), AFFIRMATIVE_SHORT.to_string())]
        );
    }

    #[tokio::test]
    async fn sources_without_a_flow_are_unsupported() {
        let mut job = linkedin_job();
        job.source = Source::GenericEmail;
        let result = engine(FakePage::new())
            .apply_to_job(&job, &profile())
            .await;
        assert!(matches!(result, ApplyResult::UnsupportedLayout { .. }));
    }
}
