//! Full-run behavior: discovery, dedup against the store, salary floor,
//! dispatch, and failure isolation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use jobscout::agent::{JobAgent, RunSummary};
use jobscout::apply::WebFormEngine;
use jobscout::config::AgentConfig;
use jobscout::dispatch::Dispatcher;
use jobscout::error::{ScrapeError, SessionError};
use jobscout::sources::{EmailAlertSource, JobSource};
use jobscout::testing::{
    FakeDriver, RecordingAlerter, RecordingMailer, StaticMailbox, StaticTailor,
};
use jobscout::trackers::MemoryTracker;
use jobscout::traits::TrackedField;
use jobscout::types::{EmailMessage, JobPosting, UserProfile};

struct BrokenSource;

#[async_trait]
impl JobSource for BrokenSource {
    fn name(&self) -> &str {
        "broken_board"
    }

    async fn discover(&self) -> Result<Vec<JobPosting>, ScrapeError> {
        Err(ScrapeError::Session(SessionError::LoginFailed {
            platform: "linkedin".into(),
            attempts: 3,
        }))
    }
}

fn alert(id: &str, title: &str, view_id: u64) -> EmailMessage {
    EmailMessage {
        id: id.into(),
        subject: "New jobs for you".into(),
        sender: "alerts@example.com".into(),
        body: format!(
            "{title} at TechCorp\nDubai, UAE\nhttps://www.linkedin.com/jobs/view/{view_id}"
        ),
    }
}

fn agent(
    tracker: Arc<MemoryTracker>,
    alerter: Arc<RecordingAlerter>,
    sources: Vec<Box<dyn JobSource>>,
    config: AgentConfig,
) -> JobAgent {
    let engine = WebFormEngine::new(Arc::new(FakeDriver::new(vec![])), Duration::from_secs(5));
    let dispatcher = Dispatcher::new(
        tracker.clone(),
        Arc::new(RecordingMailer::new()),
        Arc::new(StaticTailor::default()),
        engine,
        UserProfile::default(),
        false,
        false,
    );
    JobAgent::new(
        config,
        sources,
        tracker,
        Arc::new(StaticTailor::default()),
        alerter,
        dispatcher,
    )
}

#[tokio::test]
async fn known_urls_are_excluded_and_new_jobs_dispatch() {
    let known = "https://www.linkedin.com/jobs/view/1";
    let tracker = Arc::new(MemoryTracker::new().with_existing_urls([known]));
    let alerter = Arc::new(RecordingAlerter::new());

    let mailbox = Arc::new(StaticMailbox::new(vec![
        alert("m1", "Senior AI Engineer", 1),
        alert("m2", "Staff ML Engineer", 2),
    ]));
    let sources: Vec<Box<dyn JobSource>> =
        vec![Box::new(EmailAlertSource::new(mailbox, "Job Alerts"))];

    let summary = agent(tracker.clone(), alerter, sources, AgentConfig::new()).run().await;

    assert_eq!(summary.discovered, 2);
    assert_eq!(summary.new_jobs, 1);
    assert_eq!(summary.dispatched, 1);
    assert_eq!(summary.source_failures, 0);

    let rows = tracker.rows().await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].title, "Staff ML Engineer");
    // Email job with only a view URL: apply_url == job_url, auto-apply
    // off, so it lands in manual review.
    assert_eq!(
        tracker
            .field("https://www.linkedin.com/jobs/view/2", TrackedField::Notes)
            .await
            .as_deref(),
        Some("Manual review required (auto-apply off)")
    );
}

#[tokio::test]
async fn one_failing_source_alerts_but_does_not_stop_the_run() {
    let tracker = Arc::new(MemoryTracker::new());
    let alerter = Arc::new(RecordingAlerter::new());

    let mailbox = Arc::new(StaticMailbox::new(vec![alert("m1", "AI Engineer", 7)]));
    let sources: Vec<Box<dyn JobSource>> = vec![
        Box::new(BrokenSource),
        Box::new(EmailAlertSource::new(mailbox, "Job Alerts")),
    ];

    let summary = agent(tracker.clone(), alerter.clone(), sources, AgentConfig::new())
        .run()
        .await;

    assert_eq!(summary.source_failures, 1);
    assert_eq!(summary.new_jobs, 1);
    assert_eq!(tracker.rows().await.len(), 1);

    let messages = alerter.messages();
    assert!(messages.iter().any(|m| m.contains("broken_board")));
}

#[tokio::test]
async fn salary_floor_drops_only_parseable_lowball_offers() {
    let tracker = Arc::new(MemoryTracker::new());
    let alerter = Arc::new(RecordingAlerter::new());

    let lowball = EmailMessage {
        id: "m1".into(),
        subject: "jobs".into(),
        sender: "alerts@example.com".into(),
        body: "Junior QA Engineer at SmallCo\nDubai, UAE\nSalary: AED 3,000 per month\n\
               https://www.linkedin.com/jobs/view/10"
            .into(),
    };
    let unpriced = alert("m2", "Senior AI Engineer", 11);
    let mailbox = Arc::new(StaticMailbox::new(vec![lowball, unpriced]));
    let sources: Vec<Box<dyn JobSource>> =
        vec![Box::new(EmailAlertSource::new(mailbox, "Job Alerts"))];

    let config = AgentConfig::new().with_min_monthly_aed(10_000);
    let summary = agent(tracker.clone(), alerter, sources, config).run().await;

    assert_eq!(summary.new_jobs, 2);
    assert_eq!(summary.below_salary_floor, 1);
    assert_eq!(summary.dispatched, 1);

    let rows = tracker.rows().await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].title, "Senior AI Engineer");
}

#[tokio::test]
async fn empty_run_produces_a_quiet_summary() {
    let tracker = Arc::new(MemoryTracker::new());
    let alerter = Arc::new(RecordingAlerter::new());
    let mailbox = Arc::new(StaticMailbox::new(vec![]));
    let sources: Vec<Box<dyn JobSource>> =
        vec![Box::new(EmailAlertSource::new(mailbox, "Job Alerts"))];

    let summary = agent(tracker, alerter.clone(), sources, AgentConfig::new()).run().await;

    assert_eq!(summary, RunSummary::default());
    assert!(alerter.messages().is_empty());
}
