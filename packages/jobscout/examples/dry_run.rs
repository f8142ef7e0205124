//! End-to-end dry run against in-memory collaborators.
//!
//! Feeds one job-alert email through the full discover/dedupe/dispatch
//! pipeline without touching a browser, a mailbox, or a spreadsheet.
//!
//! ```sh
//! cargo run -p jobscout --example dry_run
//! ```

use std::sync::Arc;
use std::time::Duration;

use jobscout::apply::WebFormEngine;
use jobscout::testing::{FakeDriver, NullAlerter, RecordingMailer, StaticMailbox, StaticTailor};
use jobscout::trackers::MemoryTracker;
use jobscout::types::{EmailMessage, UserProfile};
use jobscout::{AgentConfig, Dispatcher, JobAgent};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const SAMPLE_ALERT: &str = "\
Senior Backend Engineer at Acme Logistics
Dubai, United Arab Emirates
https://www.linkedin.com/jobs/view/4011223344
";

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,jobscout=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mailbox = Arc::new(StaticMailbox::new(vec![EmailMessage {
        id: "msg-1".to_string(),
        subject: "30+ new jobs for you".to_string(),
        sender: "jobalerts-noreply@linkedin.com".to_string(),
        body: SAMPLE_ALERT.to_string(),
    }]));

    let tracker = Arc::new(MemoryTracker::new());
    let mailer = Arc::new(RecordingMailer::new());
    let tailor = Arc::new(StaticTailor::default());

    let config = AgentConfig::default();
    let engine = WebFormEngine::new(Arc::new(FakeDriver::new(vec![])), Duration::from_secs(5));
    let dispatcher = Dispatcher::new(
        tracker.clone(),
        mailer,
        tailor.clone(),
        engine,
        UserProfile {
            name: "Dry Run".to_string(),
            email: "dry.run@example.com".to_string(),
            phone: "+971500000000".to_string(),
            resume_path: None,
        },
        config.review_before_apply,
        config.auto_apply_enabled,
    );

    let agent = JobAgent::new(
        config.clone(),
        vec![Box::new(jobscout::sources::EmailAlertSource::new(
            mailbox,
            config.job_alert_label.clone(),
        ))],
        tracker.clone(),
        tailor,
        Arc::new(NullAlerter),
        dispatcher,
    );

    let summary = agent.run().await;
    println!("{summary:#?}");
    for row in tracker.review_rows().await {
        println!("queued for review: {} at {}", row.title, row.company);
    }
}
