//! Exhaustive check of the application-routing decision table.

use std::sync::Arc;
use std::time::Duration;

use jobscout::apply::WebFormEngine;
use jobscout::dispatch::Dispatcher;
use jobscout::testing::{FakeDriver, FakePage, RecordingMailer, StaticTailor};
use jobscout::trackers::MemoryTracker;
use jobscout::traits::TrackedField;
use jobscout::types::{DispatchOutcome, JobPosting, Source, UserProfile};

fn job(recruiter: bool, apply_url: bool) -> JobPosting {
    let mut job = JobPosting::new(Source::LinkedIn);
    job.title = "AI Engineer".into();
    job.company = "TechCorp".into();
    job.job_url = "https://www.linkedin.com/jobs/view/1".into();
    if recruiter {
        job.recruiter_email = Some("recruiter@techcorp.example".into());
    }
    if apply_url {
        job.apply_url = Some("https://www.linkedin.com/jobs/view/1".into());
    }
    job
}

fn dispatcher(
    tracker: Arc<MemoryTracker>,
    mailer: Arc<RecordingMailer>,
    review: bool,
    auto_apply: bool,
    pages: Vec<FakePage>,
) -> Dispatcher {
    let engine = WebFormEngine::new(Arc::new(FakeDriver::new(pages)), Duration::from_secs(5));
    Dispatcher::new(
        tracker,
        mailer,
        Arc::new(StaticTailor::default()),
        engine,
        UserProfile::default(),
        review,
        auto_apply,
    )
}

fn predicted(review: bool, recruiter: bool, apply_url: bool, auto_apply: bool) -> DispatchOutcome {
    if review {
        DispatchOutcome::ReviewQueue
    } else if recruiter {
        DispatchOutcome::ColdEmail
    } else if apply_url {
        if auto_apply {
            DispatchOutcome::WebForm
        } else {
            DispatchOutcome::ManualReview
        }
    } else {
        DispatchOutcome::ManualReview
    }
}

#[tokio::test]
async fn every_flag_combination_routes_as_the_table_predicts() {
    for bits in 0..16u8 {
        let review = bits & 1 != 0;
        let recruiter = bits & 2 != 0;
        let apply_url = bits & 4 != 0;
        let auto_apply = bits & 8 != 0;

        let tracker = Arc::new(MemoryTracker::new());
        let mailer = Arc::new(RecordingMailer::new());
        let d = dispatcher(tracker.clone(), mailer.clone(), review, auto_apply, vec![]);

        let result = d.dispatch(&job(recruiter, apply_url)).await;
        assert_eq!(
            result.outcome,
            predicted(review, recruiter, apply_url, auto_apply),
            "combination review={review} recruiter={recruiter} apply_url={apply_url} auto_apply={auto_apply}"
        );
    }
}

#[tokio::test]
async fn review_mode_appends_to_the_review_queue() {
    let tracker = Arc::new(MemoryTracker::new());
    let mailer = Arc::new(RecordingMailer::new());
    let d = dispatcher(tracker.clone(), mailer.clone(), true, true, vec![]);

    let result = d.dispatch(&job(true, true)).await;
    assert_eq!(result.outcome, DispatchOutcome::ReviewQueue);
    assert_eq!(tracker.review_rows().await.len(), 1);
    // Review preempts everything: no email went out.
    assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn cold_email_path_sends_and_marks_the_row() {
    let tracker = Arc::new(MemoryTracker::new());
    let mailer = Arc::new(RecordingMailer::new());
    let d = dispatcher(tracker.clone(), mailer.clone(), false, true, vec![]);
    let job = job(true, true);

    let result = d.dispatch(&job).await;
    assert_eq!(result.outcome, DispatchOutcome::ColdEmail);
    assert!(result.note.contains("recruiter@techcorp.example"));

    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "recruiter@techcorp.example");
    assert_eq!(sent[0].subject, "Application for AI Engineer at TechCorp");

    assert_eq!(
        tracker.field(&job.job_url, TrackedField::ColdEmailSent).await.as_deref(),
        Some("yes")
    );
    assert_eq!(
        tracker.field(&job.job_url, TrackedField::Status).await.as_deref(),
        Some("cold_email")
    );
}

#[tokio::test]
async fn rejected_delivery_keeps_the_cold_email_outcome() {
    let tracker = Arc::new(MemoryTracker::new());
    let mailer = Arc::new(RecordingMailer::rejecting());
    let d = dispatcher(tracker.clone(), mailer.clone(), false, true, vec![]);
    let job = job(true, false);

    let result = d.dispatch(&job).await;
    assert_eq!(result.outcome, DispatchOutcome::ColdEmail);
    assert!(result.note.contains("delivery rejected"));
    assert_eq!(
        tracker.field(&job.job_url, TrackedField::ColdEmailSent).await,
        None
    );
}

#[tokio::test]
async fn auto_apply_off_is_an_explicit_manual_review_note() {
    let tracker = Arc::new(MemoryTracker::new());
    let mailer = Arc::new(RecordingMailer::new());
    let d = dispatcher(tracker.clone(), mailer.clone(), false, false, vec![]);
    let job = job(false, true);

    let result = d.dispatch(&job).await;
    assert_eq!(result.outcome, DispatchOutcome::ManualReview);
    assert_eq!(result.note, "Manual review required (auto-apply off)");
    assert_eq!(
        tracker.field(&job.job_url, TrackedField::Notes).await.as_deref(),
        Some("Manual review required (auto-apply off)")
    );
}

#[tokio::test]
async fn successful_web_form_marks_the_job_applied() {
    let form = FakePage::new()
        .with_selector("button[data-control-name='jobdetails_topcard_inapply']")
        .with_selector("button[aria-label='Submit application']")
        .with_selector(".jobs-easy-apply-success-message");
    let tracker = Arc::new(MemoryTracker::new());
    let mailer = Arc::new(RecordingMailer::new());
    let d = dispatcher(tracker.clone(), mailer.clone(), false, true, vec![form]);
    let job = job(false, true);

    let result = d.dispatch(&job).await;
    assert_eq!(result.outcome, DispatchOutcome::WebForm);
    assert_eq!(result.note, "application submitted");
    assert_eq!(
        tracker.field(&job.job_url, TrackedField::Status).await.as_deref(),
        Some("applied")
    );
}

#[tokio::test]
async fn failed_web_form_still_tags_the_web_form_path() {
    // Empty page: no trigger, unsupported layout.
    let tracker = Arc::new(MemoryTracker::new());
    let mailer = Arc::new(RecordingMailer::new());
    let d = dispatcher(tracker.clone(), mailer.clone(), false, true, vec![FakePage::new()]);
    let job = job(false, true);

    let result = d.dispatch(&job).await;
    assert_eq!(result.outcome, DispatchOutcome::WebForm);
    assert!(result.note.contains("unsupported layout"));
    assert_eq!(
        tracker.field(&job.job_url, TrackedField::Status).await.as_deref(),
        Some("web_form")
    );
}

#[tokio::test]
async fn bare_job_gets_manual_review_with_a_recorded_note() {
    let tracker = Arc::new(MemoryTracker::new());
    let mailer = Arc::new(RecordingMailer::new());
    let d = dispatcher(tracker.clone(), mailer.clone(), false, false, vec![]);
    let job = job(false, false);

    let result = d.dispatch(&job).await;
    assert_eq!(result.outcome, DispatchOutcome::ManualReview);
    assert_eq!(result.note, "Manual review required");
    assert_eq!(
        tracker.field(&job.job_url, TrackedField::Notes).await.as_deref(),
        Some("Manual review required")
    );
}
