//! One full discovery-and-dispatch run.
//!
//! Sources are isolated units: one platform's failed login or blocked
//! crawl alerts the operator and the run continues with the others.
//! Work already dispatched is never discarded by a later failure.

use std::sync::Arc;
use tracing::{info, warn};

use crate::config::AgentConfig;
use crate::dedupe::{dedupe, dedupe_with_existing};
use crate::dispatch::Dispatcher;
use crate::salary;
use crate::sources::JobSource;
use crate::traits::{Alerter, JobTracker, ResumeTailor};
use crate::types::{DispatchOutcome, JobPosting, TailorOutput};

/// Counters for one run, for the log line and the operator alert.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Raw postings across all sources, before any dedup.
    pub discovered: usize,
    /// Postings surviving global dedup and the already-processed set.
    pub new_jobs: usize,
    /// Postings dropped by the minimum-salary floor.
    pub below_salary_floor: usize,
    pub dispatched: usize,
    pub dispatch_errors: usize,
    pub source_failures: usize,
}

pub struct JobAgent {
    config: AgentConfig,
    sources: Vec<Box<dyn JobSource>>,
    tracker: Arc<dyn JobTracker>,
    tailor: Arc<dyn ResumeTailor>,
    alerter: Arc<dyn Alerter>,
    dispatcher: Dispatcher,
}

impl JobAgent {
    pub fn new(
        config: AgentConfig,
        sources: Vec<Box<dyn JobSource>>,
        tracker: Arc<dyn JobTracker>,
        tailor: Arc<dyn ResumeTailor>,
        alerter: Arc<dyn Alerter>,
        dispatcher: Dispatcher,
    ) -> Self {
        Self {
            config,
            sources,
            tracker,
            tailor,
            alerter,
            dispatcher,
        }
    }

    pub async fn run(&self) -> RunSummary {
        let mut summary = RunSummary::default();

        let existing = match self.tracker.get_existing_urls().await {
            Ok(urls) => urls,
            Err(e) => {
                warn!(error = %e, "could not load already-processed urls, continuing with none");
                self.alerter
                    .notify(&format!("tracker unreachable at run start: {e}"))
                    .await;
                Default::default()
            }
        };

        let mut collected: Vec<JobPosting> = Vec::new();
        for source in &self.sources {
            match source.discover().await {
                Ok(jobs) => {
                    summary.discovered += jobs.len();
                    collected.extend(dedupe(jobs));
                }
                Err(e) => {
                    summary.source_failures += 1;
                    warn!(source = source.name(), error = %e, "source failed");
                    self.alerter
                        .notify(&format!("source {} failed: {e}", source.name()))
                        .await;
                }
            }
        }

        let fresh = dedupe_with_existing(collected, &existing);
        summary.new_jobs = fresh.len();
        info!(
            discovered = summary.discovered,
            new = summary.new_jobs,
            "discovery complete"
        );

        for mut job in fresh {
            if !salary::meets_minimum(
                &job.salary_text,
                self.config.min_monthly_aed,
                &self.config.currency_rates,
            ) {
                summary.below_salary_floor += 1;
                continue;
            }

            let tailored = self.enrich(&mut job).await;

            if let Err(e) = self.tracker.append_row(&job, tailored.as_ref()).await {
                warn!(url = %job.job_url, error = %e, "could not append job row");
            }

            let dispatch = self.dispatcher.dispatch(&job).await;
            summary.dispatched += 1;
            if dispatch.outcome == DispatchOutcome::Error {
                summary.dispatch_errors += 1;
            }
        }

        if summary.source_failures > 0 || summary.dispatch_errors > 0 {
            self.alerter
                .notify(&format!(
                    "run finished with {} source failure(s) and {} dispatch error(s)",
                    summary.source_failures, summary.dispatch_errors
                ))
                .await;
        }
        info!(?summary, "run complete");
        summary
    }

    /// Tailoring also surfaces recruiter emails found in the listing;
    /// a tailoring failure just leaves the job unenriched.
    async fn enrich(&self, job: &mut JobPosting) -> Option<TailorOutput> {
        match self.tailor.tailor(job).await {
            Ok(output) => {
                if job.recruiter_email.is_none() {
                    job.recruiter_email = output
                        .recruiter_email
                        .clone()
                        .filter(|e| !e.is_empty());
                }
                Some(output)
            }
            Err(e) => {
                warn!(title = %job.title, error = %e, "tailoring failed");
                None
            }
        }
    }
}
