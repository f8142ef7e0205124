//! Pattern matchers for job-alert bodies.
//!
//! Every matcher runs independently over the whole body and the
//! results are unioned; structured matchers come first so that when a
//! generic hit shares a URL with a structured one, dedup keeps the
//! structured record. Each job leaves here with `apply_url` resolved:
//! a platform-specific apply link when the body carries one, otherwise
//! the job URL itself.

use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

use crate::dedupe::dedupe;
use crate::types::{JobPosting, Source};

/// Role words that mark a line as a probable job title.
const TITLE_KEYWORDS: &[&str] = &["engineer", "manager", "analyst", "developer", "specialist"];

/// Location words the generic matcher recognizes.
const LOCATION_KEYWORDS: &[&str] = &["dubai", "canada", "remote", "uae"];

fn linkedin_block() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?si)(?P<title>[^\n]+?)\s+at\s+(?P<company>[^\n]+?)\s*\n.*?(?P<location>[^\n]+?)\s*\n.*?https://www\.linkedin\.com/jobs/view/(?P<id>\d+)",
        )
        .unwrap()
    })
}

fn linkedin_apply() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"https://www\.linkedin\.com/jobs/apply/(?P<id>\d+)").unwrap()
    })
}

fn indeed_block() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?si)(?P<title>[^\n]+?)\s*\n\s*(?P<company>[^\n]+?)\s*\n\s*(?P<location>[^\n]+?)\s*\n.*?(?P<url>https://[a-z]{2}\.indeed\.com/viewjob\?jk=(?P<id>[a-zA-Z0-9]+))",
        )
        .unwrap()
    })
}

fn indeed_apply() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?P<url>https://[a-z]{2}\.indeed\.com/applystart/(?P<id>[a-zA-Z0-9]+))")
            .unwrap()
    })
}

fn glassdoor_block() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?si)(?P<title>[^\n]+?)\s*\n\s*(?P<company>[^\n]+?)\s*\n\s*(?P<location>[^\n]+?)\s*\n.*?(?P<url>https://www\.glassdoor\.com/job-listing/[^\s]+)",
        )
        .unwrap()
    })
}

fn glassdoor_apply() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?P<url>https://www\.glassdoor\.com/\S*applyJobListing\.htm\?jobListingId=(?P<id>\d+))",
        )
        .unwrap()
    })
}

fn salary_prefix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)(?:salary|pay|compensation)[:\s]*([^\n]+)").unwrap())
}

fn currency_amount() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(?:AED|CAD|USD)\s*[\d,]+(?:\s*-\s*(?:AED|CAD|USD)?\s*[\d,]+)?[^\n]*")
            .unwrap()
    })
}

fn any_url() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"https?://\S+").unwrap())
}

/// Extract every job a body describes, in canonical form.
pub fn parse_job_email(body: &str) -> Vec<JobPosting> {
    let mut jobs = Vec::new();
    jobs.extend(parse_linkedin(body));
    jobs.extend(parse_indeed(body));
    jobs.extend(parse_glassdoor(body));
    jobs.extend(parse_generic(body));

    let unique = dedupe(jobs);
    debug!(jobs = unique.len(), "jobs parsed from email body");
    unique
}

fn parse_linkedin(body: &str) -> Vec<JobPosting> {
    linkedin_block()
        .captures_iter(body)
        .filter_map(|caps| {
            let id = caps.name("id")?.as_str();
            let mut job = JobPosting::new(Source::LinkedInEmail);
            job.title = caps.name("title")?.as_str().trim().to_string();
            job.company = caps.name("company")?.as_str().trim().to_string();
            job.location = caps.name("location")?.as_str().trim().to_string();
            job.job_url = format!("https://www.linkedin.com/jobs/view/{id}");
            job.salary_text = salary_in_window(caps.get(0)?.as_str());
            // An apply link for a different listing does not count.
            job.apply_url = Some(
                linkedin_apply()
                    .captures_iter(body)
                    .find(|apply| apply.name("id").map(|m| m.as_str()) == Some(id))
                    .and_then(|apply| apply.get(0))
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_else(|| job.job_url.clone()),
            );
            Some(job)
        })
        .collect()
}

fn parse_indeed(body: &str) -> Vec<JobPosting> {
    indeed_block()
        .captures_iter(body)
        .filter_map(|caps| {
            let id = caps.name("id")?.as_str();
            let mut job = JobPosting::new(Source::IndeedEmail);
            job.title = caps.name("title")?.as_str().trim().to_string();
            job.company = caps.name("company")?.as_str().trim().to_string();
            job.location = caps.name("location")?.as_str().trim().to_string();
            job.job_url = caps.name("url")?.as_str().to_string();
            job.salary_text = currency_amount()
                .find(caps.get(0)?.as_str())
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_default();
            job.apply_url = Some(
                indeed_apply()
                    .captures_iter(body)
                    .find(|apply| apply.name("id").map(|m| m.as_str()) == Some(id))
                    .and_then(|apply| apply.name("url"))
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_else(|| job.job_url.clone()),
            );
            Some(job)
        })
        .collect()
}

fn parse_glassdoor(body: &str) -> Vec<JobPosting> {
    glassdoor_block()
        .captures_iter(body)
        .filter_map(|caps| {
            let mut job = JobPosting::new(Source::GlassdoorEmail);
            job.title = caps.name("title")?.as_str().trim().to_string();
            job.company = caps.name("company")?.as_str().trim().to_string();
            job.location = caps.name("location")?.as_str().trim().to_string();
            job.job_url = caps.name("url")?.as_str().to_string();
            job.apply_url = Some(
                glassdoor_apply()
                    .captures_iter(body)
                    .find(|apply| {
                        // Tie the apply link to this listing by id when
                        // the listing URL carries one.
                        apply
                            .name("id")
                            .map(|m| job.job_url.contains(m.as_str()))
                            .unwrap_or(false)
                    })
                    .and_then(|apply| apply.name("url"))
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_else(|| job.job_url.clone()),
            );
            Some(job)
        })
        .collect()
}

/// Line-scan heuristic for alert formats nothing else recognizes.
fn parse_generic(body: &str) -> Vec<JobPosting> {
    let lines: Vec<&str> = body.lines().collect();
    let mut jobs = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        let lowered = line.to_lowercase();
        if !TITLE_KEYWORDS.iter().any(|k| lowered.contains(k)) {
            continue;
        }
        let title = line.trim().to_string();

        let mut company = String::new();
        let mut location = String::new();
        let mut urls: Vec<String> = Vec::new();

        for next in lines.iter().skip(i + 1).take(4) {
            let next = next.trim();
            if next.is_empty() {
                continue;
            }
            let next_lower = next.to_lowercase();

            if next_lower.contains("http") {
                if let Some(m) = any_url().find(next) {
                    urls.push(m.as_str().to_string());
                }
            } else if location.is_empty()
                && LOCATION_KEYWORDS.iter().any(|k| next_lower.contains(k))
            {
                location = next.to_string();
            } else if company.is_empty() && !next.contains('@') && !next_lower.contains("salary") {
                company = next.to_string();
            }
        }

        if title.is_empty() || company.is_empty() {
            continue;
        }

        let mut job = JobPosting::new(Source::GenericEmail);
        job.title = title;
        job.company = company;
        job.location = location;
        job.job_url = urls.first().cloned().unwrap_or_default();
        // A second link that looks like an apply link wins.
        let apply = urls.iter().skip(1).find(|u| u.to_lowercase().contains("apply"));
        if !job.job_url.is_empty() {
            job.apply_url = Some(apply.cloned().unwrap_or_else(|| job.job_url.clone()));
        }
        jobs.push(job);
    }

    jobs
}

/// Labeled salary line inside one matched block, if present.
fn salary_in_window(window: &str) -> String {
    salary_prefix()
        .captures(window)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}
