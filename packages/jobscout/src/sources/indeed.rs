//! Indeed (UAE site) board parameters.

use super::BoardSpec;
use crate::extract::{FieldRule, SelectorSet};
use crate::types::{Platform, Source};

const PAGE_SIZE: usize = 10;

fn search_url(keyword: &str, location: &str, page: usize) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("q", keyword)
        .append_pair("l", location)
        .append_pair("start", &(page * PAGE_SIZE).to_string())
        .finish();
    format!("https://ae.indeed.com/jobs?{query}")
}

fn selectors() -> SelectorSet {
    SelectorSet {
        containers: vec![
            "div.job_seen_beacon".into(),
            "td.resultContent".into(),
            "div.jobsearch-SerpJobCard".into(),
        ],
        title: vec![
            FieldRule::attr("h2.jobTitle a span", "title"),
            FieldRule::text("h2.jobTitle a"),
            FieldRule::text("h2.jobTitle"),
        ],
        company: vec![
            FieldRule::text("[data-testid='company-name']"),
            FieldRule::text("span.companyName"),
        ],
        location: vec![
            FieldRule::text("[data-testid='text-location']"),
            FieldRule::text("div.companyLocation"),
        ],
        job_url: vec![
            FieldRule::attr("h2.jobTitle a", "href"),
            FieldRule::attr("a.jcs-JobTitle", "href"),
        ],
        salary: vec![
            FieldRule::text("[data-testid='attribute_snippet_testid']"),
            FieldRule::text("div.salary-snippet-container"),
        ],
        description: vec![FieldRule::text("div.job-snippet")],
        date_posted: vec![FieldRule::text("span.date")],
    }
}

pub fn spec() -> BoardSpec {
    BoardSpec {
        platform: Platform::Indeed,
        source: Source::Indeed,
        page_size: PAGE_SIZE,
        base_url: "https://ae.indeed.com",
        requires_auth: false,
        selectors: selectors(),
        build_search_url: search_url,
    }
}
