//! LinkedIn board parameters.

use super::BoardSpec;
use crate::extract::{FieldRule, SelectorSet};
use crate::types::{Platform, Source};

const PAGE_SIZE: usize = 25;

fn search_url(keyword: &str, location: &str, page: usize) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("keywords", keyword)
        .append_pair("location", location)
        .append_pair("start", &(page * PAGE_SIZE).to_string())
        .finish();
    format!("https://www.linkedin.com/jobs/search/?{query}")
}

fn selectors() -> SelectorSet {
    SelectorSet {
        containers: vec![
            "ul.jobs-search__results-list > li".into(),
            "div.jobs-search-results__list-item".into(),
            "div.base-search-card".into(),
        ],
        title: vec![
            FieldRule::text("h3.base-search-card__title"),
            FieldRule::text("a.job-card-list__title"),
        ],
        company: vec![
            FieldRule::text("h4.base-search-card__subtitle"),
            FieldRule::text("a.job-card-container__company-name"),
        ],
        location: vec![
            FieldRule::text("span.job-search-card__location"),
            FieldRule::text("li.job-card-container__metadata-item"),
        ],
        job_url: vec![
            FieldRule::attr("a.base-card__full-link", "href"),
            FieldRule::attr("a.job-card-list__title", "href"),
        ],
        salary: vec![FieldRule::text("span.job-search-card__salary-info")],
        description: vec![FieldRule::text("p.job-search-card__snippet")],
        date_posted: vec![FieldRule::attr("time", "datetime")],
    }
}

pub fn spec() -> BoardSpec {
    BoardSpec {
        platform: Platform::LinkedIn,
        source: Source::LinkedIn,
        page_size: PAGE_SIZE,
        base_url: "https://www.linkedin.com",
        requires_auth: true,
        selectors: selectors(),
        build_search_url: search_url,
    }
}
