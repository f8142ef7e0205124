//! Bayt board parameters.
//!
//! Bayt puts the query and region in the URL path and paginates from 1.

use super::{slug, BoardSpec};
use crate::extract::{FieldRule, SelectorSet};
use crate::types::{Platform, Source};

const PAGE_SIZE: usize = 20;

fn search_url(keyword: &str, location: &str, page: usize) -> String {
    format!(
        "https://www.bayt.com/en/{}/jobs/{}-jobs/?page={}",
        slug(location),
        slug(keyword),
        page + 1
    )
}

fn selectors() -> SelectorSet {
    SelectorSet {
        containers: vec![
            "li[data-js-job]".into(),
            "div.has-pointer-d".into(),
        ],
        title: vec![FieldRule::text("h2 a"), FieldRule::text("a.jb-title")],
        company: vec![
            FieldRule::text("b.jb-company"),
            FieldRule::text("span.jb-comp-name"),
        ],
        location: vec![
            FieldRule::text("div.jb-loc"),
            FieldRule::text("span.jb-loc"),
        ],
        job_url: vec![
            FieldRule::attr("h2 a", "href"),
            FieldRule::attr("a.jb-title", "href"),
        ],
        salary: vec![FieldRule::text("div.jb-salaries")],
        description: vec![FieldRule::text("div.jb-descr")],
        date_posted: vec![],
    }
}

pub fn spec() -> BoardSpec {
    BoardSpec {
        platform: Platform::Bayt,
        source: Source::Bayt,
        page_size: PAGE_SIZE,
        base_url: "https://www.bayt.com",
        requires_auth: false,
        selectors: selectors(),
        build_search_url: search_url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_carries_slugged_query_and_one_based_page() {
        assert_eq!(
            search_url("AI Engineer", "UAE", 0),
            "https://www.bayt.com/en/uae/jobs/ai-engineer-jobs/?page=1"
        );
        assert_eq!(
            search_url("data analyst", "Saudi Arabia", 2),
            "https://www.bayt.com/en/saudi-arabia/jobs/data-analyst-jobs/?page=3"
        );
    }
}
