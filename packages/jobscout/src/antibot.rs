//! Anti-bot and checkpoint detection.
//!
//! Detection is a substring scan over the rendered page plus a URL
//! check. Matching is deliberately broad: a false positive costs one
//! skipped page, a false negative can burn an account.

/// Markers that appear in CAPTCHA walls, checkpoint interstitials and
/// rate-limit pages across the supported boards.
const PAGE_MARKERS: &[&str] = &[
    "captcha",
    "security check",
    "unusual traffic",
    "verify you're a human",
    "verify you are a human",
    "just a moment",
    "checking your browser",
    "cloudflare",
];

/// URL fragments boards redirect to when they want a human.
const URL_MARKERS: &[&str] = &["/checkpoint", "/challenge", "captcha", "/authwall"];

/// Scan rendered page content for an anti-bot wall.
pub fn page_is_blocked(content: &str) -> bool {
    let haystack = content.to_lowercase();
    PAGE_MARKERS.iter().any(|m| haystack.contains(m))
}

/// Scan the landed URL for a checkpoint redirect.
pub fn url_is_checkpoint(url: &str) -> bool {
    let haystack = url.to_lowercase();
    URL_MARKERS.iter().any(|m| haystack.contains(m))
}
