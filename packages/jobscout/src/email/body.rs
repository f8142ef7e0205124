//! HTML-to-text reduction for mail bodies.
//!
//! Alert emails are table soup; the parsers only need line structure,
//! so a regex strip is enough. No DOM is built.

use regex::Regex;
use std::sync::OnceLock;

fn script_style() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?is)<(script|style)[^>]*>.*?</(script|style)>").unwrap()
    })
}

fn block_close() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)<br\s*/?>|</(p|div|tr|li|h[1-6]|table)>").unwrap()
    })
}

fn any_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]+>").unwrap())
}

/// Reduce an HTML mail part to newline-structured text.
pub fn html_to_text(html: &str) -> String {
    let stripped = script_style().replace_all(html, "");
    let lined = block_close().replace_all(&stripped, "\n");
    let text = any_tag().replace_all(&lined, "");
    let text = decode_entities(&text);

    // Collapse indentation noise, drop blank runs.
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_soup_becomes_lines() {
        let html = "<table><tr><td><b>Senior AI Engineer at TechCorp</b></td></tr>\
                    <tr><td>Dubai, UAE</td></tr></table>\
                    <p>AED 15,000 &#39;per month&#39;</p>";
        let text = html_to_text(html);
        assert_eq!(
            text,
            "Senior AI Engineer at TechCorp\nDubai, UAE\nAED 15,000 'per month'"
        );
    }

    #[test]
    fn scripts_and_styles_are_dropped_whole() {
        let html = "<style>.x { color: red }</style>before<script>alert('engineer')</script>after";
        assert_eq!(html_to_text(html), "beforeafter");
    }

    #[test]
    fn entities_decode_in_order() {
        assert_eq!(decode_entities("a &amp;&nbsp;b &lt;c&gt;"), "a & b <c>");
    }
}
