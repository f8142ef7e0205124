//! Salary text normalization.
//!
//! Converts free-form salary strings to an approximate monthly AED
//! figure using configured conversion rates. The rates are deployment
//! configuration, not verified exchange rates.

use regex::Regex;
use std::sync::OnceLock;

use crate::config::CurrencyRates;

fn amount_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\b(aed|usd|cad)?\s*(\d[\d,]*(?:\.\d+)?)\s*(k)?").unwrap())
}

/// Parse salary text into an approximate monthly AED amount.
///
/// Returns None when no numeric amount can be found. Annual figures
/// ("per year", "annual", "/yr") are divided by 12.
pub fn parse_monthly_aed(salary_text: &str, rates: &CurrencyRates) -> Option<u32> {
    let text = salary_text.trim();
    if text.is_empty() {
        return None;
    }
    let lower = text.to_lowercase();

    let caps = amount_re()
        .captures_iter(text)
        .find(|c| c.get(2).is_some())?;
    let raw = caps.get(2)?.as_str().replace(',', "");
    let mut amount: f64 = raw.parse().ok()?;

    if caps.get(3).is_some() || lower.contains("thousand") {
        amount *= 1_000.0;
    }

    // Currency prefix found next to the amount, else scan the whole text.
    let currency = caps
        .get(1)
        .map(|m| m.as_str().to_lowercase())
        .or_else(|| {
            ["aed", "usd", "cad"]
                .iter()
                .find(|c| lower.contains(*c))
                .map(|c| c.to_string())
        })
        .unwrap_or_else(|| "aed".to_string());

    amount = match currency.as_str() {
        "usd" => amount * rates.usd_to_aed,
        "cad" => amount * rates.cad_to_aed,
        _ => amount,
    };

    if lower.contains("year") || lower.contains("annual") || lower.contains("/yr") {
        amount /= 12.0;
    }

    if amount <= 0.0 || !amount.is_finite() {
        return None;
    }
    Some(amount as u32)
}

/// Whether a posting's salary clears the configured floor.
///
/// Postings with no salary text, or text we cannot parse, always pass;
/// missing data is never grounds for dropping a job.
pub fn meets_minimum(salary_text: &str, min_monthly_aed: Option<u32>, rates: &CurrencyRates) -> bool {
    let Some(min) = min_monthly_aed else {
        return true;
    };
    match parse_monthly_aed(salary_text, rates) {
        Some(monthly) => monthly >= min,
        None => true,
    }
}
