//! Resilient field extraction.
//!
//! Board markup churns, so every field is described by an ordered
//! fallback chain of [`FieldRule`]s rather than a single selector.
//! The first rule that yields a non-empty value wins; a rule that
//! errors or matches nothing counts as a miss and the chain moves on.
//! A field whose whole chain misses is simply absent, never an error.

use serde::{Deserialize, Serialize};

use crate::browser::PageElement;

/// One way to read a field out of a result container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldRule {
    /// CSS selector, relative to the container.
    pub selector: String,
    /// Attribute to read; inner text when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attr: Option<String>,
}

impl FieldRule {
    pub fn text(selector: &str) -> Self {
        Self {
            selector: selector.to_string(),
            attr: None,
        }
    }

    pub fn attr(selector: &str, attr: &str) -> Self {
        Self {
            selector: selector.to_string(),
            attr: Some(attr.to_string()),
        }
    }
}

/// The per-platform selector table for one board's result page.
///
/// Serde-loadable so a selector drift can be patched from a config file
/// without a rebuild; compiled-in defaults live next to each platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorSet {
    /// Fallback chain locating result containers on the page.
    pub containers: Vec<String>,
    pub title: Vec<FieldRule>,
    pub company: Vec<FieldRule>,
    pub location: Vec<FieldRule>,
    pub job_url: Vec<FieldRule>,
    #[serde(default)]
    pub salary: Vec<FieldRule>,
    #[serde(default)]
    pub description: Vec<FieldRule>,
    #[serde(default)]
    pub date_posted: Vec<FieldRule>,
}

/// Walk a fallback chain, returning the first non-empty value.
pub async fn extract_field(container: &dyn PageElement, rules: &[FieldRule]) -> Option<String> {
    for rule in rules {
        let value = match &rule.attr {
            Some(attr) => container.attr(&rule.selector, attr).await,
            None => container.text(&rule.selector).await,
        };
        if let Some(v) = value {
            let v = v.trim().to_string();
            if !v.is_empty() {
                return Some(v);
            }
        }
    }
    None
}
