//! Job-alert email parsing.
//!
//! Mailbox access itself lives behind [`crate::traits::Mailbox`]; this
//! module turns message bodies into [`crate::types::JobPosting`]s.

mod body;
mod parsers;

pub use body::html_to_text;
pub use parsers::parse_job_email;
