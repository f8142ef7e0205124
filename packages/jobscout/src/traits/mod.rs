//! Behavioral contracts for external collaborators.
//!
//! The core consumes these seams and never depends on concrete
//! backends; adapters live in [`crate::trackers`] and downstream crates.

mod alert;
mod mailbox;
mod mailer;
mod tailor;
mod tracker;

pub use alert::Alerter;
pub use mailbox::Mailbox;
pub use mailer::OutboundMailer;
pub use tailor::ResumeTailor;
pub use tracker::{JobTracker, TrackedField};
