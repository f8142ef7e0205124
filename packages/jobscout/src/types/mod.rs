//! Canonical data types shared across the pipeline.

mod job;
mod profile;
mod session;

pub use job::{Dispatch, DispatchOutcome, JobIdentity, JobPosting, Platform, Source};
pub use profile::{EmailMessage, TailorOutput, UserProfile};
pub use session::{Cookie, CookieJar, SessionState};
