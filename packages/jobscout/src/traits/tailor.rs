//! Resume-tailoring contract (LLM-backed, out of scope here).

use async_trait::async_trait;

use crate::error::BoxError;
use crate::types::{JobPosting, TailorOutput};

/// Produces a tailored resume + cover letter for one posting, and may
/// surface a recruiter email found in the listing.
#[async_trait]
pub trait ResumeTailor: Send + Sync {
    async fn tailor(&self, job: &JobPosting) -> Result<TailorOutput, BoxError>;
}
