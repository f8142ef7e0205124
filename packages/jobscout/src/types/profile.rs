use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Applicant data used to fill application forms and compose cold
/// emails.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Path to the baseline resume file attached to applications.
    pub resume_path: Option<PathBuf>,
}

impl UserProfile {
    /// Value for a form field keyed by its semantic name, empty when
    /// the profile has nothing for it.
    pub fn field(&self, key: &str) -> &str {
        match key {
            "name" => &self.name,
            "email" => &self.email,
            "phone" => &self.phone,
            _ => "",
        }
    }
}

/// Output of the resume-tailoring collaborator for one posting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TailorOutput {
    /// Tailored resume text, when the collaborator produced one.
    pub delta_resume: Option<String>,
    pub cover_letter: String,
    /// Recruiter contact surfaced from the posting, if any.
    pub recruiter_email: Option<String>,
}

/// One job-alert email pulled from the mailbox collaborator, body
/// already reduced to text (text/plain part preferred, HTML stripped
/// otherwise).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailMessage {
    pub id: String,
    pub subject: String,
    pub sender: String,
    pub body: String,
}
