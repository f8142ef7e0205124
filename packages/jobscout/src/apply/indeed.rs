//! Indeed apply flow parameters.

use super::ApplyFlow;
use crate::types::Platform;

static FLOW: ApplyFlow = ApplyFlow {
    platform: Platform::Indeed,
    triggers: &[
        "button[data-tn-element='apply-button']",
        "#indeedApplyButton",
    ],
    fields: &[
        ("name", "input[name='name']"),
        ("email", "input[name='email']"),
        ("phone", "input[name='phone']"),
    ],
    resume_input: "input[type='file']",
    question_containers: &[".jobsearch-IndeedApplyButton-formElement", ".ia-Questions-item"],
    submit: &["button[type='submit']"],
    success_indicators: &[
        ".jobsearch-IndeedApplyButton-successMessage",
        ".jobsearch-IndeedApplyButton-successIcon",
        ".jobsearch-IndeedApplyButton-successText",
    ],
};

pub fn flow() -> &'static ApplyFlow {
    &FLOW
}
