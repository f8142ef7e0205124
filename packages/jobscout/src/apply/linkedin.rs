//! LinkedIn Easy Apply flow parameters.

use super::ApplyFlow;
use crate::types::Platform;

static FLOW: ApplyFlow = ApplyFlow {
    platform: Platform::LinkedIn,
    triggers: &[
        "button[data-control-name='jobdetails_topcard_inapply']",
        "button.jobs-apply-button",
    ],
    fields: &[
        ("name", "input[name='name']"),
        ("email", "input[name='email']"),
        ("phone", "input[name='phone']"),
    ],
    resume_input: "input[type='file']",
    question_containers: &[
        ".jobs-easy-apply-form-element",
        ".jobs-easy-apply-content fieldset",
    ],
    submit: &[
        "button[aria-label='Submit application']",
        "button[aria-label='Review your application']",
    ],
    success_indicators: &[
        ".jobs-easy-apply-success-message",
        "h2.artdeco-modal__header",
    ],
};

pub fn flow() -> &'static ApplyFlow {
    &FLOW
}
