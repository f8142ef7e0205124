//! Per-platform authentication page shapes.
//!
//! Login fields get fallback chains like result selectors do; boards
//! rename form ids far more often than they redesign the flow.

use crate::types::Platform;

#[derive(Debug, Clone, Copy)]
pub struct AuthSpec {
    pub login_url: &'static str,
    /// Authenticated landing page used to probe whether cookies still work.
    pub verify_url: &'static str,
    pub email_field: &'static [&'static str],
    pub password_field: &'static [&'static str],
    pub submit: &'static [&'static str],
    /// Ordered by reliability; any one appearing means logged in.
    pub success_indicators: &'static [&'static str],
}

const LINKEDIN: AuthSpec = AuthSpec {
    login_url: "https://www.linkedin.com/login",
    verify_url: "https://www.linkedin.com/feed/",
    email_field: &["#username", "input[name='session_key']"],
    password_field: &["#password", "input[name='session_password']"],
    submit: &["button[type='submit']", ".login__form_action_container button"],
    success_indicators: &[
        ".global-nav__me",
        "img.global-nav__me-photo",
        "div.feed-identity-module",
    ],
};

const INDEED: AuthSpec = AuthSpec {
    login_url: "https://secure.indeed.com/auth",
    verify_url: "https://myjobs.indeed.com/",
    email_field: &["input[name='__email']", "#ifl-InputFormField-3"],
    password_field: &["input[name='__password']", "#ifl-InputFormField-7"],
    submit: &["button[type='submit']"],
    success_indicators: &[
        "[data-gnav-element-name='AccountMenu']",
        ".gnav-LoggedInAccountLink",
    ],
};

const BAYT: AuthSpec = AuthSpec {
    login_url: "https://www.bayt.com/en/login/",
    verify_url: "https://www.bayt.com/en/mybayt/",
    email_field: &["#LoginForm_username", "input[name='LoginForm[username]']"],
    password_field: &["#LoginForm_password", "input[name='LoginForm[password]']"],
    submit: &["button[type='submit']", "#login-button"],
    success_indicators: &["#header_user_menu", ".header-avatar"],
};

pub fn auth_spec(platform: Platform) -> &'static AuthSpec {
    match platform {
        Platform::LinkedIn => &LINKEDIN,
        Platform::Indeed => &INDEED,
        Platform::Bayt => &BAYT,
    }
}
