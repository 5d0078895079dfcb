use askama::Template;

use super::AuthShell;

#[derive(Template)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub shell: AuthShell,
    pub error: Option<String>,
    pub info: Option<String>,
    pub email: String,
    pub next: String,
    /// Offer the "resend verification email" form.
    pub offer_resend: bool,
}

#[derive(Template)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub shell: AuthShell,
    pub errors: Vec<String>,
    pub name: String,
    pub email: String,
}

#[derive(Template)]
#[template(path = "auth/verify_email.html")]
pub struct VerifyEmailTemplate {
    pub shell: AuthShell,
    pub email: String,
    pub error: Option<String>,
    pub info: Option<String>,
}

#[derive(Template)]
#[template(path = "auth/forgot_password.html")]
pub struct ForgotPasswordTemplate {
    pub shell: AuthShell,
    pub email: String,
    pub error: Option<String>,
}

/// Two steps on one screen: first the emailed code, then the new password.
#[derive(Template)]
#[template(path = "auth/reset_password.html")]
pub struct ResetPasswordTemplate {
    pub shell: AuthShell,
    pub email: String,
    pub code: String,
    pub password_step: bool,
    pub errors: Vec<String>,
    pub info: Option<String>,
}
