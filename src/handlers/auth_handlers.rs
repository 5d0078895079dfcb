use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::api::auth::{Credentials, PasswordReset, Registration};
use crate::api::{ApiClient, ApiError};
use crate::auth::middleware::safe_next;
use crate::auth::validate::{self, MIN_NAME, MIN_PASSWORD};
use crate::auth::{csrf, session};
use crate::config::AppConfig;
use crate::errors::{AppError, render, see_other};
use crate::templates_structs::{
    AuthShell, ForgotPasswordTemplate, LoginTemplate, RegisterTemplate, ResetPasswordTemplate,
    VerifyEmailTemplate,
};

#[derive(Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

#[derive(Deserialize)]
pub struct EmailQuery {
    #[serde(default)]
    pub email: String,
}

#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub csrf_token: String,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
    pub csrf_token: String,
}

#[derive(Deserialize)]
pub struct VerifyForm {
    pub email: String,
    pub code: String,
    pub csrf_token: String,
}

#[derive(Deserialize)]
pub struct EmailForm {
    pub email: String,
    pub csrf_token: String,
}

#[derive(Deserialize)]
pub struct ResetForm {
    pub email: String,
    pub code: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub password_confirmation: Option<String>,
    pub csrf_token: String,
}

#[derive(Deserialize)]
pub struct CsrfOnly {
    pub csrf_token: String,
}

/// Message to show inline for a failed public call.
fn auth_error(err: ApiError, fallback: &str) -> Result<String, AppError> {
    if matches!(err, ApiError::InvalidHeader(_)) {
        return Err(AppError::Api(err));
    }
    if matches!(err, ApiError::Decode(_)) {
        return Ok(fallback.to_string());
    }
    let message = err.user_message();
    if message.trim().is_empty() {
        return Ok(fallback.to_string());
    }
    Ok(message)
}

fn collect_errors(checks: impl IntoIterator<Item = Option<String>>) -> Vec<String> {
    checks.into_iter().flatten().collect()
}

// ---- login / logout ----

pub async fn login_page(
    config: web::Data<AppConfig>,
    session: Session,
    query: web::Query<NextQuery>,
) -> Result<HttpResponse, AppError> {
    if session::is_authenticated(&session) {
        return Ok(see_other(&safe_next(query.next.as_deref())));
    }
    render(LoginTemplate {
        shell: AuthShell::build(&session, &config),
        error: None,
        info: session::take_flash(&session),
        email: String::new(),
        next: query.next.clone().unwrap_or_default(),
        offer_resend: false,
    })
}

pub async fn login_submit(
    config: web::Data<AppConfig>,
    api: web::Data<ApiClient>,
    session: Session,
    form: web::Form<LoginForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let email = form.email.trim();

    let invalid = validate::validate_email(email).or_else(|| validate::validate_password(&form.password, MIN_PASSWORD));
    let outcome = match invalid {
        Some(message) => Err((message, false)),
        None => match api.login(&Credentials { email, password: &form.password }).await {
            Ok(token) => Ok(token),
            Err(ApiError::Unauthorized) => Err(("E-mail ou senha inválidos.".to_string(), false)),
            Err(e) => {
                // 403 is how the backend reports an unverified address.
                let unverified = matches!(e, ApiError::Rejected { status: 403, .. });
                Err((auth_error(e, "Erro inesperado ao realizar login.")?, unverified))
            }
        },
    };

    match outcome {
        Ok(token) => {
            session::sign_in(&session, &token, email)?;
            log::info!("User {email} logged in");
            Ok(see_other(&safe_next(form.next.as_deref())))
        }
        Err((message, offer_resend)) => render(LoginTemplate {
            shell: AuthShell::build(&session, &config),
            error: Some(message),
            info: None,
            email: email.to_string(),
            next: form.next.clone().unwrap_or_default(),
            offer_resend,
        }),
    }
}

pub async fn logout(session: Session, form: web::Form<CsrfOnly>) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    if let Some(email) = session::get_email(&session) {
        log::info!("User {email} logged out");
    }
    session::sign_out(&session);
    Ok(see_other("/auth/login"))
}

// ---- registration ----

pub async fn register_page(config: web::Data<AppConfig>, session: Session) -> Result<HttpResponse, AppError> {
    render(RegisterTemplate {
        shell: AuthShell::build(&session, &config),
        errors: vec![],
        name: String::new(),
        email: String::new(),
    })
}

pub async fn register_submit(
    config: web::Data<AppConfig>,
    api: web::Data<ApiClient>,
    session: Session,
    form: web::Form<RegisterForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let name = form.name.trim();
    let email = form.email.trim();

    let mut errors = collect_errors([
        validate::validate_name(name, "O nome", MIN_NAME),
        validate::validate_email(email),
        validate::validate_password(&form.password, MIN_PASSWORD),
        validate::validate_confirmation(&form.password, &form.password_confirmation),
    ]);

    if errors.is_empty() {
        let registration = Registration {
            name,
            email,
            password: &form.password,
            password_confirmation: &form.password_confirmation,
        };
        match api.register(&registration).await {
            Ok(message) => {
                session::set_flash(
                    &session,
                    message.unwrap_or_else(|| "Cadastro realizado com sucesso! Verifique seu e-mail.".to_string()),
                );
                return Ok(see_other(&verify_url(email)));
            }
            Err(e) => errors.push(auth_error(e, "Erro ao realizar cadastro.")?),
        }
    }

    render(RegisterTemplate {
        shell: AuthShell::build(&session, &config),
        errors,
        name: name.to_string(),
        email: email.to_string(),
    })
}

fn verify_url(email: &str) -> String {
    with_email("/auth/verify-email", email)
}

fn with_email(path: &str, email: &str) -> String {
    match serde_urlencoded::to_string([("email", email)]) {
        Ok(query) => format!("{path}?{query}"),
        Err(_) => path.to_string(),
    }
}

// ---- email verification ----

pub async fn verify_page(
    config: web::Data<AppConfig>,
    session: Session,
    query: web::Query<EmailQuery>,
) -> Result<HttpResponse, AppError> {
    render(VerifyEmailTemplate {
        shell: AuthShell::build(&session, &config),
        email: query.email.trim().to_string(),
        error: None,
        info: session::take_flash(&session),
    })
}

pub async fn verify_submit(
    config: web::Data<AppConfig>,
    api: web::Data<ApiClient>,
    session: Session,
    form: web::Form<VerifyForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let email = form.email.trim();
    let code = form.code.trim();

    let error = match validate::validate_email(email).or_else(|| validate::validate_code(code)) {
        Some(message) => message,
        None => match api.verify_email(email, code).await {
            Ok(message) => {
                session::set_flash(&session, message.unwrap_or_else(|| "E-mail verificado com sucesso!".to_string()));
                return Ok(see_other("/auth/login"));
            }
            Err(e) => auth_error(e, "Código inválido ou expirado.")?,
        },
    };

    render(VerifyEmailTemplate {
        shell: AuthShell::build(&session, &config),
        email: email.to_string(),
        error: Some(error),
        info: None,
    })
}

pub async fn resend_verification(
    config: web::Data<AppConfig>,
    api: web::Data<ApiClient>,
    session: Session,
    form: web::Form<EmailForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let email = form.email.trim();

    let (error, info) = match validate::validate_email(email) {
        Some(message) => (Some(message), None),
        None => match api.resend_verification(email).await {
            Ok(message) => (None, Some(message.unwrap_or_else(|| "Código reenviado para o seu e-mail.".to_string()))),
            Err(e) => (Some(auth_error(e, "Erro ao reenviar o código.")?), None),
        },
    };

    render(VerifyEmailTemplate {
        shell: AuthShell::build(&session, &config),
        email: email.to_string(),
        error,
        info,
    })
}

// ---- password reset ----

pub async fn forgot_page(config: web::Data<AppConfig>, session: Session) -> Result<HttpResponse, AppError> {
    render(ForgotPasswordTemplate {
        shell: AuthShell::build(&session, &config),
        email: String::new(),
        error: None,
    })
}

pub async fn forgot_submit(
    config: web::Data<AppConfig>,
    api: web::Data<ApiClient>,
    session: Session,
    form: web::Form<EmailForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let email = form.email.trim();

    let error = match validate::validate_email(email) {
        Some(message) => message,
        None => match api.forgot_password(email).await {
            Ok(message) => {
                session::set_flash(
                    &session,
                    message.unwrap_or_else(|| "Enviamos um código de recuperação para o seu e-mail.".to_string()),
                );
                return Ok(see_other(&with_email("/auth/reset-password", email)));
            }
            Err(e) => auth_error(e, "Erro ao enviar o código.")?,
        },
    };

    render(ForgotPasswordTemplate {
        shell: AuthShell::build(&session, &config),
        email: email.to_string(),
        error: Some(error),
    })
}

pub async fn reset_page(
    config: web::Data<AppConfig>,
    session: Session,
    query: web::Query<EmailQuery>,
) -> Result<HttpResponse, AppError> {
    render(ResetPasswordTemplate {
        shell: AuthShell::build(&session, &config),
        email: query.email.trim().to_string(),
        code: String::new(),
        password_step: false,
        errors: vec![],
        info: session::take_flash(&session),
    })
}

/// Without a password the form is the first step (check the code); with one
/// it is the second (set the new password).
pub async fn reset_submit(
    config: web::Data<AppConfig>,
    api: web::Data<ApiClient>,
    session: Session,
    form: web::Form<ResetForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let email = form.email.trim();
    let code = form.code.trim();

    let mut errors = collect_errors([validate::validate_email(email), validate::validate_code(code)]);
    if !errors.is_empty() {
        return render(reset_template(&session, &config, email, code, false, errors));
    }

    let Some(password) = form.password.as_deref() else {
        return match api.validate_reset_code(email, code).await {
            Ok(_) => render(reset_template(&session, &config, email, code, true, vec![])),
            Err(e) => {
                let message = auth_error(e, "Código inválido ou expirado.")?;
                render(reset_template(&session, &config, email, code, false, vec![message]))
            }
        };
    };

    let confirmation = form.password_confirmation.as_deref().unwrap_or_default();
    errors.extend(collect_errors([
        validate::validate_reset_password(password),
        validate::validate_confirmation(password, confirmation),
    ]));

    if errors.is_empty() {
        let reset = PasswordReset {
            email,
            code,
            password,
            password_confirmation: confirmation,
        };
        match api.reset_password(&reset).await {
            Ok(message) => {
                session::set_flash(&session, message.unwrap_or_else(|| "Senha redefinida com sucesso!".to_string()));
                return Ok(see_other("/auth/login"));
            }
            Err(e) => errors.push(auth_error(e, "Erro ao redefinir a senha.")?),
        }
    }

    render(reset_template(&session, &config, email, code, true, errors))
}

fn reset_template(
    session: &Session,
    config: &AppConfig,
    email: &str,
    code: &str,
    password_step: bool,
    errors: Vec<String>,
) -> ResetPasswordTemplate {
    ResetPasswordTemplate {
        shell: AuthShell::build(session, config),
        email: email.to_string(),
        code: code.to_string(),
        password_step,
        errors,
        info: None,
    }
}
