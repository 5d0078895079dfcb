//! Public authentication endpoints (no bearer token required).

use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::{ApiClient, ApiError, MessageBody};

#[derive(Debug, Serialize)]
pub struct Credentials<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct Registration<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub password_confirmation: &'a str,
}

#[derive(Debug, Serialize)]
pub struct PasswordReset<'a> {
    pub email: &'a str,
    pub code: &'a str,
    pub password: &'a str,
    pub password_confirmation: &'a str,
}

#[derive(Debug, Serialize)]
struct EmailOnly<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct EmailCode<'a> {
    email: &'a str,
    code: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    access_token: Option<String>,
}

impl ApiClient {
    /// `POST /auth/login`. Returns the bearer token for the session.
    pub async fn login(&self, credentials: &Credentials<'_>) -> Result<String, ApiError> {
        let resp: LoginResponse = self.send_json(Method::POST, "/auth/login", credentials).await?;
        resp.token
            .or(resp.access_token)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::Decode("login response has no token".to_string()))
    }

    /// `POST /auth/register`. Returns the backend's confirmation message, if any.
    pub async fn register(&self, registration: &Registration<'_>) -> Result<Option<String>, ApiError> {
        self.acknowledge("/auth/register", registration).await
    }

    /// `POST /auth/verify-email-code`.
    pub async fn verify_email(&self, email: &str, code: &str) -> Result<Option<String>, ApiError> {
        self.acknowledge("/auth/verify-email-code", &EmailCode { email, code }).await
    }

    /// `POST /auth/resend-verification-email`.
    pub async fn resend_verification(&self, email: &str) -> Result<Option<String>, ApiError> {
        self.acknowledge("/auth/resend-verification-email", &EmailOnly { email }).await
    }

    /// `POST /auth/forgot-password-code`: mails a reset code.
    pub async fn forgot_password(&self, email: &str) -> Result<Option<String>, ApiError> {
        self.acknowledge("/auth/forgot-password-code", &EmailOnly { email }).await
    }

    /// `POST /auth/reset-password-validate-code`: checks a reset code before
    /// asking for the new password.
    pub async fn validate_reset_code(&self, email: &str, code: &str) -> Result<Option<String>, ApiError> {
        self.acknowledge("/auth/reset-password-validate-code", &EmailCode { email, code }).await
    }

    /// `POST /auth/reset-password-code`.
    pub async fn reset_password(&self, reset: &PasswordReset<'_>) -> Result<Option<String>, ApiError> {
        self.acknowledge("/auth/reset-password-code", reset).await
    }

    /// POST a body and pull `message` out of whatever comes back.
    pub(crate) async fn acknowledge<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Option<String>, ApiError> {
        self.ack_with(Method::POST, path, Some(body)).await
    }

    pub(crate) async fn ack_with<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Option<String>, ApiError> {
        let Some(value) = self.send_optional(method, path, body).await? else {
            return Ok(None);
        };
        let body: MessageBody = serde_json::from_value(value).unwrap_or_default();
        if let Some(error) = body.error {
            return Err(ApiError::Rejected { status: 200, message: error });
        }
        Ok(body.message)
    }
}
