//! Everything the front-end keeps per browser session: the backend bearer
//! token, the signed-in user's display name, flash messages, and the theme.

use actix_session::Session;

use crate::api::ApiClient;
use crate::errors::AppError;

const TOKEN_KEY: &str = "api_token";
const EMAIL_KEY: &str = "email";
const FLASH_KEY: &str = "flash";
const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    fn parse(raw: &str) -> Self {
        if raw == "dark" { Theme::Dark } else { Theme::Light }
    }
}

pub fn get_token(session: &Session) -> Option<String> {
    session
        .get::<String>(TOKEN_KEY)
        .unwrap_or(None)
        .filter(|t| !t.is_empty())
}

pub fn is_authenticated(session: &Session) -> bool {
    get_token(session).is_some()
}

/// Store the token returned by `/auth/login`. The session id is renewed so a
/// pre-login cookie cannot be reused.
pub fn sign_in(session: &Session, token: &str, email: &str) -> Result<(), AppError> {
    session.renew();
    session
        .insert(TOKEN_KEY, token)
        .map_err(|e| AppError::Session(format!("Failed to store token: {e}")))?;
    session
        .insert(EMAIL_KEY, email)
        .map_err(|e| AppError::Session(format!("Failed to store email: {e}")))?;
    Ok(())
}

/// Drop the token and everything else except the theme preference.
pub fn sign_out(session: &Session) {
    let theme = get_theme(session);
    session.clear();
    session.renew();
    let _ = session.insert(THEME_KEY, theme.as_str());
}

pub fn get_email(session: &Session) -> Option<String> {
    session.get::<String>(EMAIL_KEY).unwrap_or(None)
}

/// API client bound to this session's token.
pub fn client_for(session: &Session, api: &ApiClient) -> Result<ApiClient, AppError> {
    let token = get_token(session).ok_or_else(|| AppError::Session("Not authenticated".to_string()))?;
    Ok(api.with_token(token))
}

pub fn set_flash(session: &Session, message: impl Into<String>) {
    let _ = session.insert(FLASH_KEY, message.into());
}

pub fn take_flash(session: &Session) -> Option<String> {
    let flash = session.get::<String>(FLASH_KEY).unwrap_or(None);
    if flash.is_some() {
        session.remove(FLASH_KEY);
    }
    flash
}

pub fn get_theme(session: &Session) -> Theme {
    session
        .get::<String>(THEME_KEY)
        .unwrap_or(None)
        .map(|raw| Theme::parse(&raw))
        .unwrap_or(Theme::Light)
}

pub fn toggle_theme(session: &Session) -> Theme {
    let next = get_theme(session).toggled();
    let _ = session.insert(THEME_KEY, next.as_str());
    next
}
