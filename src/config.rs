use std::time::Duration;

use actix_web::cookie::Key;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8073/api/v1";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 500;
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 15;

/// Runtime configuration, read from the environment (and `.env` if present).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app_name: String,
    pub api_base_url: String,
    pub bind_addr: String,
    pub session_key: Option<String>,
    pub cookie_secure: bool,
    pub search_debounce: Duration,
    pub api_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: "Painel".to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            session_key: None,
            cookie_secure: false,
            search_debounce: Duration::from_millis(DEFAULT_SEARCH_DEBOUNCE_MS),
            api_timeout: Duration::from_secs(DEFAULT_API_TIMEOUT_SECS),
        }
    }
}

impl AppConfig {
    /// Load `.env` (if any) and build the config from process environment.
    pub fn from_env() -> Self {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                log::warn!("Failed to read .env file: {e}");
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup. Unparseable values fall
    /// back to their defaults with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let api_base_url = lookup("API_BASE_URL")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.api_base_url);

        let search_debounce = parse_u64(&lookup, "SEARCH_DEBOUNCE_MS")
            .map(Duration::from_millis)
            .unwrap_or(defaults.search_debounce);

        let api_timeout = parse_u64(&lookup, "API_TIMEOUT_SECS")
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.api_timeout);

        let cookie_secure = lookup("COOKIE_SECURE")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(defaults.cookie_secure);

        Self {
            app_name: lookup("APP_NAME").unwrap_or(defaults.app_name),
            api_base_url,
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            session_key: lookup("SESSION_KEY"),
            cookie_secure,
            search_debounce,
            api_timeout,
        }
    }

    /// Session encryption key. Needs 64+ bytes to survive restarts; anything
    /// shorter gets a random key.
    pub fn cookie_key(&self) -> Key {
        match &self.session_key {
            Some(val) if val.len() >= 64 => {
                log::info!("Using SESSION_KEY from environment");
                Key::from(val.as_bytes())
            }
            Some(val) => {
                log::warn!("SESSION_KEY too short ({} bytes, need 64+), generating random key", val.len());
                Key::generate()
            }
            None => {
                log::warn!("No SESSION_KEY set, generating random key (sessions lost on restart)");
                Key::generate()
            }
        }
    }
}

fn parse_u64(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<u64> {
    let raw = lookup(key)?;
    match raw.trim().parse::<u64>() {
        Ok(v) => Some(v),
        Err(_) => {
            log::warn!("Ignoring invalid {key}={raw:?}");
            None
        }
    }
}
