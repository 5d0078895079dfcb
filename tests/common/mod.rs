//! Shared test infrastructure: JSON fixtures for the backend, an in-memory
//! `SyncClient`, and helpers for driving the actix app with a session cookie.

#![allow(dead_code, unused_macros)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use actix_web::body::MessageBody;
use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use async_trait::async_trait;
use regex::Regex;
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use painel::api::{ApiError, BundleQuery, SyncClient};
use painel::config::AppConfig;
use painel::models::RolePermissionBundle;

// ============================================================================
// FIXTURES
// ============================================================================

pub const ROLE_ID: i64 = 5;
pub const TOKEN: &str = "tok-123";
pub const SESSION_COOKIE: &str = "id";

pub fn permission_json(id: i64, name: &str) -> Value {
    json!({ "id": id, "name": name, "title": null })
}

pub fn user_json(id: i64, name: &str, role_ids: &[i64]) -> Value {
    let roles: Vec<Value> = role_ids.iter().map(|r| json!({ "id": r, "name": format!("role-{r}") })).collect();
    json!({
        "id": id,
        "name": name,
        "email": format!("{}@example.com", name.to_lowercase()),
        "roles": roles,
    })
}

pub fn page_json(data: Vec<Value>, current: u32, last: u32) -> Value {
    let total = data.len();
    json!({ "data": data, "current_page": current, "last_page": last, "per_page": 15, "total": total })
}

/// The role 5 / permissions 1 "edit" and 2 "view" / granted [1] scenario, with
/// one member (10) and one non-member (11).
pub fn bundle_json(granted: &[i64]) -> Value {
    json!({
        "role": { "id": ROLE_ID, "name": "editor" },
        "permissions": page_json(
            vec![permission_json(1, "edit"), permission_json(2, "view"), permission_json(7, "delete")],
            1,
            1,
        ),
        "rolePermissions": granted,
        "users": page_json(
            vec![user_json(10, "Ana", &[ROLE_ID]), user_json(11, "Bruno", &[])],
            1,
            1,
        ),
    })
}

pub fn bundle(granted: &[i64]) -> RolePermissionBundle {
    serde_json::from_value(bundle_json(granted)).expect("fixture bundle decodes")
}

pub fn test_config(api_base_url: &str) -> AppConfig {
    AppConfig {
        api_base_url: api_base_url.to_string(),
        api_timeout: Duration::from_secs(5),
        ..AppConfig::default()
    }
}

// ============================================================================
// FAKE SYNC CLIENT
// ============================================================================

/// In-memory backend for editor sessions. Every call is recorded; responses
/// take `delay` of (tokio) time so tests can interleave them.
#[derive(Default)]
pub struct FakeClient {
    pub granted: Mutex<Vec<i64>>,
    pub fetch_delay: Duration,
    pub toggle_delay: Duration,
    pub fetch_errors: Mutex<VecDeque<ApiError>>,
    pub toggle_errors: Mutex<VecDeque<ApiError>>,
    pub fetches: Mutex<Vec<BundleQuery>>,
    pub toggles: Mutex<Vec<(&'static str, i64)>>,
}

impl FakeClient {
    pub fn with_granted(granted: &[i64]) -> Self {
        Self {
            granted: Mutex::new(granted.to_vec()),
            ..Self::default()
        }
    }

    pub fn fetches(&self) -> Vec<BundleQuery> {
        self.fetches.lock().expect("lock").clone()
    }

    pub fn toggles(&self) -> Vec<(&'static str, i64)> {
        self.toggles.lock().expect("lock").clone()
    }

    pub fn fail_next_toggle(&self, err: ApiError) {
        self.toggle_errors.lock().expect("lock").push_back(err);
    }

    pub fn fail_next_fetch(&self, err: ApiError) {
        self.fetch_errors.lock().expect("lock").push_back(err);
    }
}

#[async_trait]
impl SyncClient for FakeClient {
    async fn fetch_bundle(&self, role_id: i64, query: &BundleQuery) -> Result<RolePermissionBundle, ApiError> {
        assert_eq!(role_id, ROLE_ID);
        self.fetches.lock().expect("lock").push(query.clone());
        tokio::time::sleep(self.fetch_delay).await;
        if let Some(err) = self.fetch_errors.lock().expect("lock").pop_front() {
            return Err(err);
        }
        let granted = self.granted.lock().expect("lock").clone();
        Ok(bundle(&granted))
    }

    async fn toggle_permission(&self, _role_id: i64, permission_id: i64) -> Result<Option<bool>, ApiError> {
        self.toggles.lock().expect("lock").push(("permission", permission_id));
        tokio::time::sleep(self.toggle_delay).await;
        if let Some(err) = self.toggle_errors.lock().expect("lock").pop_front() {
            return Err(err);
        }
        let mut granted = self.granted.lock().expect("lock");
        let now = if let Some(pos) = granted.iter().position(|p| *p == permission_id) {
            granted.remove(pos);
            false
        } else {
            granted.push(permission_id);
            true
        };
        Ok(Some(now))
    }

    async fn toggle_user(&self, _role_id: i64, user_id: i64) -> Result<Option<bool>, ApiError> {
        self.toggles.lock().expect("lock").push(("user", user_id));
        tokio::time::sleep(self.toggle_delay).await;
        if let Some(err) = self.toggle_errors.lock().expect("lock").pop_front() {
            return Err(err);
        }
        Ok(None)
    }
}

// ============================================================================
// HTTP HELPERS
// ============================================================================

/// Build the app against `config` the way `main` does, minus static files.
macro_rules! init_app {
    ($config:expr) => {{
        let config: painel::config::AppConfig = $config;
        let api = painel::api::ApiClient::new(config.api_base_url.clone(), config.api_timeout)
            .expect("api client");
        let key = actix_web::cookie::Key::generate();
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(painel::app::session_middleware(&config, key))
                .app_data(actix_web::web::Data::new(config.clone()))
                .app_data(actix_web::web::Data::new(api))
                .configure(painel::app::configure),
        )
        .await
    }};
}

/// The session cookie set by a response, if it set one.
pub fn session_cookie<B>(resp: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    resp.response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .map(|c| c.into_owned())
}

pub fn location<B>(resp: &ServiceResponse<B>) -> Option<String> {
    resp.headers()
        .get("Location")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

pub fn extract_csrf(html: &str) -> String {
    let re = Regex::new(r#"name="csrf_token" value="([0-9a-f]{64})""#).expect("regex");
    re.captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .expect("page carries a csrf token")
}

pub async fn body_text<B: MessageBody>(resp: ServiceResponse<B>) -> String {
    let bytes = actix_web::test::read_body(resp).await;
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

// ============================================================================
// MOCK BACKEND
// ============================================================================

/// A mock backend plus an app config pointing at it.
pub async fn backend() -> (MockServer, AppConfig) {
    let server = MockServer::start().await;
    let config = test_config(&format!("{}/api/v1", server.uri()));
    (server, config)
}

/// `POST /auth/login` answers with [`TOKEN`].
pub async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": TOKEN })))
        .mount(server)
        .await;
}

/// Log in through the real form. Evaluates to the signed-in session cookie
/// and the session's CSRF token.
macro_rules! login {
    ($app:expr) => {{
        let resp = actix_web::test::call_service(
            $app,
            actix_web::test::TestRequest::get().uri("/auth/login").to_request(),
        )
        .await;
        let cookie = common::session_cookie(&resp).expect("session cookie");
        let csrf = common::extract_csrf(&common::body_text(resp).await);

        let req = actix_web::test::TestRequest::post()
            .uri("/auth/login")
            .cookie(cookie)
            .set_form([("email", "ana@example.com"), ("password", "segredo123"), ("csrf_token", csrf.as_str())])
            .to_request();
        let resp = actix_web::test::call_service($app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::SEE_OTHER, "login failed");
        (common::session_cookie(&resp).expect("signed-in cookie"), csrf)
    }};
}
