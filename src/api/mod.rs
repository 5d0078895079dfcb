//! HTTP client for the backend REST API.
//!
//! One `ApiClient` is built at startup and shared as app data. Requests made on
//! behalf of a logged-in user go through a copy bound to that user's session
//! token with [`ApiClient::with_token`].

pub mod auth;
pub mod error;
pub mod resources;
pub mod role_permissions;

use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub use error::ApiError;
pub use resources::Endpoint;
pub use role_permissions::{BundleQuery, SyncClient};

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
    client: Client,
}

/// `{ data, message }` wrapper used by most endpoints. Some handlers report
/// failures with a 200 and an `error` field instead of a status code.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    #[serde(default = "Option::default")]
    data: Option<T>,
    #[serde(default)]
    error: Option<String>,
}

impl<T> Envelope<T> {
    pub(crate) fn into_data(self) -> Result<T, ApiError> {
        if let Some(error) = self.error {
            return Err(ApiError::Rejected { status: 200, message: error });
        }
        self.data
            .ok_or_else(|| ApiError::Decode("response has no `data` field".to_string()))
    }
}

/// Body of error responses and of plain acknowledgements.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct MessageBody {
    #[serde(default)]
    pub(crate) message: Option<String>,
    #[serde(default)]
    pub(crate) error: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
            client,
        })
    }

    /// A copy of this client that authenticates with `token`. The underlying
    /// connection pool is shared.
    #[must_use]
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        Self {
            base_url: self.base_url.clone(),
            token: Some(token.into()),
            client: self.client.clone(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub const fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn build_headers(&self) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(ref token) = self.token {
            headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {token}"))?);
        }
        Ok(headers)
    }

    /// Send a request and return the raw body of a success response.
    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<Vec<u8>, ApiError> {
        let url = self.url(path);
        log::debug!("{method} {url}");

        let mut request = self.client.request(method, &url).headers(self.build_headers()?);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        read_body(response).await
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let bytes = self.send::<()>(Method::GET, path, query, None).await?;
        decode(&bytes)
    }

    pub(crate) async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let bytes = self.send(method, path, &[], Some(body)).await?;
        decode(&bytes)
    }

    /// Send a request whose success body may be empty. Returns the parsed body,
    /// or `None` when there was none.
    pub(crate) async fn send_optional<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Option<serde_json::Value>, ApiError> {
        let bytes = self.send(method, path, &[], body).await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        decode(&bytes).map(Some)
    }
}

async fn read_body(response: Response) -> Result<Vec<u8>, ApiError> {
    let status = response.status();
    let bytes = response.bytes().await?.to_vec();

    if status.is_success() {
        return Ok(bytes);
    }
    if status.as_u16() == 401 {
        return Err(ApiError::Unauthorized);
    }

    let message = rejection_message(status.as_u16(), &bytes);
    log::warn!("Backend rejected request with {status}: {message}");
    Err(ApiError::Rejected { status: status.as_u16(), message })
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ApiError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Pick the backend's own message (`message`, then `error`) or a generic one.
pub(crate) fn rejection_message(status: u16, bytes: &[u8]) -> String {
    let body: MessageBody = serde_json::from_slice(bytes).unwrap_or_default();
    body.message
        .or(body.error)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| match status {
            403 => "Você não tem permissão para esta ação.".to_string(),
            404 => "Registro não encontrado.".to_string(),
            422 => "Dados inválidos.".to_string(),
            _ => format!("Erro inesperado do servidor ({status})."),
        })
}
