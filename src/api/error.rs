//! Backend API error types.
//!
//! Every failure of an outgoing request is classified here, at the client
//! boundary, so nothing above it has to inspect transport details.

use thiserror::Error;

pub const CONNECTION_MESSAGE: &str = "Erro de conexão com o servidor, tente novamente mais tarde.";
pub const UNEXPECTED_MESSAGE: &str = "Resposta inesperada do servidor.";

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced an HTTP response (DNS, refused, timeout).
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with a non-success status.
    #[error("Server rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// 401 from the backend: the session token is missing or expired.
    #[error("Not authenticated")]
    Unauthorized,

    /// A success status with a body that does not match the expected schema.
    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Invalid header value: {0}")]
    InvalidHeader(String),
}

impl ApiError {
    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Rejected { status: 404, .. })
    }

    /// Human-readable message for the UI.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(_) => CONNECTION_MESSAGE.to_string(),
            ApiError::Rejected { message, .. } => message.clone(),
            ApiError::Unauthorized => "Sessão expirada, faça login novamente.".to_string(),
            ApiError::Decode(_) | ApiError::InvalidHeader(_) => UNEXPECTED_MESSAGE.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

impl From<reqwest::header::InvalidHeaderValue> for ApiError {
    fn from(err: reqwest::header::InvalidHeaderValue) -> Self {
        ApiError::InvalidHeader(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_message_is_shown_verbatim() {
        let err = ApiError::Rejected { status: 422, message: "Nome já existe".to_string() };
        assert_eq!(err.user_message(), "Nome já existe");
        assert!(!err.is_network());
    }

    #[test]
    fn transport_failures_get_generic_message() {
        let err = ApiError::Network("connection refused".to_string());
        assert!(err.is_network());
        assert_eq!(err.user_message(), CONNECTION_MESSAGE);
    }

    #[test]
    fn not_found_is_detected() {
        let err = ApiError::Rejected { status: 404, message: "x".to_string() };
        assert!(err.is_not_found());
        assert!(!ApiError::Unauthorized.is_not_found());
    }
}
