use actix_session::SessionExt;
use actix_web::{
    Error, HttpResponse,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
};

use super::session::is_authenticated;
use crate::api::ApiError;
use crate::errors::AppError;

/// Redirects to the login screen (remembering where the user was going) when
/// the session holds no API token, and drops the token once the backend
/// answers 401.
pub async fn require_auth(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let session = req.get_session();

    if !is_authenticated(&session) {
        let location = login_redirect(req.path());
        let response = HttpResponse::SeeOther()
            .insert_header(("Location", location))
            .finish();
        return Ok(req.into_response(response).map_into_right_body());
    }

    let res = next.call(req).await?;
    if backend_rejected_token(&res) {
        // The stored token expired or was revoked.
        super::session::sign_out(&session);
    }
    Ok(res.map_into_left_body())
}

fn backend_rejected_token<B>(res: &ServiceResponse<B>) -> bool {
    res.response()
        .error()
        .and_then(|e| e.as_error::<AppError>())
        .is_some_and(|e| matches!(e, AppError::Api(ApiError::Unauthorized)))
}

fn login_redirect(path: &str) -> String {
    if path.is_empty() || path == "/" || path.ends_with("/ws") {
        return "/auth/login".to_string();
    }
    match serde_urlencoded::to_string([("next", path)]) {
        Ok(query) => format!("/auth/login?{query}"),
        Err(_) => "/auth/login".to_string(),
    }
}

/// Only same-site absolute paths are accepted as post-login targets.
pub fn safe_next(next: Option<&str>) -> String {
    match next {
        Some(n) if n.starts_with('/') && !n.starts_with("//") && !n.contains("://") => n.to_string(),
        _ => "/painel/dashboard".to_string(),
    }
}
