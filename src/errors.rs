use actix_web::{HttpResponse, ResponseError};
use askama::Template;
use std::fmt;

use crate::api::ApiError;

#[derive(Debug)]
pub enum AppError {
    Api(ApiError),
    Template(askama::Error),
    Session(String),
    Csrf,
    NotFound,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Api(e) => write!(f, "API error: {e}"),
            AppError::Template(e) => write!(f, "Template error: {e}"),
            AppError::Session(e) => write!(f, "Session error: {e}"),
            AppError::Csrf => write!(f, "Invalid or missing CSRF token"),
            AppError::NotFound => write!(f, "Not found"),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::NotFound => not_found(),
            AppError::Api(e) if e.is_not_found() => not_found(),
            AppError::Api(ApiError::Unauthorized) | AppError::Session(_) => {
                log::info!("{self}, redirecting to login");
                HttpResponse::SeeOther()
                    .insert_header(("Location", "/auth/login"))
                    .finish()
            }
            AppError::Csrf => HttpResponse::Forbidden().body("Invalid or missing CSRF token"),
            AppError::Api(e) if e.is_network() => {
                log::error!("{self}");
                HttpResponse::BadGateway()
                    .content_type("text/plain; charset=utf-8")
                    .body(e.user_message())
            }
            _ => {
                log::error!("{self}");
                HttpResponse::InternalServerError().body("Internal Server Error")
            }
        }
    }
}

fn not_found() -> HttpResponse {
    let html = include_str!("../templates/errors/404.html");
    HttpResponse::NotFound()
        .content_type("text/html; charset=utf-8")
        .body(html)
}

impl From<ApiError> for AppError {
    fn from(e: ApiError) -> Self {
        AppError::Api(e)
    }
}

impl From<askama::Error> for AppError {
    fn from(e: askama::Error) -> Self {
        AppError::Template(e)
    }
}

/// Render an askama template into an HTML response.
pub fn render(tmpl: impl Template) -> Result<HttpResponse, AppError> {
    let body = tmpl.render()?;
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body))
}

/// 303 redirect, the response to every successful form POST.
pub fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header(("Location", location))
        .finish()
}
