//! Route table and session middleware, shared by `main` and the integration
//! tests.

use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::Key;
use actix_web::middleware::from_fn;
use actix_web::{HttpResponse, web};

use crate::auth::middleware::require_auth;
use crate::config::AppConfig;
use crate::errors::AppError;
use crate::handlers::resource_handlers::{self, Courses, Permissions, Roles, UserStatuses, Users};
use crate::handlers::{auth_handlers, dashboard, role_permission_handlers};

pub fn session_middleware(config: &AppConfig, key: Key) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_secure(config.cookie_secure)
        .cookie_http_only(true)
        .build()
}

/// Every page route. Static files are mounted by the caller.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(|| async { crate::errors::see_other("/painel/dashboard") }))
        .service(
            web::scope("/auth")
                .route("/login", web::get().to(auth_handlers::login_page))
                .route("/login", web::post().to(auth_handlers::login_submit))
                .route("/register", web::get().to(auth_handlers::register_page))
                .route("/register", web::post().to(auth_handlers::register_submit))
                .route("/verify-email", web::get().to(auth_handlers::verify_page))
                .route("/verify-email", web::post().to(auth_handlers::verify_submit))
                .route("/resend-verification", web::post().to(auth_handlers::resend_verification))
                .route("/forgot-password", web::get().to(auth_handlers::forgot_page))
                .route("/forgot-password", web::post().to(auth_handlers::forgot_submit))
                .route("/reset-password", web::get().to(auth_handlers::reset_page))
                .route("/reset-password", web::post().to(auth_handlers::reset_submit)),
        )
        .route("/logout", web::post().to(auth_handlers::logout))
        .service(
            web::scope("/painel")
                .wrap(from_fn(require_auth))
                .route("/dashboard", web::get().to(dashboard::index))
                .route("/theme", web::post().to(dashboard::toggle_theme))
                .route("/role-permissions/{id}", web::get().to(role_permission_handlers::page))
                .route("/role-permissions/{id}/ws", web::get().to(role_permission_handlers::ws_connect))
                .service(resource_handlers::scope::<Courses>())
                .service(resource_handlers::scope::<Users>())
                .service(resource_handlers::scope::<Roles>())
                .service(resource_handlers::scope::<UserStatuses>())
                .service(resource_handlers::scope::<Permissions>()),
        )
        .default_service(web::to(not_found));
}

async fn not_found() -> Result<HttpResponse, AppError> {
    Err(AppError::NotFound)
}
