// Template context structures for askama templates, organized by screen.

use actix_session::Session;

use crate::auth::{csrf, session};
use crate::config::AppConfig;

mod auth;
mod dashboard;
mod resource;
mod role_permission;

pub use auth::*;
pub use dashboard::*;
pub use resource::*;
pub use role_permission::*;

/// Sidebar entries: (label, section prefix, landing url).
const NAV: &[(&str, &str, &str)] = &[
    ("Dashboard", "/painel/dashboard", "/painel/dashboard"),
    ("Cursos", "/painel/cursos", "/painel/cursos/list"),
    ("Usuários", "/painel/users", "/painel/users/list"),
    ("Perfis", "/painel/roles", "/painel/roles/list"),
    ("Permissões", "/painel/permissions", "/painel/permissions/list"),
    ("Status de usuário", "/painel/user-status", "/painel/user-status/list"),
];

pub struct NavLink {
    pub label: &'static str,
    pub url: &'static str,
    pub active: bool,
}

/// Common context shared by all authenticated pages.
/// Templates access these as `ctx.email`, `ctx.nav`, etc.
pub struct PageContext {
    pub app_name: String,
    pub email: String,
    pub avatar_initial: String,
    pub flash: Option<String>,
    pub csrf_token: String,
    pub theme: String,
    pub current_path: String,
    pub nav: Vec<NavLink>,
}

impl PageContext {
    pub fn build(session: &Session, config: &AppConfig, current_path: &str) -> Self {
        let email = session::get_email(session).unwrap_or_default();
        let avatar_initial = email.chars().next().unwrap_or('?').to_uppercase().to_string();
        let nav = NAV
            .iter()
            .map(|&(label, prefix, url)| NavLink {
                label,
                url,
                active: current_path.starts_with(prefix)
                    || (current_path.starts_with("/painel/role-permissions") && prefix == "/painel/roles"),
            })
            .collect();
        Self {
            app_name: config.app_name.clone(),
            email,
            avatar_initial,
            flash: session::take_flash(session),
            csrf_token: csrf::get_or_create_token(session),
            theme: session::get_theme(session).as_str().to_string(),
            current_path: current_path.to_string(),
            nav,
        }
    }
}

/// Shared fields of the public (logged-out) screens.
pub struct AuthShell {
    pub app_name: String,
    pub csrf_token: String,
    pub theme: String,
}

impl AuthShell {
    pub fn build(session: &Session, config: &AppConfig) -> Self {
        Self {
            app_name: config.app_name.clone(),
            csrf_token: csrf::get_or_create_token(session),
            theme: session::get_theme(session).as_str().to_string(),
        }
    }
}
