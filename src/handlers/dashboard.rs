use actix_session::Session;
use actix_web::{HttpResponse, web};
use chrono::{Local, Timelike};
use serde::Deserialize;

use crate::api::{ApiClient, ApiError};
use crate::api::resources::{Courses, Permissions, Roles, UserStatuses, Users};
use crate::auth::middleware::safe_next;
use crate::auth::{csrf, session};
use crate::config::AppConfig;
use crate::errors::{AppError, render, see_other};
use crate::models::Page;
use crate::templates_structs::{DashboardCard, DashboardTemplate, PageContext};

fn time_greeting(email: &str) -> String {
    let period = match Local::now().hour() {
        5..=11 => "Bom dia",
        12..=17 => "Boa tarde",
        _ => "Boa noite",
    };
    let name = email.split('@').next().unwrap_or(email);
    if name.is_empty() {
        period.to_string()
    } else {
        format!("{period}, {name}")
    }
}

/// Totals are best-effort: a failing count shows as "-" instead of failing
/// the whole page. An expired token still sends the user to login.
fn count<T>(result: Result<Page<T>, ApiError>) -> Result<Option<u64>, AppError> {
    match result {
        Ok(page) => Ok(Some(page.total.unwrap_or(page.data.len() as u64))),
        Err(ApiError::Unauthorized) => Err(AppError::Api(ApiError::Unauthorized)),
        Err(e) => {
            log::warn!("Dashboard count failed: {e}");
            Ok(None)
        }
    }
}

pub async fn index(
    config: web::Data<AppConfig>,
    api: web::Data<ApiClient>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let client = session::client_for(&session, &api)?;
    let ctx = PageContext::build(&session, &config, "/painel/dashboard");

    let (courses, users, roles, statuses, permissions) = tokio::join!(
        client.list::<Courses>(1, ""),
        client.list::<Users>(1, ""),
        client.list::<Roles>(1, ""),
        client.list::<UserStatuses>(1, ""),
        client.list::<Permissions>(1, ""),
    );

    let cards = vec![
        DashboardCard { label: "Cursos", url: "/painel/cursos/list", total: count(courses)? },
        DashboardCard { label: "Usuários", url: "/painel/users/list", total: count(users)? },
        DashboardCard { label: "Perfis", url: "/painel/roles/list", total: count(roles)? },
        DashboardCard { label: "Status de usuário", url: "/painel/user-status/list", total: count(statuses)? },
        DashboardCard { label: "Permissões", url: "/painel/permissions/list", total: count(permissions)? },
    ];

    let greeting = time_greeting(&ctx.email);
    render(DashboardTemplate { ctx, greeting, cards })
}

#[derive(Deserialize)]
pub struct ThemeForm {
    pub csrf_token: String,
    #[serde(default)]
    pub next: Option<String>,
}

/// Flip light/dark and go back to the page the toggle was pressed on.
pub async fn toggle_theme(
    session: Session,
    form: web::Form<ThemeForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let theme = session::toggle_theme(&session);
    log::debug!("Theme switched to {}", theme.as_str());
    Ok(see_other(&safe_next(form.next.as_deref())))
}
