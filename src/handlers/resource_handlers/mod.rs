//! List, detail, create, edit and delete screens shared by every admin
//! entity. Each entity plugs in through [`AdminResource`].

mod entities;
mod form;

use actix_session::Session;
use actix_web::{HttpResponse, Scope, web};
use async_trait::async_trait;
use serde::Deserialize;

use crate::api::{ApiClient, ApiError, Endpoint};
use crate::auth::{csrf, session};
use crate::config::AppConfig;
use crate::errors::{AppError, render, see_other};
use crate::models::{Role, UserStatus};
use crate::templates_structs::{
    DetailItem, FormField, PageContext, Pager, ResourceDetailTemplate, ResourceFormTemplate,
    ResourceListTemplate, ResourceMeta, RowAction, TableRow,
};

pub use crate::api::resources::{Courses, Permissions, Roles, UserStatuses, Users};
pub use form::FormData;

/// Lookup lists some forms need (user roles and statuses).
#[derive(Debug, Default)]
pub struct Choices {
    pub roles: Vec<Role>,
    pub statuses: Vec<UserStatus>,
}

#[async_trait]
pub trait AdminResource: Endpoint + Send + Sync + 'static {
    /// Path segment under `/painel`.
    const SLUG: &'static str;
    const SINGULAR: &'static str;
    const PLURAL: &'static str;
    const CAN_CREATE: bool = true;
    const CAN_DELETE: bool = true;

    fn id(record: &Self::Record) -> i64;
    fn columns() -> Vec<&'static str>;
    fn cells(record: &Self::Record) -> Vec<String>;

    /// Links shown next to edit/delete.
    fn row_actions(_record: &Self::Record) -> Vec<RowAction> {
        Vec::new()
    }

    fn details(record: &Self::Record, choices: &Choices) -> Vec<DetailItem>;

    /// Form fields, filled from the resubmitted form if there is one, else
    /// from the record being edited.
    fn fields(record: Option<&Self::Record>, submitted: Option<&FormData>, choices: &Choices) -> Vec<FormField>;

    /// Validate a submitted form. All messages are returned at once.
    fn parse(form: &FormData, editing: bool) -> Result<Self::Payload, Vec<String>>;

    async fn choices(_client: &ApiClient) -> Result<Choices, ApiError> {
        Ok(Choices::default())
    }
}

pub fn meta<R: AdminResource>() -> ResourceMeta {
    ResourceMeta {
        slug: R::SLUG,
        singular: R::SINGULAR,
        plural: R::PLURAL,
        can_create: R::CAN_CREATE,
        can_delete: R::CAN_DELETE,
    }
}

/// Routes for one entity, mounted under `/painel`.
pub fn scope<R: AdminResource>() -> Scope {
    web::scope(&format!("/{}", R::SLUG))
        .route("/list", web::get().to(list::<R>))
        .route("/create", web::get().to(new_form::<R>))
        .route("/create", web::post().to(create::<R>))
        .route("/{id}", web::get().to(show::<R>))
        .route("/{id}/edit", web::get().to(edit_form::<R>))
        .route("/{id}/edit", web::post().to(update::<R>))
        .route("/{id}/delete", web::post().to(delete::<R>))
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub page: Option<u32>,
    #[serde(default)]
    pub search: String,
}

fn page_url(meta: &ResourceMeta, page: u32, search: &str) -> String {
    let mut pairs = vec![("page", page.to_string())];
    if !search.is_empty() {
        pairs.push(("search", search.to_string()));
    }
    match serde_urlencoded::to_string(&pairs) {
        Ok(query) => format!("{}?{query}", meta.list_url()),
        Err(_) => meta.list_url(),
    }
}

pub async fn list<R: AdminResource>(
    config: web::Data<AppConfig>,
    api: web::Data<ApiClient>,
    session: Session,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
    let client = session::client_for(&session, &api)?;
    let meta = meta::<R>();
    let search = query.search.trim().to_string();

    let page = client.list::<R>(query.page.unwrap_or(1), &search).await?;

    let rows = page
        .data
        .iter()
        .map(|record| TableRow {
            id: R::id(record),
            cells: R::cells(record),
            actions: R::row_actions(record),
        })
        .collect();
    let pager = Pager {
        current: page.current_page,
        last: page.last_page,
        prev_url: page.has_previous().then(|| page_url(&meta, page.previous_page(), &search)),
        next_url: page.has_next().then(|| page_url(&meta, page.next_page(), &search)),
    };

    render(ResourceListTemplate {
        ctx: PageContext::build(&session, &config, &meta.list_url()),
        columns: R::columns(),
        rows,
        search,
        pager,
        meta,
    })
}

pub async fn show<R: AdminResource>(
    config: web::Data<AppConfig>,
    api: web::Data<ApiClient>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let client = session::client_for(&session, &api)?;
    let id = path.into_inner();
    let meta = meta::<R>();

    let record = client.fetch::<R>(id).await?;
    let choices = R::choices(&client).await?;

    render(ResourceDetailTemplate {
        ctx: PageContext::build(&session, &config, &meta.show_url(id)),
        id,
        details: R::details(&record, &choices),
        actions: R::row_actions(&record),
        meta,
    })
}

pub async fn new_form<R: AdminResource>(
    config: web::Data<AppConfig>,
    api: web::Data<ApiClient>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    if !R::CAN_CREATE {
        return Err(AppError::NotFound);
    }
    let client = session::client_for(&session, &api)?;
    let choices = R::choices(&client).await?;
    render(form_page::<R>(&session, &config, None, None, &choices, vec![]))
}

pub async fn create<R: AdminResource>(
    config: web::Data<AppConfig>,
    api: web::Data<ApiClient>,
    session: Session,
    form: web::Form<FormData>,
) -> Result<HttpResponse, AppError> {
    if !R::CAN_CREATE {
        return Err(AppError::NotFound);
    }
    csrf::validate_csrf(&session, form.get("csrf_token"))?;
    let client = session::client_for(&session, &api)?;

    let errors = match R::parse(&form, false) {
        Ok(payload) => match client.create::<R>(&payload).await {
            Ok(message) => {
                log::info!("Created {} via {}", R::SINGULAR, R::PATH);
                session::set_flash(&session, message.unwrap_or_else(|| format!("{} criado com sucesso.", R::SINGULAR)));
                return Ok(see_other(&meta::<R>().list_url()));
            }
            Err(e) => vec![rejection(e)?],
        },
        Err(errors) => errors,
    };

    let choices = R::choices(&client).await?;
    render(form_page::<R>(&session, &config, None, Some(&*form), &choices, errors))
}

pub async fn edit_form<R: AdminResource>(
    config: web::Data<AppConfig>,
    api: web::Data<ApiClient>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let client = session::client_for(&session, &api)?;
    let id = path.into_inner();
    let record = client.fetch::<R>(id).await?;
    let choices = R::choices(&client).await?;
    render(form_page::<R>(&session, &config, Some((id, &record)), None, &choices, vec![]))
}

pub async fn update<R: AdminResource>(
    config: web::Data<AppConfig>,
    api: web::Data<ApiClient>,
    session: Session,
    path: web::Path<i64>,
    form: web::Form<FormData>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, form.get("csrf_token"))?;
    let client = session::client_for(&session, &api)?;
    let id = path.into_inner();

    let errors = match R::parse(&form, true) {
        Ok(payload) => match client.update::<R>(id, &payload).await {
            Ok(message) => {
                log::info!("Updated {} {id}", R::SINGULAR);
                session::set_flash(&session, message.unwrap_or_else(|| format!("{} atualizado com sucesso.", R::SINGULAR)));
                return Ok(see_other(&meta::<R>().show_url(id)));
            }
            Err(e) => vec![rejection(e)?],
        },
        Err(errors) => errors,
    };

    let record = client.fetch::<R>(id).await?;
    let choices = R::choices(&client).await?;
    render(form_page::<R>(&session, &config, Some((id, &record)), Some(&*form), &choices, errors))
}

pub async fn delete<R: AdminResource>(
    api: web::Data<ApiClient>,
    session: Session,
    path: web::Path<i64>,
    form: web::Form<FormData>,
) -> Result<HttpResponse, AppError> {
    if !R::CAN_DELETE {
        return Err(AppError::NotFound);
    }
    csrf::validate_csrf(&session, form.get("csrf_token"))?;
    let client = session::client_for(&session, &api)?;
    let id = path.into_inner();

    let message = match client.delete::<R>(id).await {
        Ok(message) => {
            log::info!("Deleted {} {id}", R::SINGULAR);
            message.unwrap_or_else(|| format!("{} excluído com sucesso.", R::SINGULAR))
        }
        Err(e) => rejection(e)?,
    };
    session::set_flash(&session, message);
    Ok(see_other(&meta::<R>().list_url()))
}

/// Backend refusals (validation, conflicts) are shown to the user; anything
/// else becomes an error page.
fn rejection(err: ApiError) -> Result<String, AppError> {
    match err {
        ApiError::Rejected { status, message } if status != 404 => Ok(message),
        other => Err(AppError::Api(other)),
    }
}

fn form_page<R: AdminResource>(
    session: &Session,
    config: &AppConfig,
    editing: Option<(i64, &R::Record)>,
    submitted: Option<&FormData>,
    choices: &Choices,
    errors: Vec<String>,
) -> ResourceFormTemplate {
    let meta = meta::<R>();
    let (title, action) = match editing {
        Some((id, _)) => (format!("Editar {}", R::SINGULAR), meta.edit_url(id)),
        None => (format!("Novo {}", R::SINGULAR), meta.create_url()),
    };
    ResourceFormTemplate {
        ctx: PageContext::build(session, config, &action),
        fields: R::fields(editing.map(|(_, record)| record), submitted, choices),
        title,
        action,
        errors,
        meta,
    }
}

/// Value to prefill a field with: resubmitted input wins over the record.
pub(crate) fn prefill(submitted: Option<&FormData>, name: &str, current: impl FnOnce() -> String) -> String {
    match submitted {
        Some(form) => form.get(name).to_string(),
        None => current(),
    }
}
