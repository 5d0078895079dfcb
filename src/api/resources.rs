//! CRUD calls for the admin entities. Each entity is a zero-sized marker
//! implementing [`Endpoint`]; the calls themselves are generic.

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{ApiClient, ApiError, Envelope};
use crate::models::page::PageEnvelope;
use crate::models::{
    Course, CourseForm, Page, Permission, PermissionForm, Role, RoleForm, User, UserForm,
    UserStatus, UserStatusForm,
};

/// Upper bound for [`ApiClient::list_all`], so a misbehaving `last_page`
/// cannot loop forever.
const MAX_PAGES: u32 = 50;

pub trait Endpoint {
    /// Collection path, e.g. `/cursos`.
    const PATH: &'static str;
    type Record: DeserializeOwned;
    type Payload: Serialize;
}

pub struct Courses;
pub struct Users;
pub struct Roles;
pub struct UserStatuses;
pub struct Permissions;

impl Endpoint for Courses {
    const PATH: &'static str = "/cursos";
    type Record = Course;
    type Payload = CourseForm;
}

impl Endpoint for Users {
    const PATH: &'static str = "/users";
    type Record = User;
    type Payload = UserForm;
}

impl Endpoint for Roles {
    const PATH: &'static str = "/roles";
    type Record = Role;
    type Payload = RoleForm;
}

impl Endpoint for UserStatuses {
    const PATH: &'static str = "/user-status";
    type Record = UserStatus;
    type Payload = UserStatusForm;
}

impl Endpoint for Permissions {
    const PATH: &'static str = "/permissions";
    type Record = Permission;
    type Payload = PermissionForm;
}

fn item_path<E: Endpoint>(id: i64) -> String {
    format!("{}/{}", E::PATH, id)
}

impl ApiClient {
    /// `GET {path}?page=&search=`
    pub async fn list<E: Endpoint>(&self, page: u32, search: &str) -> Result<Page<E::Record>, ApiError> {
        let mut query = vec![("page", page.max(1).to_string())];
        if !search.trim().is_empty() {
            query.push(("search", search.trim().to_string()));
        }
        let envelope: PageEnvelope<E::Record> = self.get_json(E::PATH, &query).await?;
        Ok(envelope.into_page())
    }

    /// Walk every page of a collection. Used for form dropdowns.
    pub async fn list_all<E: Endpoint>(&self) -> Result<Vec<E::Record>, ApiError> {
        let mut items = Vec::new();
        let mut page = 1;
        loop {
            let batch = self.list::<E>(page, "").await?;
            let last = batch.last_page.min(MAX_PAGES);
            items.extend(batch.data);
            if page >= last {
                break;
            }
            page += 1;
        }
        Ok(items)
    }

    /// `GET {path}/{id}`
    pub async fn fetch<E: Endpoint>(&self, id: i64) -> Result<E::Record, ApiError> {
        let envelope: Envelope<E::Record> = self.get_json(&item_path::<E>(id), &[]).await?;
        envelope.into_data()
    }

    /// `POST {path}`. Returns the backend's confirmation message, if any.
    pub async fn create<E: Endpoint>(&self, payload: &E::Payload) -> Result<Option<String>, ApiError> {
        self.ack_with(Method::POST, E::PATH, Some(payload)).await
    }

    /// `PUT {path}/{id}`
    pub async fn update<E: Endpoint>(&self, id: i64, payload: &E::Payload) -> Result<Option<String>, ApiError> {
        self.ack_with(Method::PUT, &item_path::<E>(id), Some(payload)).await
    }

    /// `DELETE {path}/{id}`
    pub async fn delete<E: Endpoint>(&self, id: i64) -> Result<Option<String>, ApiError> {
        self.ack_with::<()>(Method::DELETE, &item_path::<E>(id), None).await
    }
}
