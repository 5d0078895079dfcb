//! Role-permission association endpoints, behind the [`SyncClient`] seam used
//! by the editor.

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use super::{ApiClient, ApiError, Envelope};
use crate::models::RolePermissionBundle;

/// Filters and pages for the bundle fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleQuery {
    pub permission_search: String,
    pub permission_page: u32,
    pub user_search: String,
    pub user_page: u32,
}

impl Default for BundleQuery {
    fn default() -> Self {
        Self {
            permission_search: String::new(),
            permission_page: 1,
            user_search: String::new(),
            user_page: 1,
        }
    }
}

impl BundleQuery {
    fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("permission_page", self.permission_page.max(1).to_string()),
            ("user_page", self.user_page.max(1).to_string()),
        ];
        if !self.permission_search.is_empty() {
            pairs.push(("permission_search", self.permission_search.clone()));
        }
        if !self.user_search.is_empty() {
            pairs.push(("user_search", self.user_search.clone()));
        }
        pairs
    }
}

/// Reads and toggles role associations. Every call either succeeds (toggles
/// may report the resulting membership) or fails with a classified
/// [`ApiError`]. Nothing is retried.
#[async_trait]
pub trait SyncClient: Send + Sync + 'static {
    async fn fetch_bundle(&self, role_id: i64, query: &BundleQuery) -> Result<RolePermissionBundle, ApiError>;

    /// Flip whether `role_id` is granted `permission_id`.
    async fn toggle_permission(&self, role_id: i64, permission_id: i64) -> Result<Option<bool>, ApiError>;

    /// Flip whether `user_id` has `role_id`.
    async fn toggle_user(&self, role_id: i64, user_id: i64) -> Result<Option<bool>, ApiError>;
}

#[async_trait]
impl SyncClient for ApiClient {
    async fn fetch_bundle(&self, role_id: i64, query: &BundleQuery) -> Result<RolePermissionBundle, ApiError> {
        let path = format!("/role-permissions/{role_id}");
        let envelope: Envelope<RolePermissionBundle> = self.get_json(&path, &query.to_pairs()).await?;
        envelope.into_data()
    }

    async fn toggle_permission(&self, role_id: i64, permission_id: i64) -> Result<Option<bool>, ApiError> {
        let path = format!("/role-permissions/{role_id}/{permission_id}");
        let body = self.send_optional::<()>(Method::PATCH, &path, None).await?;
        Ok(body.as_ref().and_then(reported_state))
    }

    async fn toggle_user(&self, role_id: i64, user_id: i64) -> Result<Option<bool>, ApiError> {
        let path = format!("/role-permissions/{role_id}/toggle-user/{user_id}");
        let body = self.send_optional::<()>(Method::PATCH, &path, None).await?;
        Ok(body.as_ref().and_then(reported_state))
    }
}

const STATE_KEYS: [&str; 3] = ["granted", "attached", "active"];

/// Resulting membership if the toggle response reports one, either at the top
/// level or inside `data`.
pub(crate) fn reported_state(body: &Value) -> Option<bool> {
    let lookup = |obj: &Value| STATE_KEYS.iter().find_map(|key| obj.get(*key).and_then(Value::as_bool));
    lookup(body).or_else(|| body.get("data").and_then(lookup))
}
