use serde::{Deserialize, Serialize};

use super::Role;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub user_status_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl User {
    pub fn has_role(&self, role_id: i64) -> bool {
        self.roles.iter().any(|r| r.id == role_id)
    }

    pub fn role_names(&self) -> String {
        self.roles
            .iter()
            .map(|r| r.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Body of `POST /users` and `PUT /users/{id}`. Password fields are only sent
/// when set, so an edit without a new password leaves it untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserForm {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_confirmation: Option<String>,
    pub roles: Vec<i64>,
    pub user_status_id: Option<i64>,
}
