use serde::{Deserialize, Serialize};

/// A named bundle of permissions assignable to users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Role {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            created_at: None,
            updated_at: None,
        }
    }
}

/// Body of `POST /roles` and `PUT /roles/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleForm {
    pub name: String,
}
