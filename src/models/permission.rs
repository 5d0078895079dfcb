use serde::{Deserialize, Serialize};

/// A permission key. Read-only from the role editor's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub id: i64,
    /// Machine key, e.g. `users.edit`.
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Permission {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            title: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Human label when present, machine key otherwise.
    pub fn label(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(&self.name)
    }
}

/// Body of `PUT /permissions/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionForm {
    pub title: String,
    pub name: String,
}
