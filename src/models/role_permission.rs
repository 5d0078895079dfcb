use serde::{Deserialize, Deserializer, Serialize};

use super::page::PageOrList;
use super::{Page, Permission, Role, User};

/// Everything the role-permission screen needs, from
/// `GET /role-permissions/{roleId}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RolePermissionBundle {
    pub role: Role,
    #[serde(default)]
    pub permissions: Page<Permission>,
    #[serde(rename = "rolePermissions", default, deserialize_with = "super::null_as_default")]
    pub role_permissions: Vec<i64>,
    #[serde(default, deserialize_with = "users_field")]
    pub users: Page<User>,
}

fn users_field<'de, D>(deserializer: D) -> Result<Page<User>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<PageOrList<User>>::deserialize(deserializer)?;
    Ok(value.map(Page::from).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_paginated_users() {
        let bundle: RolePermissionBundle = serde_json::from_value(json!({
            "role": {"id": 5, "name": "editor"},
            "permissions": {"data": [{"id": 1, "name": "edit"}], "current_page": 1, "last_page": 2},
            "rolePermissions": [1],
            "users": {"data": [{"id": 9, "name": "Bia", "email": "bia@example.com"}], "current_page": 1, "last_page": 1}
        }))
        .expect("decode");
        assert_eq!(bundle.role.id, 5);
        assert_eq!(bundle.permissions.last_page, 2);
        assert_eq!(bundle.role_permissions, vec![1]);
        assert_eq!(bundle.users.data[0].id, 9);
    }

    #[test]
    fn decodes_bare_user_array() {
        let bundle: RolePermissionBundle = serde_json::from_value(json!({
            "role": {"id": 5, "name": "editor"},
            "permissions": {"data": []},
            "rolePermissions": [],
            "users": [{"id": 9, "name": "Bia", "email": "bia@example.com", "roles": [{"id": 5, "name": "editor"}]}]
        }))
        .expect("decode");
        assert_eq!(bundle.users.data.len(), 1);
        assert!(bundle.users.data[0].has_role(5));
    }

    #[test]
    fn missing_role_is_an_error() {
        let result: Result<RolePermissionBundle, _> = serde_json::from_value(json!({
            "permissions": {"data": []}
        }));
        assert!(result.is_err());
    }
}
