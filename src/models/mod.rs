//! Typed schemas for everything the backend API returns or accepts.

pub mod course;
pub mod page;
pub mod permission;
pub mod role;
pub mod role_permission;
pub mod user;
pub mod user_status;

pub use course::{Course, CourseForm};
pub use page::Page;
pub use permission::{Permission, PermissionForm};
pub use role::{Role, RoleForm};
pub use role_permission::RolePermissionBundle;
pub use user::{User, UserForm};
pub use user_status::{UserStatus, UserStatusForm};

use serde::{Deserialize, Deserializer};

/// Treat an explicit `null` the same as a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Format a backend timestamp for display. Unparseable values are shown as-is.
pub fn display_timestamp(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return "-".to_string();
    };
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return dt.format("%d/%m/%Y %H:%M:%S").to_string();
    }
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return dt.format("%d/%m/%Y %H:%M:%S").to_string();
    }
    raw.to_string()
}
