use askama::Template;

use super::PageContext;

/// Shell of the live role-permission editor. The lists themselves are filled
/// in over the WebSocket at `ws_path`.
#[derive(Template)]
#[template(path = "role_permissions/editor.html")]
pub struct RolePermissionTemplate {
    pub ctx: PageContext,
    pub role_id: i64,
    pub ws_path: String,
}
