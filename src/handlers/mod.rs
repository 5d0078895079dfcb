pub mod auth_handlers;
pub mod dashboard;
pub mod resource_handlers;
pub mod role_permission_handlers;
