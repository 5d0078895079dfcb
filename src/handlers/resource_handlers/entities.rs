use async_trait::async_trait;

use super::{AdminResource, Choices, FormData, prefill};
use crate::api::resources::{Courses, Permissions, Roles, UserStatuses, Users};
use crate::api::{ApiClient, ApiError};
use crate::auth::validate::{self, MIN_NAME, MIN_USER_PASSWORD};
use crate::models::{
    Course, CourseForm, Permission, PermissionForm, Role, RoleForm, User, UserForm, UserStatus,
    UserStatusForm, display_timestamp,
};
use crate::templates_structs::{ChoiceOption, DetailItem, FieldKind, FormField, RowAction};

fn timestamps(created_at: Option<&str>, updated_at: Option<&str>) -> [DetailItem; 2] {
    [
        DetailItem { label: "Criado em", value: display_timestamp(created_at) },
        DetailItem { label: "Atualizado em", value: display_timestamp(updated_at) },
    ]
}

fn name_field(record_name: Option<&str>, submitted: Option<&FormData>) -> FormField {
    let value = prefill(submitted, "name", || record_name.unwrap_or_default().to_string());
    FormField::input("name", "Nome", FieldKind::Text, value)
}

fn parse_name(form: &FormData, subject: &str) -> Result<String, Vec<String>> {
    let name = form.trimmed("name");
    match validate::validate_name(name, subject, MIN_NAME) {
        Some(message) => Err(vec![message]),
        None => Ok(name.to_string()),
    }
}

// ---- cursos ----

#[async_trait]
impl AdminResource for Courses {
    const SLUG: &'static str = "cursos";
    const SINGULAR: &'static str = "Curso";
    const PLURAL: &'static str = "Cursos";

    fn id(record: &Course) -> i64 {
        record.id
    }

    fn columns() -> Vec<&'static str> {
        vec!["ID", "Nome", "Criado em"]
    }

    fn cells(record: &Course) -> Vec<String> {
        vec![
            record.id.to_string(),
            record.name.clone(),
            display_timestamp(record.created_at.as_deref()),
        ]
    }

    fn details(record: &Course, _choices: &Choices) -> Vec<DetailItem> {
        let mut items = vec![
            DetailItem { label: "ID", value: record.id.to_string() },
            DetailItem { label: "Nome", value: record.name.clone() },
        ];
        items.extend(timestamps(record.created_at.as_deref(), record.updated_at.as_deref()));
        items
    }

    fn fields(record: Option<&Course>, submitted: Option<&FormData>, _choices: &Choices) -> Vec<FormField> {
        vec![name_field(record.map(|r| r.name.as_str()), submitted)]
    }

    fn parse(form: &FormData, _editing: bool) -> Result<CourseForm, Vec<String>> {
        parse_name(form, "O nome do curso").map(|name| CourseForm { name })
    }
}

// ---- perfis ----

#[async_trait]
impl AdminResource for Roles {
    const SLUG: &'static str = "roles";
    const SINGULAR: &'static str = "Perfil";
    const PLURAL: &'static str = "Perfis";

    fn id(record: &Role) -> i64 {
        record.id
    }

    fn columns() -> Vec<&'static str> {
        vec!["ID", "Nome", "Criado em"]
    }

    fn cells(record: &Role) -> Vec<String> {
        vec![
            record.id.to_string(),
            record.name.clone(),
            display_timestamp(record.created_at.as_deref()),
        ]
    }

    fn row_actions(record: &Role) -> Vec<RowAction> {
        vec![RowAction {
            label: "Permissões",
            url: format!("/painel/role-permissions/{}", record.id),
        }]
    }

    fn details(record: &Role, _choices: &Choices) -> Vec<DetailItem> {
        let mut items = vec![
            DetailItem { label: "ID", value: record.id.to_string() },
            DetailItem { label: "Nome", value: record.name.clone() },
        ];
        items.extend(timestamps(record.created_at.as_deref(), record.updated_at.as_deref()));
        items
    }

    fn fields(record: Option<&Role>, submitted: Option<&FormData>, _choices: &Choices) -> Vec<FormField> {
        vec![name_field(record.map(|r| r.name.as_str()), submitted)]
    }

    fn parse(form: &FormData, _editing: bool) -> Result<RoleForm, Vec<String>> {
        parse_name(form, "O nome do perfil").map(|name| RoleForm { name })
    }
}

// ---- status de usuário ----

#[async_trait]
impl AdminResource for UserStatuses {
    const SLUG: &'static str = "user-status";
    const SINGULAR: &'static str = "Status";
    const PLURAL: &'static str = "Status de usuário";

    fn id(record: &UserStatus) -> i64 {
        record.id
    }

    fn columns() -> Vec<&'static str> {
        vec!["ID", "Nome", "Criado em"]
    }

    fn cells(record: &UserStatus) -> Vec<String> {
        vec![
            record.id.to_string(),
            record.name.clone(),
            display_timestamp(record.created_at.as_deref()),
        ]
    }

    fn details(record: &UserStatus, _choices: &Choices) -> Vec<DetailItem> {
        let mut items = vec![
            DetailItem { label: "ID", value: record.id.to_string() },
            DetailItem { label: "Nome", value: record.name.clone() },
        ];
        items.extend(timestamps(record.created_at.as_deref(), record.updated_at.as_deref()));
        items
    }

    fn fields(record: Option<&UserStatus>, submitted: Option<&FormData>, _choices: &Choices) -> Vec<FormField> {
        vec![name_field(record.map(|r| r.name.as_str()), submitted)]
    }

    fn parse(form: &FormData, _editing: bool) -> Result<UserStatusForm, Vec<String>> {
        parse_name(form, "O nome do status").map(|name| UserStatusForm { name })
    }
}

// ---- permissões (no create/delete) ----

#[async_trait]
impl AdminResource for Permissions {
    const SLUG: &'static str = "permissions";
    const SINGULAR: &'static str = "Permissão";
    const PLURAL: &'static str = "Permissões";
    const CAN_CREATE: bool = false;
    const CAN_DELETE: bool = false;

    fn id(record: &Permission) -> i64 {
        record.id
    }

    fn columns() -> Vec<&'static str> {
        vec!["ID", "Nome", "Título"]
    }

    fn cells(record: &Permission) -> Vec<String> {
        vec![
            record.id.to_string(),
            record.name.clone(),
            record.title.clone().unwrap_or_default(),
        ]
    }

    fn details(record: &Permission, _choices: &Choices) -> Vec<DetailItem> {
        let mut items = vec![
            DetailItem { label: "ID", value: record.id.to_string() },
            DetailItem { label: "Nome", value: record.name.clone() },
            DetailItem { label: "Título", value: record.title.clone().unwrap_or_else(|| "-".to_string()) },
        ];
        items.extend(timestamps(record.created_at.as_deref(), record.updated_at.as_deref()));
        items
    }

    fn fields(record: Option<&Permission>, submitted: Option<&FormData>, _choices: &Choices) -> Vec<FormField> {
        let title = prefill(submitted, "title", || {
            record.and_then(|r| r.title.clone()).unwrap_or_default()
        });
        vec![
            FormField::input("title", "Título", FieldKind::Text, title).optional(),
            name_field(record.map(|r| r.name.as_str()), submitted),
        ]
    }

    fn parse(form: &FormData, _editing: bool) -> Result<PermissionForm, Vec<String>> {
        let name = parse_name(form, "O nome da permissão")?;
        Ok(PermissionForm {
            title: form.trimmed("title").to_string(),
            name,
        })
    }
}

// ---- usuários ----

#[async_trait]
impl AdminResource for Users {
    const SLUG: &'static str = "users";
    const SINGULAR: &'static str = "Usuário";
    const PLURAL: &'static str = "Usuários";

    fn id(record: &User) -> i64 {
        record.id
    }

    fn columns() -> Vec<&'static str> {
        vec!["ID", "Nome", "E-mail", "Perfis"]
    }

    fn cells(record: &User) -> Vec<String> {
        vec![
            record.id.to_string(),
            record.name.clone(),
            record.email.clone(),
            record.role_names(),
        ]
    }

    fn details(record: &User, choices: &Choices) -> Vec<DetailItem> {
        let status = record
            .user_status_id
            .and_then(|id| choices.statuses.iter().find(|s| s.id == id))
            .map_or_else(|| "-".to_string(), |s| s.name.clone());
        let roles = record.role_names();
        let mut items = vec![
            DetailItem { label: "ID", value: record.id.to_string() },
            DetailItem { label: "Nome", value: record.name.clone() },
            DetailItem { label: "E-mail", value: record.email.clone() },
            DetailItem { label: "Perfis", value: if roles.is_empty() { "-".to_string() } else { roles } },
            DetailItem { label: "Status", value: status },
        ];
        items.extend(timestamps(record.created_at.as_deref(), record.updated_at.as_deref()));
        items
    }

    fn fields(record: Option<&User>, submitted: Option<&FormData>, choices: &Choices) -> Vec<FormField> {
        let email = prefill(submitted, "email", || record.map(|r| r.email.clone()).unwrap_or_default());

        let selected_roles: Vec<i64> = match submitted {
            Some(form) => form.ids("roles"),
            None => record.map(|r| r.roles.iter().map(|role| role.id).collect()).unwrap_or_default(),
        };
        let role_options = choices
            .roles
            .iter()
            .map(|role| ChoiceOption {
                value: role.id.to_string(),
                label: role.name.clone(),
                selected: selected_roles.contains(&role.id),
            })
            .collect();

        let selected_status = match submitted {
            Some(form) => form.optional_id("user_status_id"),
            None => record.and_then(|r| r.user_status_id),
        };
        let mut status_options = vec![ChoiceOption {
            value: String::new(),
            label: "Selecione".to_string(),
            selected: selected_status.is_none(),
        }];
        status_options.extend(choices.statuses.iter().map(|status| ChoiceOption {
            value: status.id.to_string(),
            label: status.name.clone(),
            selected: selected_status == Some(status.id),
        }));

        let mut password = FormField::input("password", "Senha", FieldKind::Password, "");
        let mut confirmation = FormField::input("password_confirmation", "Confirmar senha", FieldKind::Password, "");
        if record.is_some() {
            password = password.optional();
            confirmation = confirmation.optional();
        }

        vec![
            name_field(record.map(|r| r.name.as_str()), submitted),
            FormField::input("email", "E-mail", FieldKind::Email, email),
            password,
            confirmation,
            FormField::choices("roles", "Perfis", FieldKind::Checkboxes, role_options),
            FormField::choices("user_status_id", "Status", FieldKind::Select, status_options),
        ]
    }

    /// On edit an empty password keeps the current one.
    fn parse(form: &FormData, editing: bool) -> Result<UserForm, Vec<String>> {
        let name = form.trimmed("name");
        let email = form.trimmed("email");
        let password = form.get("password");
        let confirmation = form.get("password_confirmation");

        let mut checks = vec![
            validate::validate_name(name, "O nome", MIN_NAME),
            validate::validate_email(email),
        ];
        let set_password = !editing || !password.is_empty() || !confirmation.is_empty();
        if set_password {
            checks.push(validate::validate_password(password, MIN_USER_PASSWORD));
            checks.push(validate::validate_confirmation(password, confirmation));
        }
        let errors: Vec<String> = checks.into_iter().flatten().collect();
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(UserForm {
            name: name.to_string(),
            email: email.to_string(),
            password: set_password.then(|| password.to_string()),
            password_confirmation: set_password.then(|| confirmation.to_string()),
            roles: form.ids("roles"),
            user_status_id: form.optional_id("user_status_id"),
        })
    }

    async fn choices(client: &ApiClient) -> Result<Choices, ApiError> {
        let (roles, statuses) = tokio::join!(client.list_all::<Roles>(), client.list_all::<UserStatuses>());
        Ok(Choices {
            roles: roles?,
            statuses: statuses?,
        })
    }
}
