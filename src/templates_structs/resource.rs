use askama::Template;

use super::PageContext;

/// Labels and URLs of one admin entity, shared by its list/detail/form pages.
pub struct ResourceMeta {
    pub slug: &'static str,
    pub singular: &'static str,
    pub plural: &'static str,
    pub can_create: bool,
    pub can_delete: bool,
}

impl ResourceMeta {
    pub fn list_url(&self) -> String {
        format!("/painel/{}/list", self.slug)
    }

    pub fn create_url(&self) -> String {
        format!("/painel/{}/create", self.slug)
    }

    pub fn show_url(&self, id: i64) -> String {
        format!("/painel/{}/{}", self.slug, id)
    }

    pub fn edit_url(&self, id: i64) -> String {
        format!("/painel/{}/{}/edit", self.slug, id)
    }

    pub fn delete_url(&self, id: i64) -> String {
        format!("/painel/{}/{}/delete", self.slug, id)
    }
}

pub struct RowAction {
    pub label: &'static str,
    pub url: String,
}

pub struct TableRow {
    pub id: i64,
    pub cells: Vec<String>,
    pub actions: Vec<RowAction>,
}

pub struct Pager {
    pub current: u32,
    pub last: u32,
    pub prev_url: Option<String>,
    pub next_url: Option<String>,
}

#[derive(Template)]
#[template(path = "resources/list.html")]
pub struct ResourceListTemplate {
    pub ctx: PageContext,
    pub meta: ResourceMeta,
    pub columns: Vec<&'static str>,
    pub rows: Vec<TableRow>,
    pub search: String,
    pub pager: Pager,
}

pub struct DetailItem {
    pub label: &'static str,
    pub value: String,
}

#[derive(Template)]
#[template(path = "resources/detail.html")]
pub struct ResourceDetailTemplate {
    pub ctx: PageContext,
    pub meta: ResourceMeta,
    pub id: i64,
    pub details: Vec<DetailItem>,
    pub actions: Vec<RowAction>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    Password,
    Select,
    Checkboxes,
}

pub struct ChoiceOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub value: String,
    pub options: Vec<ChoiceOption>,
    pub required: bool,
}

impl FormField {
    pub fn input(name: &'static str, label: &'static str, kind: FieldKind, value: impl Into<String>) -> Self {
        Self {
            name,
            label,
            kind,
            value: value.into(),
            options: Vec::new(),
            required: true,
        }
    }

    pub fn choices(name: &'static str, label: &'static str, kind: FieldKind, options: Vec<ChoiceOption>) -> Self {
        Self {
            name,
            label,
            kind,
            value: String::new(),
            options,
            required: false,
        }
    }

    #[must_use]
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn is_select(&self) -> bool {
        self.kind == FieldKind::Select
    }

    pub fn is_checkboxes(&self) -> bool {
        self.kind == FieldKind::Checkboxes
    }

    pub fn input_type(&self) -> &'static str {
        match self.kind {
            FieldKind::Email => "email",
            FieldKind::Password => "password",
            _ => "text",
        }
    }
}

#[derive(Template)]
#[template(path = "resources/form.html")]
pub struct ResourceFormTemplate {
    pub ctx: PageContext,
    pub meta: ResourceMeta,
    pub title: String,
    pub action: String,
    pub fields: Vec<FormField>,
    pub errors: Vec<String>,
}
