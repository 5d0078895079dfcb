//! Role-permission association editor.
//!
//! [`RoleEditor`] is the synchronous core: it owns the [`AssociationStore`] and
//! the pending toggles, and turns user intents into [`Command`]s for the
//! network layer. Results come back as [`Completion`]s. [`session`] runs the
//! core against a [`SyncClient`](crate::api::SyncClient) and a debounced event
//! stream.

pub mod debounce;
pub mod pending;
pub mod protocol;
pub mod session;
pub mod store;

use serde::Serialize;

use crate::api::{ApiError, BundleQuery};
use crate::models::RolePermissionBundle;
use pending::{Optimistic, PendingMutations, Settlement, Ticket};
use store::{AssociationStore, LoadState};

/// What a toggle acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Permission(i64),
    User(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchField {
    Permissions,
    Users,
}

impl Optimistic<Target> for AssociationStore {
    type Value = bool;

    fn current(&self, key: &Target) -> bool {
        match *key {
            Target::Permission(id) => self.is_granted(id),
            Target::User(id) => self.has_role(id),
        }
    }

    fn apply(&mut self, key: &Target, value: bool) {
        match *key {
            Target::Permission(id) => self.set_granted(id, value),
            Target::User(id) => self.set_member(id, value),
        }
    }
}

pub type ToggleTicket = Ticket<Target, bool>;

/// Network work requested by the editor.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Fetch { generation: u64, query: BundleQuery },
    Toggle(ToggleTicket),
}

/// Result of a [`Command`], fed back into [`RoleEditor::complete`].
#[derive(Debug)]
pub enum Completion {
    Fetched {
        generation: u64,
        result: Result<RolePermissionBundle, ApiError>,
    },
    Toggled {
        ticket: ToggleTicket,
        result: Result<Option<bool>, ApiError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    NotLoaded,
    UnknownPermission(i64),
    UnknownUser(i64),
}

impl std::fmt::Display for EditorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EditorError::NotLoaded => write!(f, "Aguarde o carregamento do perfil."),
            EditorError::UnknownPermission(id) => write!(f, "Permissão {id} não está na lista."),
            EditorError::UnknownUser(id) => write!(f, "Usuário {id} não está na lista."),
        }
    }
}

pub struct RoleEditor {
    store: AssociationStore,
    pending: PendingMutations<Target>,
    query: BundleQuery,
    notice: Option<String>,
    mounted: bool,
}

impl RoleEditor {
    pub fn new(role_id: i64) -> Self {
        Self {
            store: AssociationStore::new(role_id),
            pending: PendingMutations::new(),
            query: BundleQuery::default(),
            notice: None,
            mounted: false,
        }
    }

    pub fn store(&self) -> &AssociationStore {
        &self.store
    }

    pub fn query(&self) -> &BundleQuery {
        &self.query
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn is_granted(&self, permission_id: i64) -> bool {
        self.store.is_granted(permission_id)
    }

    pub fn has_role(&self, user_id: i64) -> bool {
        self.store.has_role(user_id)
    }

    pub fn is_pending(&self, target: Target) -> bool {
        self.pending.is_pending(&target)
    }

    /// Screen mounted: start the first load.
    pub fn mount(&mut self) -> Command {
        self.mounted = true;
        self.load()
    }

    /// Screen gone: nothing that arrives later may touch state.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.store.invalidate();
        self.pending.clear();
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Refetch everything with the current filters.
    pub fn load(&mut self) -> Command {
        let generation = self.store.begin_load();
        Command::Fetch {
            generation,
            query: self.query.clone(),
        }
    }

    /// A debounced search value arrived. Resets that list to its first page.
    /// The value is sent to the backend exactly as typed.
    pub fn search(&mut self, field: SearchField, value: String) -> Command {
        match field {
            SearchField::Permissions => {
                self.query.permission_search = value;
                self.query.permission_page = 1;
            }
            SearchField::Users => {
                self.query.user_search = value;
                self.query.user_page = 1;
            }
        }
        self.load()
    }

    pub fn set_page(&mut self, field: SearchField, page: u32) -> Command {
        let page = page.max(1);
        match field {
            SearchField::Permissions => self.query.permission_page = page,
            SearchField::Users => self.query.user_page = page,
        }
        self.load()
    }

    /// Flip `target` locally and return the remote call to make.
    pub fn toggle(&mut self, target: Target) -> Result<Command, EditorError> {
        if !self.mounted || !self.store.is_ready() {
            return Err(EditorError::NotLoaded);
        }
        match target {
            Target::Permission(id) if !self.store.lists_permission(id) => {
                return Err(EditorError::UnknownPermission(id));
            }
            Target::User(id) if !self.store.lists_user(id) => {
                return Err(EditorError::UnknownUser(id));
            }
            _ => {}
        }
        let ticket = self.pending.begin(&mut self.store, target, |granted| !granted);
        Ok(Command::Toggle(ticket))
    }

    /// Apply a network result. Returns `true` if anything visible changed.
    pub fn complete(&mut self, completion: Completion) -> bool {
        if !self.mounted {
            return false;
        }
        match completion {
            Completion::Fetched { generation, result } => {
                let applied = self.store.finish_load(generation, result);
                if applied {
                    // A fresh snapshot supersedes whatever was in flight.
                    self.pending.clear();
                }
                applied
            }
            Completion::Toggled { ticket, result } => {
                let settlement = self.pending.settle(&mut self.store, &ticket, &result);
                match (settlement, result) {
                    (Settlement::Stale, _) => {
                        log::debug!("Discarding stale toggle response for {:?}", ticket.key);
                        true
                    }
                    (Settlement::RolledBack(_), Err(e)) => {
                        log::warn!("Toggle of {:?} failed: {e}", ticket.key);
                        self.notice = Some(toggle_failure_message(ticket.key, &e));
                        true
                    }
                    _ => true,
                }
            }
        }
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn view(&self) -> EditorView {
        EditorView::build(self)
    }
}

fn toggle_failure_message(target: Target, err: &ApiError) -> String {
    let what = match target {
        Target::Permission(_) => "Erro ao alterar permissão",
        Target::User(_) => "Erro ao alterar usuário",
    };
    format!("{what}: {}", err.user_message())
}

/// Serializable snapshot of the editor, pushed to the browser after every
/// change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditorView {
    pub status: &'static str,
    pub blocking_error: Option<String>,
    pub notice: Option<String>,
    pub role_id: i64,
    pub role_name: Option<String>,
    pub granted_count: usize,
    pub permission_search: String,
    pub user_search: String,
    pub permissions: Vec<PermissionRow>,
    pub permission_page: PageInfo,
    pub users: Vec<UserRow>,
    pub user_page: PageInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PermissionRow {
    pub id: i64,
    pub name: String,
    pub label: String,
    pub granted: bool,
    pub pending: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub member: bool,
    pub pending: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub current: u32,
    pub last: u32,
}

impl EditorView {
    fn build(editor: &RoleEditor) -> Self {
        let store = &editor.store;
        let (status, blocking_error) = match store.state() {
            LoadState::Idle => ("idle", None),
            LoadState::Loading => ("loading", None),
            LoadState::Ready => ("ready", None),
            LoadState::Failed(msg) => ("failed", Some(msg.clone())),
        };

        let permissions = store
            .permissions()
            .data
            .iter()
            .map(|p| PermissionRow {
                id: p.id,
                name: p.name.clone(),
                label: p.label().to_string(),
                granted: store.is_granted(p.id),
                pending: editor.is_pending(Target::Permission(p.id)),
            })
            .collect();

        let users = store
            .users()
            .data
            .iter()
            .map(|u| UserRow {
                id: u.id,
                name: u.name.clone(),
                email: u.email.clone(),
                member: store.has_role(u.id),
                pending: editor.is_pending(Target::User(u.id)),
            })
            .collect();

        Self {
            status,
            blocking_error,
            notice: editor.notice.clone(),
            role_id: store.role_id(),
            role_name: store.role().map(|r| r.name.clone()),
            granted_count: store.granted_count(),
            permission_search: editor.query.permission_search.clone(),
            user_search: editor.query.user_search.clone(),
            permissions,
            permission_page: PageInfo {
                current: store.permissions().current_page,
                last: store.permissions().last_page,
            },
            users,
            user_page: PageInfo {
                current: store.users().current_page,
                last: store.users().last_page,
            },
        }
    }
}
