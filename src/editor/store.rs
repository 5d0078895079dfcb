//! Client-side mirror of one role's associations.

use std::collections::HashSet;

use crate::api::ApiError;
use crate::models::{Page, Permission, Role, RolePermissionBundle, User};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Ready,
    /// The last load failed; no data is shown.
    Failed(String),
}

/// Holds the role in focus, its permission and user pages, the granted
/// permission set, and the set of listed users that have the role.
///
/// Loads are cancel-and-replace: every [`begin_load`](Self::begin_load) bumps
/// the generation, and [`finish_load`](Self::finish_load) drops any response
/// that was not started by the current generation.
#[derive(Debug)]
pub struct AssociationStore {
    role_id: i64,
    generation: u64,
    state: LoadState,
    role: Option<Role>,
    permissions: Page<Permission>,
    users: Page<User>,
    granted: HashSet<i64>,
    members: HashSet<i64>,
}

impl AssociationStore {
    pub fn new(role_id: i64) -> Self {
        Self {
            role_id,
            generation: 0,
            state: LoadState::Idle,
            role: None,
            permissions: Page::default(),
            users: Page::default(),
            granted: HashSet::new(),
            members: HashSet::new(),
        }
    }

    pub fn role_id(&self) -> i64 {
        self.role_id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == LoadState::Ready
    }

    pub fn role(&self) -> Option<&Role> {
        self.role.as_ref()
    }

    pub fn permissions(&self) -> &Page<Permission> {
        &self.permissions
    }

    pub fn users(&self) -> &Page<User> {
        &self.users
    }

    /// Start a load and return its generation. Any load still in flight is
    /// superseded.
    pub fn begin_load(&mut self) -> u64 {
        self.generation += 1;
        self.state = LoadState::Loading;
        self.generation
    }

    /// Apply a load response. Returns `false` (and changes nothing) when the
    /// response belongs to a superseded generation.
    pub fn finish_load(&mut self, generation: u64, result: Result<RolePermissionBundle, ApiError>) -> bool {
        if generation != self.generation || self.state != LoadState::Loading {
            log::debug!(
                "Dropping stale load for role {} (generation {generation}, current {})",
                self.role_id,
                self.generation
            );
            return false;
        }

        match result {
            Ok(bundle) => self.replace(bundle),
            Err(e) => {
                self.clear();
                self.state = LoadState::Failed(if e.is_not_found() {
                    "Perfil não encontrado.".to_string()
                } else {
                    e.user_message()
                });
            }
        }
        true
    }

    /// Forget any in-flight load without starting a new one.
    pub fn invalidate(&mut self) {
        self.generation += 1;
        if self.state == LoadState::Loading {
            self.state = LoadState::Idle;
        }
    }

    fn replace(&mut self, bundle: RolePermissionBundle) {
        let role_id = bundle.role.id;
        self.members = bundle
            .users
            .data
            .iter()
            .filter(|u| u.has_role(role_id))
            .map(|u| u.id)
            .collect();
        self.granted = bundle.role_permissions.into_iter().collect();
        self.role = Some(bundle.role);
        self.permissions = bundle.permissions;
        self.users = bundle.users;
        self.state = LoadState::Ready;
    }

    fn clear(&mut self) {
        self.role = None;
        self.permissions = Page::default();
        self.users = Page::default();
        self.granted.clear();
        self.members.clear();
    }

    pub fn is_granted(&self, permission_id: i64) -> bool {
        self.granted.contains(&permission_id)
    }

    pub fn has_role(&self, user_id: i64) -> bool {
        self.members.contains(&user_id)
    }

    pub fn set_granted(&mut self, permission_id: i64, granted: bool) {
        if granted {
            self.granted.insert(permission_id);
        } else {
            self.granted.remove(&permission_id);
        }
    }

    pub fn set_member(&mut self, user_id: i64, member: bool) {
        if member {
            self.members.insert(user_id);
        } else {
            self.members.remove(&user_id);
        }
    }

    pub fn lists_permission(&self, permission_id: i64) -> bool {
        self.permissions.data.iter().any(|p| p.id == permission_id)
    }

    pub fn lists_user(&self, user_id: i64) -> bool {
        self.users.data.iter().any(|u| u.id == user_id)
    }

    pub fn granted_count(&self) -> usize {
        self.granted.len()
    }
}
