//! Drives a [`RoleEditor`] for one mounted screen.
//!
//! The session task is the only writer of the editor state. Network calls run
//! as spawned tasks and report back over a channel, so results are applied one
//! at a time in arrival order.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use super::debounce::{Debouncer, Emission};
use super::protocol::{Inbound, Outbound};
use super::{Command, Completion, RoleEditor, SearchField, Target};
use crate::api::SyncClient;

struct EditorSession<C> {
    client: Arc<C>,
    editor: RoleEditor,
    searches: Debouncer<SearchField, String>,
    completions: mpsc::UnboundedSender<Completion>,
    outbound: mpsc::UnboundedSender<Outbound>,
}

/// Run an editor session until `inbound` closes (the screen went away) or the
/// outbound side is dropped.
pub async fn run<C: SyncClient>(
    client: Arc<C>,
    role_id: i64,
    quiet: Duration,
    mut inbound: mpsc::UnboundedReceiver<Inbound>,
    outbound: mpsc::UnboundedSender<Outbound>,
) {
    let (searches, mut emissions) = Debouncer::new(quiet);
    let (completions, mut results) = mpsc::unbounded_channel();
    let mut session = EditorSession {
        client,
        editor: RoleEditor::new(role_id),
        searches,
        completions,
        outbound,
    };

    log::debug!("Role editor session started for role {role_id}");
    let first = session.editor.mount();
    session.execute(first);
    session.publish();

    loop {
        let changed = tokio::select! {
            event = inbound.recv() => match event {
                Some(event) => session.handle(event),
                None => break,
            },
            Some(emission) = emissions.recv() => session.on_search(emission),
            Some(completion) = results.recv() => session.editor.complete(completion),
        };
        if changed && !session.publish() {
            break;
        }
    }

    session.editor.unmount();
    session.searches.cancel_all();
    log::debug!("Role editor session for role {role_id} closed");
}

impl<C: SyncClient> EditorSession<C> {
    fn handle(&mut self, event: Inbound) -> bool {
        match event {
            Inbound::SearchPermissions { value } => {
                self.searches.push(SearchField::Permissions, value);
                false
            }
            Inbound::SearchUsers { value } => {
                self.searches.push(SearchField::Users, value);
                false
            }
            Inbound::PagePermissions { page } => {
                let cmd = self.editor.set_page(SearchField::Permissions, page);
                self.execute(cmd);
                true
            }
            Inbound::PageUsers { page } => {
                let cmd = self.editor.set_page(SearchField::Users, page);
                self.execute(cmd);
                true
            }
            Inbound::TogglePermission { id } => self.toggle(Target::Permission(id)),
            Inbound::ToggleUser { id } => self.toggle(Target::User(id)),
            Inbound::DismissError => {
                self.editor.dismiss_notice();
                true
            }
            Inbound::Reload => {
                let cmd = self.editor.load();
                self.execute(cmd);
                true
            }
        }
    }

    fn toggle(&mut self, target: Target) -> bool {
        match self.editor.toggle(target) {
            Ok(cmd) => {
                self.execute(cmd);
                true
            }
            Err(e) => {
                let _ = self.outbound.send(Outbound::Error { message: e.to_string() });
                false
            }
        }
    }

    fn on_search(&mut self, emission: Emission<SearchField, String>) -> bool {
        let Some((field, value)) = self.searches.accept(emission) else {
            return false;
        };
        let cmd = self.editor.search(field, value);
        self.execute(cmd);
        true
    }

    fn execute(&self, cmd: Command) {
        let client = Arc::clone(&self.client);
        let tx = self.completions.clone();
        let role_id = self.editor.store().role_id();

        match cmd {
            Command::Fetch { generation, query } => {
                tokio::spawn(async move {
                    let result = client.fetch_bundle(role_id, &query).await;
                    let _ = tx.send(Completion::Fetched { generation, result });
                });
            }
            Command::Toggle(ticket) => {
                tokio::spawn(async move {
                    let result = match ticket.key {
                        Target::Permission(id) => client.toggle_permission(role_id, id).await,
                        Target::User(id) => client.toggle_user(role_id, id).await,
                    };
                    let _ = tx.send(Completion::Toggled { ticket, result });
                });
            }
        }
    }

    /// Push the current view. Returns `false` once nobody is listening.
    fn publish(&self) -> bool {
        self.outbound
            .send(Outbound::State { view: self.editor.view() })
            .is_ok()
    }
}
