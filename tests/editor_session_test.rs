//! Editor session tests: the debounced search stream, optimistic toggles as
//! seen by the browser, and teardown while requests are in flight. Time is
//! paused, so quiet periods and fake network delays elapse instantly.

mod common;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use painel::api::ApiError;
use painel::editor::EditorView;
use painel::editor::protocol::{Inbound, Outbound};
use painel::editor::session;
use common::*;

const QUIET: Duration = Duration::from_millis(500);

struct Harness {
    client: Arc<FakeClient>,
    events: mpsc::UnboundedSender<Inbound>,
    frames: mpsc::UnboundedReceiver<Outbound>,
    task: JoinHandle<()>,
}

impl Harness {
    fn start(client: FakeClient) -> Self {
        let client = Arc::new(client);
        let (events, inbound) = mpsc::unbounded_channel();
        let (outbound, frames) = mpsc::unbounded_channel();
        let task = tokio::spawn(session::run(Arc::clone(&client), ROLE_ID, QUIET, inbound, outbound));
        Self { client, events, frames, task }
    }

    fn send(&self, event: Inbound) {
        self.events.send(event).expect("session is running");
    }

    async fn next_frame(&mut self) -> Outbound {
        self.frames.recv().await.expect("session is running")
    }

    async fn view_where(&mut self, pred: impl Fn(&EditorView) -> bool) -> EditorView {
        loop {
            if let Outbound::State { view } = self.next_frame().await {
                if pred(&view) {
                    return view;
                }
            }
        }
    }

    async fn ready(&mut self) -> EditorView {
        self.view_where(|v| v.status == "ready").await
    }

    fn permission_searches(&self) -> Vec<String> {
        self.client.fetches().iter().skip(1).map(|q| q.permission_search.clone()).collect()
    }

    async fn stop(self) {
        drop(self.events);
        self.task.await.expect("session task");
    }
}

// ============================================================================
// DEBOUNCED SEARCH
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_typing_within_quiet_period_issues_one_query() {
    let mut h = Harness::start(FakeClient::with_granted(&[1]));
    h.ready().await;

    h.send(Inbound::SearchPermissions { value: "abc".into() });
    tokio::time::sleep(Duration::from_millis(200)).await;
    h.send(Inbound::SearchPermissions { value: "abcd".into() });
    tokio::time::sleep(QUIET * 3).await;

    assert_eq!(h.permission_searches(), vec!["abcd".to_string()]);
    h.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_clearing_after_quiet_period_issues_second_query() {
    let mut h = Harness::start(FakeClient::with_granted(&[1]));
    h.ready().await;

    h.send(Inbound::SearchPermissions { value: "abc".into() });
    tokio::time::sleep(QUIET * 2).await;
    h.send(Inbound::SearchPermissions { value: String::new() });
    tokio::time::sleep(QUIET * 2).await;

    assert_eq!(h.permission_searches(), vec!["abc".to_string(), String::new()]);
    h.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_search_fields_debounce_independently() {
    let mut h = Harness::start(FakeClient::with_granted(&[]));
    h.ready().await;

    h.send(Inbound::SearchPermissions { value: "edit".into() });
    tokio::time::sleep(Duration::from_millis(300)).await;
    h.send(Inbound::SearchUsers { value: "ana".into() });
    tokio::time::sleep(QUIET * 3).await;

    let fetches = h.client.fetches();
    assert_eq!(fetches.len(), 3);
    assert_eq!(fetches[1].permission_search, "edit");
    assert_eq!(fetches[1].user_search, "");
    assert_eq!(fetches[2].permission_search, "edit");
    assert_eq!(fetches[2].user_search, "ana");
    h.stop().await;
}

// ============================================================================
// TOGGLES
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_toggle_is_visible_before_the_server_answers() {
    let mut h = Harness::start(FakeClient {
        toggle_delay: Duration::from_millis(100),
        ..FakeClient::with_granted(&[1])
    });
    let view = h.ready().await;
    assert!(!view.permissions.iter().any(|p| p.id == 2 && p.granted));

    h.send(Inbound::TogglePermission { id: 2 });
    let optimistic = h.view_where(|v| v.permissions.iter().any(|p| p.id == 2 && p.pending)).await;
    assert!(optimistic.permissions.iter().any(|p| p.id == 2 && p.granted));
    assert_eq!(optimistic.granted_count, 2);

    let settled = h.view_where(|v| v.permissions.iter().all(|p| !p.pending)).await;
    assert!(settled.permissions.iter().any(|p| p.id == 2 && p.granted));
    assert_eq!(h.client.toggles(), vec![("permission", 2)]);
    h.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_failed_toggle_is_rolled_back_with_a_notice() {
    let client = FakeClient::with_granted(&[1]);
    client.fail_next_toggle(ApiError::Rejected { status: 500, message: "Falha interna".into() });
    let mut h = Harness::start(client);
    h.ready().await;

    h.send(Inbound::TogglePermission { id: 1 });
    let view = h.view_where(|v| v.notice.is_some()).await;
    assert_eq!(view.notice.as_deref(), Some("Erro ao alterar permissão: Falha interna"));
    assert!(view.permissions.iter().any(|p| p.id == 1 && p.granted && !p.pending));

    h.send(Inbound::DismissError);
    h.view_where(|v| v.notice.is_none()).await;
    h.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_toggle_before_load_is_refused() {
    let mut h = Harness::start(FakeClient {
        fetch_delay: Duration::from_secs(1),
        ..FakeClient::with_granted(&[])
    });
    h.view_where(|v| v.status == "loading").await;

    h.send(Inbound::TogglePermission { id: 1 });
    loop {
        if let Outbound::Error { message } = h.next_frame().await {
            assert_eq!(message, "Aguarde o carregamento do perfil.");
            break;
        }
    }
    assert!(h.client.toggles().is_empty());
    h.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_reload_after_failed_load() {
    let client = FakeClient::with_granted(&[2]);
    client.fail_next_fetch(ApiError::Network("refused".into()));
    let mut h = Harness::start(client);

    let failed = h.view_where(|v| v.status == "failed").await;
    assert!(failed.permissions.is_empty());

    h.send(Inbound::Reload);
    let view = h.ready().await;
    assert!(view.blocking_error.is_none());
    assert!(view.permissions.iter().any(|p| p.id == 2 && p.granted));
    h.stop().await;
}

// ============================================================================
// TEARDOWN
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_closing_mid_load_never_publishes_the_response() {
    let mut h = Harness::start(FakeClient {
        fetch_delay: Duration::from_secs(1),
        ..FakeClient::with_granted(&[1])
    });
    h.view_where(|v| v.status == "loading").await;

    let Harness { client, events, mut frames, task } = h;
    drop(events);
    task.await.expect("session task");
    tokio::time::sleep(Duration::from_secs(5)).await;

    while let Some(frame) = frames.recv().await {
        if let Outbound::State { view } = frame {
            assert_ne!(view.status, "ready", "late load was applied after close");
        }
    }
    assert_eq!(client.fetches().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_pending_search_is_dropped_on_close() {
    let mut h = Harness::start(FakeClient::with_granted(&[]));
    h.ready().await;
    h.send(Inbound::SearchUsers { value: "bia".into() });
    let client = Arc::clone(&h.client);
    h.stop().await;

    tokio::time::sleep(QUIET * 4).await;
    assert_eq!(client.fetches().len(), 1);
}
