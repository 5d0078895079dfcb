use std::sync::Arc;

use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, web};
use actix_ws::Message;
use tokio::sync::mpsc;

use crate::api::ApiClient;
use crate::auth::session;
use crate::config::AppConfig;
use crate::editor;
use crate::editor::protocol::{Inbound, Outbound};
use crate::errors::{AppError, render};
use crate::templates_structs::{PageContext, RolePermissionTemplate};

pub async fn page(
    config: web::Data<AppConfig>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let role_id = path.into_inner();
    let ctx = PageContext::build(&session, &config, &format!("/painel/role-permissions/{role_id}"));
    render(RolePermissionTemplate {
        ctx,
        role_id,
        ws_path: format!("/painel/role-permissions/{role_id}/ws"),
    })
}

/// WebSocket upgrade. Each connection runs its own editor session; the socket
/// task only translates frames in both directions.
pub async fn ws_connect(
    req: HttpRequest,
    body: web::Payload,
    session: Session,
    config: web::Data<AppConfig>,
    api: web::Data<ApiClient>,
    path: web::Path<i64>,
) -> Result<HttpResponse, actix_web::Error> {
    let role_id = path.into_inner();
    let Ok(client) = session::client_for(&session, &api) else {
        return Ok(HttpResponse::Unauthorized().finish());
    };

    let (response, mut ws_session, mut msg_stream) = actix_ws::handle(&req, body)?;

    let (event_tx, event_rx) = mpsc::unbounded_channel::<Inbound>();
    let (frame_tx, mut frame_rx) = mpsc::unbounded_channel::<Outbound>();

    log::info!("Role editor for role {role_id} connected");
    actix_web::rt::spawn(editor::session::run(
        Arc::new(client),
        role_id,
        config.search_debounce,
        event_rx,
        frame_tx,
    ));

    actix_web::rt::spawn(async move {
        loop {
            tokio::select! {
                frame = frame_rx.recv() => match frame {
                    Some(frame) => {
                        if ws_session.text(frame.to_json()).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                },
                msg = msg_stream.recv() => match msg {
                    Some(Ok(Message::Text(text))) => match Inbound::parse(&text) {
                        Ok(event) => {
                            if event_tx.send(event).is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            log::debug!("Ignoring malformed editor frame: {e}");
                            let reply = Outbound::Error { message: "Mensagem inválida.".to_string() };
                            if ws_session.text(reply.to_json()).await.is_err() {
                                break;
                            }
                        }
                    },
                    Some(Ok(Message::Ping(bytes))) => {
                        if ws_session.pong(&bytes).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        log::debug!("Role editor socket error: {e}");
                        break;
                    }
                },
            }
        }

        // Closing the event channel unmounts the editor session.
        drop(event_tx);
        let _ = ws_session.close(None).await;
        log::info!("Role editor for role {role_id} disconnected");
    });

    Ok(response)
}
