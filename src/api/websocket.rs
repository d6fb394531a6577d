use actix_web::{web, Error, HttpRequest, Responder};
use actix_ws::{self, Message};
use futures_util::StreamExt;
use log::{debug, info, warn};
use serde::Serialize;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio::time::interval;

use crate::api::ApiState;
use crate::status::events::StatusUpdate;

// How often heartbeat pings are sent
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);

/// Connection-level messages that are not status updates
#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WsControlMessage {
    Ping { timestamp: i64 },
}

/// Stream status updates to a rendering client
pub async fn ws_index(
    req: HttpRequest,
    body: web::Payload,
    state: web::Data<ApiState>,
) -> Result<impl Responder, Error> {
    let addr = req
        .peer_addr()
        .map(|peer| peer.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    info!("WebSocket connection from: {}", addr);

    let (response, session, mut msg_stream) = actix_ws::handle(&req, body)?;

    let state = state.into_inner();
    let mut updates_rx = state.status.hub().subscribe();

    let session_for_handler = session.clone();
    let session_for_updates = session.clone();
    let session_for_heartbeat = session;

    actix_web::rt::spawn(async move {
        let mut heartbeat = interval(HEARTBEAT_INTERVAL);
        let last_seen = Arc::new(AtomicI64::new(chrono::Utc::now().timestamp()));
        let last_seen_for_handler = last_seen.clone();

        // Bring the client up to date before streaming
        let mut session = session_for_handler.clone();
        if send_snapshot(&mut session, &state).await.is_err() {
            warn!("Failed to send initial status to {}", addr);
            return;
        }

        let ws_msg_task = {
            let mut session = session_for_handler;
            let state = state.clone();

            async move {
                while let Some(Ok(msg)) = msg_stream.next().await {
                    match msg {
                        Message::Ping(bytes) => {
                            last_seen_for_handler.store(chrono::Utc::now().timestamp(), Ordering::SeqCst);
                            if session.pong(&bytes).await.is_err() {
                                break;
                            }
                        }
                        Message::Pong(_) => {
                            last_seen_for_handler.store(chrono::Utc::now().timestamp(), Ordering::SeqCst);
                        }
                        Message::Text(text) => {
                            debug!("Received text message: {}", text);
                            last_seen_for_handler.store(chrono::Utc::now().timestamp(), Ordering::SeqCst);

                            if text.trim() == "status" && send_snapshot(&mut session, &state).await.is_err() {
                                break;
                            }
                        }
                        Message::Close(_) => {
                            info!("Client requested close");
                            break;
                        }
                        _ => {}
                    }
                }
            }
        };

        let updates_task = {
            let mut session = session_for_updates;

            async move {
                loop {
                    match updates_rx.recv().await {
                        Ok(update) => {
                            if send_json(&mut session, &update).await.is_err() {
                                break;
                            }
                        }
                        Err(RecvError::Lagged(skipped)) => {
                            warn!("WebSocket client lagging, skipped {} updates", skipped);
                        }
                        Err(RecvError::Closed) => break,
                    }
                }
            }
        };

        let heartbeat_task = {
            let mut session = session_for_heartbeat;

            async move {
                loop {
                    heartbeat.tick().await;

                    let now = chrono::Utc::now().timestamp();
                    if now - last_seen.load(Ordering::SeqCst) > HEARTBEAT_INTERVAL.as_secs() as i64 * 3 {
                        warn!("WebSocket client heartbeat timed out");
                        let _ = session.close(None).await;
                        break;
                    }

                    // Protocol ping so clients answer with a pong frame
                    if session.ping(b"").await.is_err() {
                        break;
                    }

                    if send_json(&mut session, &WsControlMessage::Ping { timestamp: now })
                        .await
                        .is_err()
                    {
                        break;
                    }
                }
            }
        };

        tokio::select! {
            _ = ws_msg_task => {},
            _ = updates_task => {},
            _ = heartbeat_task => {},
        }

        info!("WebSocket connection closed");
    });

    Ok(response)
}

/// Send the cached view and filter so a new client can draw immediately
async fn send_snapshot(
    session: &mut actix_ws::Session,
    state: &ApiState,
) -> Result<(), actix_ws::Closed> {
    let hub = state.status.hub();

    send_json(session, &StatusUpdate::Render(hub.current_view())).await?;
    send_json(session, &StatusUpdate::FilterChanged(hub.current_filter())).await?;

    if let Some(stats) = hub.current_stats() {
        send_json(session, &StatusUpdate::Stats(stats)).await?;
    }

    Ok(())
}

async fn send_json<T: Serialize>(
    session: &mut actix_ws::Session,
    msg: &T,
) -> Result<(), actix_ws::Closed> {
    match serde_json::to_string(msg) {
        Ok(json) => session.text(json).await,
        Err(e) => {
            warn!("Failed to serialize websocket message: {}", e);
            Ok(())
        }
    }
}
