//! WebSocket handler for page connections

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::protocol::{ClientMessage, ServerMessage};
use crate::state::AppState;

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle a WebSocket connection
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id = Uuid::new_v4();
    info!("Page {} connected", connection_id);
    state.event_logger.log_join(&connection_id.to_string());

    let (mut sender, mut receiver) = socket.split();

    // Subscribe before reading the current view so no update falls in between
    let mut broadcast_rx = state.broadcaster.subscribe();

    let initial = ServerMessage::View {
        data: state.current_view().await,
    };
    if sender.send(Message::Text(initial.to_json().into())).await.is_err() {
        error!("Failed to send initial view to page {}", connection_id);
        state.event_logger.log_leave(&connection_id.to_string());
        return;
    }

    // Task to forward broadcast views to this page
    let send_task = tokio::spawn(async move {
        loop {
            match broadcast_rx.recv().await {
                Ok(msg) => {
                    if sender.send(Message::Text(msg.to_json().into())).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(n)) => {
                    warn!("Page {} lagged by {} views", connection_id, n);
                }
                Err(RecvError::Closed) => {
                    break;
                }
            }
        }
    });

    // Task to receive commands from this page
    let recv_task = {
        let state = state.clone();

        tokio::spawn(async move {
            while let Some(result) = receiver.next().await {
                match result {
                    Ok(Message::Text(text)) => match ClientMessage::parse(&text) {
                        Some(msg) => {
                            debug!("Page {} command: {:?}", connection_id, msg);
                            state.handle_command(msg).await;
                        }
                        None => {
                            debug!("Page {} sent unknown command {:?}", connection_id, text.as_str());
                        }
                    },
                    Ok(Message::Close(_)) => {
                        info!("Page {} sent close frame", connection_id);
                        break;
                    }
                    Ok(_) => {
                        // Ignore binary, ping, pong frames
                    }
                    Err(e) => {
                        error!("WebSocket error for page {}: {}", connection_id, e);
                        break;
                    }
                }
            }
        })
    };

    // Wait for either task to finish, then stop the other
    let send_abort = send_task.abort_handle();
    let recv_abort = recv_task.abort_handle();
    tokio::select! {
        _ = send_task => recv_abort.abort(),
        _ = recv_task => send_abort.abort(),
    }

    info!("Page {} disconnected", connection_id);
    state.event_logger.log_leave(&connection_id.to_string());
}
