//! WebSocket transport for order-entry tablets and displays.
//!
//! ```text
//! device ──frame──► decode ──► Board::dispatch ──► broadcast::Sender ──► every session ──► device
//! ```
//!
//! A session sends the current snapshot on connect, then forwards every bus
//! snapshot and feeds inbound frames to the board. Each session hears its own
//! mutations back through the bus like everyone else.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures_util::{stream::SplitSink, SinkExt, StreamExt};
use ob_store::Order;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::{protocol, protocol::ServerFrame, state::AppState};

/// Axum handler for `GET /ws`.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(st): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_connection(socket, st))
}

async fn handle_connection(socket: WebSocket, st: Arc<AppState>) {
    let client_id = st.next_client_id();

    // Subscribe before the first send so nothing published after this
    // snapshot can be missed.
    let (snapshot, mut rx) = st.board.connect().await;
    info!(
        client_id,
        clients = st.board.client_count(),
        "device connected"
    );

    let (mut sender, mut receiver) = socket.split();

    if send_orders(&mut sender, &snapshot).await.is_err() {
        info!(client_id, "device disconnected before initial snapshot");
        return;
    }

    loop {
        tokio::select! {
            result = rx.recv() => {
                match result {
                    Ok(snapshot) => {
                        if send_orders(&mut sender, &snapshot).await.is_err() {
                            break;
                        }
                    }
                    // Every message is a full snapshot: skipping is harmless.
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        debug!(client_id, skipped = n, "device lagged, skipped snapshots");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }

            incoming = receiver.next() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => match protocol::decode_client_frame(&text) {
                        Some(cmd) => {
                            // Outcome is surfaced only through the broadcast.
                            let _ = st.board.dispatch(cmd).await;
                        }
                        None => debug!(client_id, "ignoring unrecognised frame"),
                    },
                    Some(Ok(Message::Ping(data))) => {
                        if sender.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(err)) => {
                        debug!(client_id, %err, "socket error");
                        break;
                    }
                    _ => {}
                }
            }
        }
    }

    drop(rx);
    info!(
        client_id,
        remaining = st.board.client_count(),
        "device disconnected"
    );
}

async fn send_orders(
    sender: &mut SplitSink<WebSocket, Message>,
    orders: &[Order],
) -> Result<(), axum::Error> {
    match ServerFrame::Orders(orders).to_json() {
        Ok(json) => sender.send(Message::Text(json)).await,
        Err(err) => {
            warn!(%err, "failed to encode orders frame");
            Ok(())
        }
    }
}
