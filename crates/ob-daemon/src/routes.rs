//! Axum router and HTTP handlers for ob-daemon.
//!
//! `build_router` is the single entry point; `main.rs` calls it, adds the
//! static asset fallback and attaches middleware layers. Tests use the bare
//! router.

use std::{convert::Infallible, sync::Arc};

use axum::{
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    routing::get,
    Json, Router,
};
use futures_util::{stream, Stream, StreamExt};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

use crate::{
    api_types::HealthResponse,
    protocol::ORDERS_EVENT,
    state::{AppState, Snapshot},
    ws,
};

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the application router wired to the given shared state.
///
/// Middleware layers (CORS, tracing) and static hosting are **not** applied
/// here.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/v1/health", get(health))
        .route("/v1/orders", get(orders))
        .route("/v1/stream", get(stream_orders))
        .route("/ws", get(ws::ws_handler))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// GET /v1/health
// ---------------------------------------------------------------------------

pub(crate) async fn health(State(st): State<Arc<AppState>>) -> impl IntoResponse {
    let orders = st.board.snapshot().await.len();
    (
        StatusCode::OK,
        Json(HealthResponse {
            ok: true,
            service: st.build.service,
            version: st.build.version,
            clients: st.board.client_count(),
            orders,
        }),
    )
}

// ---------------------------------------------------------------------------
// GET /v1/orders
// ---------------------------------------------------------------------------

/// Read-only copy of the current board, same content as an `orders` push.
pub(crate) async fn orders(State(st): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = st.board.snapshot().await;
    (StatusCode::OK, Json(snapshot.as_ref().clone()))
}

// ---------------------------------------------------------------------------
// GET /v1/stream  (SSE)
// ---------------------------------------------------------------------------

/// Read-only snapshot feed for displays that cannot speak WebSocket.
pub(crate) async fn stream_orders(State(st): State<Arc<AppState>>) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert("Cache-Control", HeaderValue::from_static("no-cache"));
    headers.insert("Connection", HeaderValue::from_static("keep-alive"));

    let (snapshot, rx) = st.board.connect().await;
    let events = snapshots_to_sse(snapshot, rx);

    (headers, Sse::new(events).keep_alive(KeepAlive::new())).into_response()
}

fn snapshots_to_sse(
    first: Snapshot,
    rx: broadcast::Receiver<Snapshot>,
) -> impl Stream<Item = Result<Event, Infallible>> {
    // Lagged receivers just resume at a newer snapshot.
    let live = BroadcastStream::new(rx).filter_map(|msg| async move { msg.ok() });

    stream::once(async move { first })
        .chain(live)
        .filter_map(|snapshot| async move {
            let data = serde_json::to_string(snapshot.as_slice()).ok()?;
            Some(Ok(Event::default().event(ORDERS_EVENT).data(data)))
        })
}
