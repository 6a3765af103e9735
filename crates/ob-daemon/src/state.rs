//! Shared runtime state for ob-daemon.
//!
//! `AppState` is built once in `main` and handed to every handler as
//! `State<Arc<AppState>>`. The [`Board`] inside it is the only path to the
//! order store: it serializes all mutations behind one lock and decides,
//! from each operation's result, whether to broadcast a new snapshot.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use ob_store::{Command, Effect, Order, OrderStore, Rejection};
use serde::Serialize;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info};

/// Full order set as published on the bus. Shared, never mutated.
pub type Snapshot = Arc<Vec<Order>>;

// ---------------------------------------------------------------------------
// BuildInfo
// ---------------------------------------------------------------------------

/// Static build metadata included in health responses.
#[derive(Clone, Debug, Serialize)]
pub struct BuildInfo {
    pub service: &'static str,
    pub version: &'static str,
}

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

/// Single-writer order store plus its snapshot fan-out.
pub struct Board {
    store: Mutex<OrderStore>,
    bus: broadcast::Sender<Snapshot>,
}

impl Board {
    /// `capacity` is clamped to at least 1.
    pub fn new(capacity: usize) -> Self {
        let (bus, _rx) = broadcast::channel::<Snapshot>(capacity.max(1));
        Self {
            store: Mutex::new(OrderStore::new()),
            bus,
        }
    }

    /// Apply a command and, if it had an effect, publish the new snapshot.
    ///
    /// The snapshot is sent while the store lock is still held, so the bus
    /// carries snapshots in exactly the order mutations were applied.
    pub async fn dispatch(&self, cmd: Command) -> Result<Effect, Rejection> {
        let event = cmd.event_name();
        let now_ms = chrono::Utc::now().timestamp_millis();

        let mut store = self.store.lock().await;
        let outcome = store.apply(cmd, now_ms);

        match &outcome {
            Ok(effect) => {
                let snapshot: Snapshot = Arc::new(store.snapshot());
                // No subscribers is fine.
                let _ = self.bus.send(snapshot);
                info!(event, ?effect, orders = store.len(), "orders broadcast");
            }
            Err(rejection) => {
                debug!(event, %rejection, "command ignored");
            }
        }

        outcome
    }

    /// Current snapshot plus a subscription that starts right after it.
    ///
    /// Both are taken under the store lock: the receiver will see every
    /// snapshot published after the returned one and none before it.
    pub async fn connect(&self) -> (Snapshot, broadcast::Receiver<Snapshot>) {
        let store = self.store.lock().await;
        (Arc::new(store.snapshot()), self.bus.subscribe())
    }

    pub async fn snapshot(&self) -> Snapshot {
        Arc::new(self.store.lock().await.snapshot())
    }

    /// Live subscribers (WebSocket sessions and SSE streams).
    pub fn client_count(&self) -> usize {
        self.bus.receiver_count()
    }
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// Handle shared across all Axum handlers (always behind an `Arc`).
pub struct AppState {
    pub board: Board,
    pub build: BuildInfo,
    next_client_id: AtomicUsize,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(64)
    }
}

impl AppState {
    pub fn new(bus_capacity: usize) -> Self {
        Self {
            board: Board::new(bus_capacity),
            build: BuildInfo {
                service: "ob-daemon",
                version: env!("CARGO_PKG_VERSION"),
            },
            next_client_id: AtomicUsize::new(1),
        }
    }

    /// Per-process connection counter, for log correlation only.
    pub fn next_client_id(&self) -> usize {
        self.next_client_id.fetch_add(1, Ordering::Relaxed)
    }
}
