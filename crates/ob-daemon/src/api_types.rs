//! Response types for the ob-daemon HTTP endpoints.
//!
//! No business logic lives here.

use serde::Serialize;

// ---------------------------------------------------------------------------
// /v1/health
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub service: &'static str,
    pub version: &'static str,
    /// Connected WebSocket / SSE subscribers.
    pub clients: usize,
    /// Active orders on the board.
    pub orders: usize,
}
