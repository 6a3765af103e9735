//! ob-store
//!
//! Authoritative in-memory order set for the shared order board.
//!
//! - Orders are created, edited, moved through status and removed only here
//! - Order numbers come from a process-wide counter and are never reused
//! - Every operation returns an explicit [`Effect`] or [`Rejection`]; the
//!   transport decides what to broadcast from that result
//!
//! Pure deterministic logic apart from UUID generation. No IO, no wall-clock:
//! callers supply `now_ms` for `createdAt`.

mod input;
mod store;
mod types;

pub use input::{coerce_qty, sanitize_items, ItemDraft, OrderDraft, OrderEdit};
pub use store::{Command, Effect, OrderStore, Rejection};
pub use types::{Item, Order, OrderStatus, DEFAULT_TABLE_NAME};
