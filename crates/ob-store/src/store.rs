//! The order store: sole owner and sole writer of the active order set.
//!
//! # Outcomes
//!
//! Every operation returns `Result<Effect, Rejection>`:
//!
//! - `Ok(Effect)`: the request matched something. Every effect must be
//!   followed by a full snapshot broadcast, even when nothing visibly changed
//!   (e.g. an update that provided no fields, or a remove of an absent id).
//! - `Err(Rejection)`: the request was a no-op. State is untouched and
//!   nothing is broadcast. Rejections are never reported to the client.
//!
//! # Status
//!
//! `set_preparing` and `complete` overwrite the status unconditionally. A
//! completed order can go back to preparing.

use std::fmt;

use uuid::Uuid;

use crate::input::{sanitize_items, OrderDraft, OrderEdit};
use crate::types::{Order, OrderStatus, DEFAULT_TABLE_NAME};

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// The client-to-server mutation vocabulary.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Create(OrderDraft),
    Update(OrderEdit),
    SetPreparing(String),
    Complete(String),
    Remove(String),
}

impl Command {
    /// Wire event name of this command.
    pub fn event_name(&self) -> &'static str {
        match self {
            Command::Create(_) => "createOrder",
            Command::Update(_) => "updateOrder",
            Command::SetPreparing(_) => "setPreparing",
            Command::Complete(_) => "completeOrder",
            Command::Remove(_) => "removeOrder",
        }
    }
}

// ---------------------------------------------------------------------------
// Effect / Rejection
// ---------------------------------------------------------------------------

/// What an accepted command did. Always broadcast-triggering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    Created { id: String, number: u64 },
    Updated { id: String },
    StatusChanged { id: String, status: OrderStatus },
    /// `existed = false` when the id was not present; still broadcast.
    Removed { id: String, existed: bool },
}

/// Why a command had no effect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// Create request whose items all failed the item rule.
    NoValidItems,
    /// Update / status change for an id that is not in the store.
    UnknownOrder(String),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::NoValidItems => write!(f, "no valid items after filtering"),
            Rejection::UnknownOrder(id) => write!(f, "unknown order id: {id}"),
        }
    }
}

impl std::error::Error for Rejection {}

// ---------------------------------------------------------------------------
// OrderStore
// ---------------------------------------------------------------------------

/// Ordered collection of active orders plus the order-number counter.
///
/// Iteration order is creation order. The store is not `Sync`-aware; the
/// daemon serializes access behind a single lock.
#[derive(Clone, Debug)]
pub struct OrderStore {
    orders: Vec<Order>,
    next_number: u64,
}

impl Default for OrderStore {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderStore {
    pub fn new() -> Self {
        Self {
            orders: Vec::new(),
            next_number: 1,
        }
    }

    /// Apply one command. `now_ms` is only used by `Create`.
    pub fn apply(&mut self, cmd: Command, now_ms: i64) -> Result<Effect, Rejection> {
        match cmd {
            Command::Create(draft) => self.create(draft, now_ms),
            Command::Update(edit) => self.update(edit),
            Command::SetPreparing(id) => self.set_preparing(&id),
            Command::Complete(id) => self.complete(&id),
            Command::Remove(id) => self.remove(&id),
        }
    }

    /// Append a new order built from `draft`.
    ///
    /// Rejected with [`Rejection::NoValidItems`] if no item survives the item
    /// rule; the counter is not advanced in that case.
    pub fn create(&mut self, draft: OrderDraft, now_ms: i64) -> Result<Effect, Rejection> {
        let items = sanitize_items(draft.items);
        if items.is_empty() {
            return Err(Rejection::NoValidItems);
        }

        let table_name = draft
            .table_name
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_TABLE_NAME.to_string());

        let number = self.next_number;
        self.next_number += 1;

        let order = Order {
            id: Uuid::new_v4().to_string(),
            number,
            items,
            table_name,
            notes: draft.notes.unwrap_or_default(),
            status: OrderStatus::New,
            created_at: now_ms,
        };
        let id = order.id.clone();
        self.orders.push(order);

        Ok(Effect::Created { id, number })
    }

    /// Edit items, table and notes of an existing order.
    ///
    /// - provided `items` replace the list wholesale (may end up empty)
    /// - provided `table_name` is trimmed and ignored if blank
    /// - provided `notes` always replace, including with `""`
    pub fn update(&mut self, edit: OrderEdit) -> Result<Effect, Rejection> {
        let order = self.find_mut(&edit.id)?;

        if let Some(items) = edit.items {
            order.items = sanitize_items(items);
        }
        if let Some(table) = edit.table_name {
            let table = table.trim();
            if !table.is_empty() {
                order.table_name = table.to_string();
            }
        }
        if let Some(notes) = edit.notes {
            order.notes = notes;
        }

        Ok(Effect::Updated { id: edit.id })
    }

    pub fn set_preparing(&mut self, id: &str) -> Result<Effect, Rejection> {
        self.set_status(id, OrderStatus::Preparing)
    }

    pub fn complete(&mut self, id: &str) -> Result<Effect, Rejection> {
        self.set_status(id, OrderStatus::Completed)
    }

    /// Delete the order with `id`. Never rejected: an absent id still yields
    /// `Effect::Removed { existed: false }`.
    pub fn remove(&mut self, id: &str) -> Result<Effect, Rejection> {
        let before = self.orders.len();
        self.orders.retain(|o| o.id != id);
        Ok(Effect::Removed {
            id: id.to_string(),
            existed: self.orders.len() != before,
        })
    }

    // -- read side ----------------------------------------------------------

    /// All active orders in creation order.
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Owned copy of the current order set, for broadcasting.
    pub fn snapshot(&self) -> Vec<Order> {
        self.orders.clone()
    }

    pub fn get(&self, id: &str) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == id)
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Number the next successful create will receive.
    pub fn next_number(&self) -> u64 {
        self.next_number
    }

    // -- internal -----------------------------------------------------------

    fn find_mut(&mut self, id: &str) -> Result<&mut Order, Rejection> {
        self.orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| Rejection::UnknownOrder(id.to_string()))
    }

    fn set_status(&mut self, id: &str, status: OrderStatus) -> Result<Effect, Rejection> {
        let order = self.find_mut(id)?;
        order.status = status;
        Ok(Effect::StatusChanged {
            id: id.to_string(),
            status,
        })
    }
}
