//! WebSocket wire protocol.
//!
//! Every text frame is a named event:
//!
//! ```text
//! server -> client   {"event":"orders","data":[Order, ...]}
//! client -> server   {"event":"createOrder","data":{items, tableName?, notes?}}
//!                    {"event":"updateOrder","data":{id, items?, tableName?, notes?}}
//!                    {"event":"setPreparing","data":"<order id>"}
//!                    {"event":"completeOrder","data":"<order id>"}
//!                    {"event":"removeOrder","data":"<order id>"}
//! ```
//!
//! Anything that does not decode to a [`Command`] is dropped without reply.

use ob_store::{Command, Order, OrderDraft, OrderEdit};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Event name of the server snapshot push.
pub const ORDERS_EVENT: &str = "orders";

/// Raw inbound frame; `data` is decoded per event.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientFrame {
    pub event: String,
    #[serde(default)]
    pub data: Value,
}

/// Outbound frame.
#[derive(Debug, Serialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerFrame<'a> {
    #[serde(rename = "orders")]
    Orders(&'a [Order]),
}

impl ServerFrame<'_> {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Decode a text frame into a store command.
pub fn decode_client_frame(text: &str) -> Option<Command> {
    let frame: ClientFrame = serde_json::from_str(text).ok()?;
    command_from_event(&frame.event, &frame.data)
}

/// Map a named event and its payload onto a store command.
///
/// Returns `None` for unknown events and for id-only events whose payload is
/// not a string.
pub fn command_from_event(event: &str, data: &Value) -> Option<Command> {
    match event {
        "createOrder" => Some(Command::Create(OrderDraft::from_json(data))),
        "updateOrder" => OrderEdit::from_json(data).map(Command::Update),
        "setPreparing" => order_id(data).map(Command::SetPreparing),
        "completeOrder" => order_id(data).map(Command::Complete),
        "removeOrder" => order_id(data).map(Command::Remove),
        _ => None,
    }
}

fn order_id(data: &Value) -> Option<String> {
    data.as_str().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ob_store::{ItemDraft, OrderStatus};

    #[test]
    fn decodes_every_client_event() {
        let create = decode_client_frame(
            r#"{"event":"createOrder","data":{"items":[{"name":"Latte","qty":2}],"tableName":"5"}}"#,
        );
        assert_eq!(
            create,
            Some(Command::Create(
                OrderDraft::new(vec![ItemDraft::new("Latte", 2)]).table("5")
            ))
        );

        let update = decode_client_frame(r#"{"event":"updateOrder","data":{"id":"o1","notes":""}}"#);
        assert_eq!(update, Some(Command::Update(OrderEdit::new("o1").notes(""))));

        assert_eq!(
            decode_client_frame(r#"{"event":"setPreparing","data":"o1"}"#),
            Some(Command::SetPreparing("o1".into()))
        );
        assert_eq!(
            decode_client_frame(r#"{"event":"completeOrder","data":"o1"}"#),
            Some(Command::Complete("o1".into()))
        );
        assert_eq!(
            decode_client_frame(r#"{"event":"removeOrder","data":"o1"}"#),
            Some(Command::Remove("o1".into()))
        );
    }

    #[test]
    fn malformed_frames_are_dropped() {
        assert_eq!(decode_client_frame("not json"), None);
        assert_eq!(decode_client_frame(r#"{"data":"o1"}"#), None);
        assert_eq!(decode_client_frame(r#"{"event":"dropTables","data":"o1"}"#), None);
        assert_eq!(decode_client_frame(r#"{"event":"completeOrder","data":{"id":"o1"}}"#), None);
        assert_eq!(decode_client_frame(r#"{"event":"removeOrder"}"#), None);
        assert_eq!(decode_client_frame(r#"{"event":"updateOrder","data":{"notes":"x"}}"#), None);
    }

    #[test]
    fn create_without_data_still_decodes_and_is_rejected_downstream() {
        let cmd = decode_client_frame(r#"{"event":"createOrder"}"#);
        assert_eq!(cmd, Some(Command::Create(OrderDraft::default())));
    }

    #[test]
    fn orders_frame_shape() {
        let order = Order {
            id: "o1".into(),
            number: 1,
            items: vec![],
            table_name: "ToGo".into(),
            notes: String::new(),
            status: OrderStatus::Preparing,
            created_at: 5,
        };
        let json = ServerFrame::Orders(&[order]).to_json().unwrap();
        let v: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(v["event"], ORDERS_EVENT);
        assert_eq!(v["data"][0]["id"], "o1");
        assert_eq!(v["data"][0]["status"], "preparing");

        let empty = ServerFrame::Orders(&[]).to_json().unwrap();
        assert_eq!(empty, r#"{"event":"orders","data":[]}"#);
    }
}
