//! Lenient request input and the item filter/coercion rule.
//!
//! Clients send loosely-typed JSON. Nothing here fails: anything that does not
//! fit is dropped field-by-field (or item-by-item) and the store sees only what
//! survived.
//!
//! # Item rule
//!
//! An item is kept only if it is a JSON object whose `name` is a non-empty
//! string and whose `qty` coerces to a positive integer (see [`coerce_qty`]).
//! Kept items without a usable `id` receive a fresh UUID.

use serde_json::Value;
use uuid::Uuid;

use crate::types::Item;

// ---------------------------------------------------------------------------
// ItemDraft
// ---------------------------------------------------------------------------

/// An unvalidated line item as it arrived from a client.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ItemDraft {
    pub id: Option<String>,
    pub name: Option<String>,
    /// Raw quantity exactly as received (number, string, bool, ...).
    pub qty: Value,
}

impl ItemDraft {
    pub fn new(name: impl Into<String>, qty: impl Into<Value>) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
            qty: qty.into(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Read one raw item. Returns `None` if `v` is not a JSON object.
    ///
    /// Non-string `id` / `name` values are treated as absent.
    pub fn from_json(v: &Value) -> Option<Self> {
        let obj = v.as_object()?;
        Some(Self {
            id: str_field(v, "id"),
            name: str_field(v, "name"),
            qty: obj.get("qty").cloned().unwrap_or(Value::Null),
        })
    }

    /// Validate and coerce into an [`Item`], or drop it.
    pub fn into_item(self) -> Option<Item> {
        let name = self.name.filter(|n| !n.is_empty())?;
        let qty = coerce_qty(&self.qty)?;
        let id = self
            .id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        Some(Item { id, name, qty })
    }
}

/// Coerce a raw quantity into a positive integer.
///
/// - numbers (and numeric strings, trimmed) are truncated; below 1 is dropped
/// - a non-numeric string falls back to 1
/// - empty string, `false`, `null`, arrays and objects are dropped
/// - `true` counts as 1
pub fn coerce_qty(raw: &Value) -> Option<u32> {
    let n = match raw {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let t = s.trim();
            if t.is_empty() {
                return None;
            }
            match t.parse::<f64>() {
                Ok(n) => n,
                Err(_) => return Some(1),
            }
        }
        Value::Bool(true) => 1.0,
        _ => return None,
    };

    if !n.is_finite() || n < 1.0 {
        return None;
    }
    Some(n.trunc().min(f64::from(u32::MAX)) as u32)
}

/// Apply the item rule to a whole list, preserving order.
pub fn sanitize_items(drafts: Vec<ItemDraft>) -> Vec<Item> {
    drafts.into_iter().filter_map(ItemDraft::into_item).collect()
}

// ---------------------------------------------------------------------------
// OrderDraft
// ---------------------------------------------------------------------------

/// Payload of a create request.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OrderDraft {
    pub items: Vec<ItemDraft>,
    pub table_name: Option<String>,
    pub notes: Option<String>,
}

impl OrderDraft {
    pub fn new(items: Vec<ItemDraft>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    pub fn table(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = Some(table_name.into());
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Read `{items, tableName?, notes?}`. Never fails; a non-object payload
    /// yields an empty draft, which the store rejects.
    pub fn from_json(v: &Value) -> Self {
        Self {
            items: items_field(v).unwrap_or_default(),
            table_name: str_field(v, "tableName"),
            notes: str_field(v, "notes"),
        }
    }
}

// ---------------------------------------------------------------------------
// OrderEdit
// ---------------------------------------------------------------------------

/// Payload of an update request. `None` means "not provided, leave as is".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OrderEdit {
    pub id: String,
    pub items: Option<Vec<ItemDraft>>,
    pub table_name: Option<String>,
    pub notes: Option<String>,
}

impl OrderEdit {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn items(mut self, items: Vec<ItemDraft>) -> Self {
        self.items = Some(items);
        self
    }

    pub fn table(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = Some(table_name.into());
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Read `{id, items?, tableName?, notes?}`.
    ///
    /// Returns `None` when there is no string `id`. Only a JSON array counts
    /// as provided `items`; only JSON strings count as provided text fields.
    pub fn from_json(v: &Value) -> Option<Self> {
        Some(Self {
            id: str_field(v, "id")?,
            items: items_field(v),
            table_name: str_field(v, "tableName"),
            notes: str_field(v, "notes"),
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn str_field(v: &Value, key: &str) -> Option<String> {
    v.get(key).and_then(Value::as_str).map(str::to_string)
}

fn items_field(v: &Value) -> Option<Vec<ItemDraft>> {
    let raw = v.get("items")?.as_array()?;
    Some(raw.iter().filter_map(ItemDraft::from_json).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn qty_numbers_are_truncated_and_must_be_positive() {
        assert_eq!(coerce_qty(&json!(2)), Some(2));
        assert_eq!(coerce_qty(&json!(2.9)), Some(2));
        assert_eq!(coerce_qty(&json!(0)), None);
        assert_eq!(coerce_qty(&json!(-3)), None);
        assert_eq!(coerce_qty(&json!(0.5)), None);
    }

    #[test]
    fn qty_strings() {
        assert_eq!(coerce_qty(&json!("3")), Some(3));
        assert_eq!(coerce_qty(&json!(" 4 ")), Some(4));
        assert_eq!(coerce_qty(&json!("abc")), Some(1));
        assert_eq!(coerce_qty(&json!("")), None);
        assert_eq!(coerce_qty(&json!("   ")), None);
        assert_eq!(coerce_qty(&json!("-1")), None);
        assert_eq!(coerce_qty(&json!("NaN")), None);
    }

    #[test]
    fn qty_other_json_kinds() {
        assert_eq!(coerce_qty(&json!(true)), Some(1));
        assert_eq!(coerce_qty(&json!(false)), None);
        assert_eq!(coerce_qty(&Value::Null), None);
        assert_eq!(coerce_qty(&json!([1])), None);
        assert_eq!(coerce_qty(&json!({"n": 1})), None);
    }

    #[test]
    fn item_keeps_client_id_and_generates_missing_one() {
        let kept = ItemDraft::new("Latte", 1).with_id("abc").into_item().unwrap();
        assert_eq!(kept.id, "abc");

        let fresh = ItemDraft::new("Latte", 1).with_id("").into_item().unwrap();
        assert!(Uuid::parse_str(&fresh.id).is_ok());
    }

    #[test]
    fn item_without_name_is_dropped() {
        assert!(ItemDraft::new("", 1).into_item().is_none());

        let nameless = ItemDraft::from_json(&json!({"qty": 2})).unwrap();
        assert!(nameless.into_item().is_none());

        let numeric_name = ItemDraft::from_json(&json!({"name": 5, "qty": 2})).unwrap();
        assert!(numeric_name.into_item().is_none());
    }

    #[test]
    fn non_object_items_are_skipped() {
        let draft = OrderDraft::from_json(&json!({
            "items": [null, "Latte", 3, {"name": "Tea", "qty": 1}]
        }));
        assert_eq!(draft.items.len(), 1);
        assert_eq!(sanitize_items(draft.items).len(), 1);
    }

    #[test]
    fn edit_requires_string_id_and_array_items() {
        assert!(OrderEdit::from_json(&json!({"items": []})).is_none());
        assert!(OrderEdit::from_json(&json!({"id": 7})).is_none());

        let edit = OrderEdit::from_json(&json!({"id": "x", "items": "nope", "notes": 3})).unwrap();
        assert_eq!(edit.items, None);
        assert_eq!(edit.notes, None);

        let edit = OrderEdit::from_json(&json!({"id": "x", "items": []})).unwrap();
        assert_eq!(edit.items, Some(vec![]));
    }
}
