//! Scenario: a create whose items all fail the item rule changes nothing.

use ob_store::*;
use serde_json::json;

#[test]
fn scenario_empty_name_rejected() {
    let mut store = OrderStore::new();
    let res = store.create(OrderDraft::new(vec![ItemDraft::new("", 1)]), 0);

    assert_eq!(res, Err(Rejection::NoValidItems));
    assert!(store.is_empty());
    assert_eq!(store.next_number(), 1);
}

#[test]
fn scenario_non_positive_quantities_rejected() {
    let mut store = OrderStore::new();
    let draft = OrderDraft::new(vec![
        ItemDraft::new("Latte", 0),
        ItemDraft::new("Tea", -2),
        ItemDraft::new("Mocha", ""),
    ]);

    assert_eq!(store.create(draft, 0), Err(Rejection::NoValidItems));
    assert!(store.is_empty());
}

#[test]
fn scenario_missing_or_malformed_payload_rejected() {
    let mut store = OrderStore::new();

    for payload in [json!({}), json!(null), json!("createOrder"), json!({"items": "Latte"})] {
        let res = store.apply(Command::Create(OrderDraft::from_json(&payload)), 0);
        assert_eq!(res, Err(Rejection::NoValidItems), "payload {payload}");
    }
    assert!(store.is_empty());
}

#[test]
fn scenario_partially_valid_items_are_filtered_not_rejected() {
    let mut store = OrderStore::new();
    let payload = json!({
        "items": [
            {"name": "", "qty": 1},
            {"name": "Latte", "qty": 2},
            {"name": "Tea", "qty": 0},
            {"name": "Scone", "qty": "3"}
        ]
    });

    store
        .apply(Command::Create(OrderDraft::from_json(&payload)), 0)
        .expect("two items survive");

    let names: Vec<(&str, u32)> = store.orders()[0]
        .items
        .iter()
        .map(|i| (i.name.as_str(), i.qty))
        .collect();
    assert_eq!(names, vec![("Latte", 2), ("Scone", 3)]);
}
