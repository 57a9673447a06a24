#![allow(missing_docs)]

mod common;

use std::collections::BTreeMap;

use common::{Item, ORDER, Order, sample_order};
use jsonparsec::{JsonEncode, from_str, to_string};
use rstest::rstest;

#[test]
fn decodes_nested_records() {
    assert_eq!(from_str::<Order>(ORDER), Ok(sample_order()));
}

#[test]
fn member_order_does_not_matter() {
    let text = r#"{"items": [], "note": "rush", "customer": "Bo", "id": 7}"#;
    let order = from_str::<Order>(text).unwrap();
    assert_eq!(order.id, 7);
    assert_eq!(order.note.as_deref(), Some("rush"));
    assert!(order.items.is_empty());
}

#[test]
fn absent_members_are_omitted_from_output() {
    insta::assert_snapshot!(
        to_string(&sample_order()),
        @r#"{"id":1042,"customer":"Ada","items":[{"sku":"A-1","quantity":2,"price":9.5},{"sku":"B-7","quantity":1,"price":120.0}]}"#
    );
}

#[test]
fn present_optionals_are_written() {
    let order = Order {
        note: Some("leave at door".into()),
        items: vec![],
        ..sample_order()
    };
    assert_eq!(
        order.to_json(),
        r#"{"id":1042,"customer":"Ada","items":[],"note":"leave at door"}"#
    );
}

#[rstest]
#[case(sample_order())]
#[case(Order { id: -1, customer: "quote \" and / slash".into(), items: vec![], note: Some("\u{1F600}\n".into()) })]
#[case(Order { id: i64::MAX, customer: String::new(), items: vec![Item { sku: String::new(), quantity: i32::MIN, price: -0.5 }], note: None })]
fn records_round_trip(#[case] order: Order) {
    assert_eq!(from_str::<Order>(&to_string(&order)), Ok(order));
}

#[test]
fn records_nest_inside_generic_containers() {
    let mut by_customer = BTreeMap::new();
    by_customer.insert("Ada".to_string(), vec![Some(sample_order()), None]);
    let text = to_string(&by_customer);
    assert_eq!(
        from_str::<BTreeMap<String, Vec<Option<Order>>>>(&text),
        Ok(by_customer)
    );
}

#[test]
fn serde_json_reads_record_output() {
    let text = to_string(&sample_order());
    let oracle: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(oracle["items"][1]["price"], serde_json::json!(120.0));
    assert_eq!(oracle.get("note"), None);
}
