#![allow(missing_docs, dead_code)]

use std::sync::LazyLock;

use jsonparsec::{
    Cursor, JsonDecode, JsonEncode, JsonText, ParseFailure, Parser,
    grammar::{self, FieldTable},
    registry, ser,
};

pub const ORDER: &str = r#"{
  "id": 1042,
  "customer": "Ada",
  "items": [
    {"sku": "A-1", "quantity": 2, "price": 9.5},
    {"sku": "B-7", "quantity": 1, "price": 120.0}
  ],
  "note": null
}"#;

#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub sku: String,
    pub quantity: i32,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: i64,
    pub customer: String,
    pub items: Vec<Item>,
    pub note: Option<String>,
}

static ITEM_FIELDS: LazyLock<FieldTable> = LazyLock::new(|| {
    FieldTable::new()
        .field("sku", grammar::string())
        .field("quantity", grammar::i32())
        .field("price", grammar::f64())
        .reject_unknown()
});

static ORDER_FIELDS: LazyLock<FieldTable> = LazyLock::new(|| {
    FieldTable::new()
        .field("id", grammar::i64())
        .field("customer", grammar::string())
        .field("items", registry::parser::<Vec<Item>>())
        .field("note", registry::parser::<Option<String>>())
});

impl JsonDecode for Item {
    fn decode(cursor: &mut Cursor<'_>) -> Result<Self, ParseFailure> {
        grammar::object(&*ITEM_FIELDS, |mut fields| {
            Ok::<_, String>(Item {
                sku: fields.require("sku")?,
                quantity: fields.require("quantity")?,
                price: fields.require("price")?,
            })
        })
        .parse(cursor)
    }
}

impl JsonDecode for Order {
    fn decode(cursor: &mut Cursor<'_>) -> Result<Self, ParseFailure> {
        grammar::object(&*ORDER_FIELDS, |mut fields| {
            Ok::<_, String>(Order {
                id: fields.require("id")?,
                customer: fields.require("customer")?,
                items: fields.take("items").unwrap_or_default(),
                note: fields.take::<Option<String>>("note").flatten(),
            })
        })
        .parse(cursor)
    }
}

impl JsonEncode for Item {
    fn to_json(&self) -> JsonText {
        ser::object([
            ("sku", ser::string(&self.sku)),
            ("quantity", ser::i32(self.quantity)),
            ("price", ser::f64(self.price)),
        ])
    }
}

impl JsonEncode for Order {
    fn to_json(&self) -> JsonText {
        ser::object([
            ("id", ser::i64(self.id)),
            ("customer", ser::string(&self.customer)),
            ("items", self.items.to_json()),
            ("note", ser::optional(self.note.as_deref(), ser::string)),
        ])
    }
}

pub fn sample_order() -> Order {
    Order {
        id: 1042,
        customer: "Ada".into(),
        items: vec![
            Item {
                sku: "A-1".into(),
                quantity: 2,
                price: 9.5,
            },
            Item {
                sku: "B-7".into(),
                quantity: 1,
                price: 120.0,
            },
        ],
        note: None,
    }
}
