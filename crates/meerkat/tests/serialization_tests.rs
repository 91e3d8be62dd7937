//! JSON serialization round trips

use chrono::NaiveDate;
use meerkat::{Document, FieldDescriptor, Schema, Value};
use once_cell::sync::Lazy;
use serde_json::json;

static TARGET: Lazy<Schema> = Lazy::new(|| {
    Schema::document("Target")
        .collection("targets")
        .field(FieldDescriptor::string("name"))
        .field(FieldDescriptor::float("price"))
        .field(FieldDescriptor::integer("quantity"))
        .field(FieldDescriptor::datetime("sold_on"))
        .build()
});

fn widget() -> Document {
    let sold_on = NaiveDate::from_ymd_opt(2013, 8, 25)
        .unwrap()
        .and_hms_opt(22, 24, 0)
        .unwrap();
    Document::from_map(
        &TARGET,
        vec![
            ("name".to_string(), "Widget".into()),
            ("price".to_string(), Value::Float(9.99)),
            ("quantity".to_string(), Value::Int(3)),
            ("sold_on".to_string(), sold_on.into()),
        ],
    )
}

#[test]
fn serializes_with_extended_type_wrappers() {
    let json = widget().to_json(None).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed["id"], serde_json::Value::Null);
    assert_eq!(parsed["name"], json!("Widget"));
    assert_eq!(parsed["price"], json!(9.99));
    assert_eq!(parsed["quantity"], json!(3));
    assert_eq!(parsed["sold_on"], json!({ "$date": 1377469440000i64 }));
}

#[test]
fn serializes_only_requested_fields() {
    let json = widget()
        .to_json(Some(&["id", "name", "price", "quantity"]))
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed["id"], serde_json::Value::Null);
    assert_eq!(parsed["name"], json!("Widget"));
    assert_eq!(parsed["price"], json!(9.99));
    assert_eq!(parsed["quantity"], json!(3));
    assert!(parsed.get("sold_on").is_none());
}

#[test]
fn deserializes_plain_json() {
    let json = r#"{"price": 9.99, "name": "Widget", "quantity": 3}"#;
    let doc = Document::from_json(&TARGET, json).unwrap();
    assert_eq!(doc.get_f64("price"), Some(9.99));
    assert_eq!(doc.get_str("name"), Some("Widget"));
    assert_eq!(doc.get_i64("quantity"), Some(3));
}

#[test]
fn round_trip_reproduces_field_values() {
    let original = widget();
    let json = original.to_json(None).unwrap();
    let restored = Document::from_json(&TARGET, &json).unwrap();
    assert_eq!(original.field_values(), restored.field_values());
}

#[test]
fn round_trip_validates_on_the_way_in() {
    static STRICT: Lazy<Schema> = Lazy::new(|| {
        Schema::document("Strict")
            .collection("stricts")
            .field(FieldDescriptor::string("name").required())
            .field(FieldDescriptor::float("price").min_value(0))
            .build()
    });

    let doc = Document::from_json(&STRICT, r#"{"price": -1.0}"#).unwrap();
    assert_eq!(
        doc.errors().full_messages(),
        [
            "Name is required",
            "Price is too small (minimum is 0.0)"
        ]
    );
}
