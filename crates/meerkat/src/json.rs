//! JSON codec with extended-type wrappers
//!
//! Dates and identifiers do not exist in JSON, so they travel in single-key
//! wrapper objects: `{"$date": <epoch-millis>}` and `{"$oid": "<hex>"}`.
//! The identifier itself is serialized under the `"id"` key.

use bson::oid::ObjectId;
use meerkat_common::{MeerkatError, Result};
use serde_json::json;

use crate::document::Document;
use crate::schema::Schema;
use crate::value::Value;

/// Encode a field value as JSON, wrapping extended types
pub fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => json!(b),
        Value::Int(i) => json!(i),
        Value::Float(f) => json!(f),
        Value::String(s) => json!(s),
        Value::DateTime(dt) => json!({ "$date": dt.and_utc().timestamp_millis() }),
        Value::ObjectId(id) => json!({ "$oid": id.to_hex() }),
        Value::Array(items) => {
            serde_json::Value::Array(items.iter().map(value_to_json).collect())
        }
        Value::Object(pairs) => serde_json::Value::Object(
            pairs
                .iter()
                .map(|(k, v)| (k.clone(), value_to_json(v)))
                .collect(),
        ),
    }
}

/// Decode a JSON value, unwrapping the extended-type wrappers
pub fn json_to_value(json: &serde_json::Value) -> Result<Value> {
    match json {
        serde_json::Value::Null => Ok(Value::Null),
        serde_json::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Int(i))
            } else if let Some(f) = n.as_f64() {
                Ok(Value::Float(f))
            } else {
                Err(MeerkatError::Deserialization(format!(
                    "unrepresentable number: {n}"
                )))
            }
        }
        serde_json::Value::String(s) => Ok(Value::String(s.clone())),
        serde_json::Value::Array(items) => Ok(Value::Array(
            items.iter().map(json_to_value).collect::<Result<_>>()?,
        )),
        serde_json::Value::Object(map) => {
            if map.len() == 1 {
                if let Some(millis) = map.get("$date").and_then(serde_json::Value::as_i64) {
                    let dt = chrono::DateTime::from_timestamp_millis(millis)
                        .ok_or_else(|| {
                            MeerkatError::Deserialization(format!(
                                "timestamp out of range: {millis}"
                            ))
                        })?
                        .naive_utc();
                    return Ok(Value::DateTime(dt));
                }
                if let Some(hex) = map.get("$oid").and_then(serde_json::Value::as_str) {
                    let id = ObjectId::parse_str(hex).map_err(|e| {
                        MeerkatError::Deserialization(format!("invalid object id {hex:?}: {e}"))
                    })?;
                    return Ok(Value::ObjectId(id));
                }
            }
            Ok(Value::Object(
                map.iter()
                    .map(|(k, v)| Ok((k.clone(), json_to_value(v)?)))
                    .collect::<Result<_>>()?,
            ))
        }
    }
}

impl Document {
    /// Serialize the document's field values to JSON
    ///
    /// With `fields`, only that subset is serialized. The identifier is
    /// included by default under `"id"`; an explicit subset that omits
    /// `"id"` excludes it.
    pub fn to_json(&self, fields: Option<&[&str]>) -> Result<String> {
        let mut map = serde_json::Map::new();

        let include_id = fields.map_or(true, |subset| subset.contains(&"id"));
        if include_id {
            let id = match self.id() {
                Some(id) => json!({ "$oid": id.to_hex() }),
                None => serde_json::Value::Null,
            };
            map.insert("id".to_string(), id);
        }

        for (name, value) in self.field_values() {
            let wanted = fields.map_or(true, |subset| subset.contains(&name.as_str()));
            if wanted {
                map.insert(name, value_to_json(&value));
            }
        }

        Ok(serde_json::to_string(&serde_json::Value::Object(map))?)
    }

    /// Deserialize a JSON string into a new instance of `schema`
    ///
    /// Values pass through the normal construction path, so validation and
    /// defaults apply. An `"id"` key restores the identifier.
    pub fn from_json(schema: &'static Schema, json: &str) -> Result<Document> {
        let parsed: serde_json::Value = serde_json::from_str(json)?;
        let serde_json::Value::Object(map) = parsed else {
            return Err(MeerkatError::Deserialization(
                "expected a JSON object".to_string(),
            ));
        };

        let mut record = Vec::with_capacity(map.len());
        for (key, value) in &map {
            let value = json_to_value(value)?;
            if key == "id" || key == "_id" {
                if !value.is_null() {
                    record.push(("_id".to_string(), value));
                }
            } else {
                record.push((key.clone(), value));
            }
        }

        Ok(Document::from_map(schema, record))
    }
}
