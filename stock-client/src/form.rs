//! Form body encoding.
//!
//! Flattens an envelope into `application/x-www-form-urlencoded` pairs using
//! bracket notation for nested values, which is what the gateway parses:
//!
//! ```text
//! {"goods_ids": [1, 2], "data": {"source": "order"}}
//!   => goods_ids[0]=1, goods_ids[1]=2, data[source]=order
//! ```
//!
//! Booleans become `1`/`0`; `null` values and empty containers produce no field.

use serde_json::Value;

use crate::ports::Params;

/// Flatten an envelope into ordered form fields.
pub fn encode_form(params: &Params) -> Vec<(String, String)> {
    let mut fields = Vec::with_capacity(params.len());
    for (key, value) in params {
        flatten_into(key.clone(), value, &mut fields);
    }
    fields
}

/// Render a scalar the way the wire expects it. Returns `None` for `null` and containers.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Bool(true) => Some("1".to_string()),
        Value::Bool(false) => Some("0".to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn flatten_into(key: String, value: &Value, fields: &mut Vec<(String, String)>) {
    match value {
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                flatten_into(format!("{}[{}]", key, index), item, fields);
            }
        }
        Value::Object(map) => {
            for (sub, item) in map {
                flatten_into(format!("{}[{}]", key, sub), item, fields);
            }
        }
        scalar => {
            if let Some(text) = scalar_to_string(scalar) {
                fields.push((key, text));
            }
        }
    }
}
