//! Model data projection for write requests

use super::classify::classify_field;
use super::types::{Record, Schema, IDENTIFIER};
use crate::error::{Error, Result};
use crate::types::JsonObject;
use serde_json::Value;

/// Project a typed record into a write-ready map.
///
/// Related records become their identifiers, components stay inline, and
/// with `exclude_managed` the server-managed fields are dropped.
pub fn project<R: Record>(record: &R, exclude_managed: bool) -> Result<JsonObject> {
    match serde_json::to_value(record)? {
        Value::Object(data) => Ok(project_value(R::schema(), data, exclude_managed)),
        other => Err(Error::Other(format!(
            "record '{}' serialized to {} instead of an object",
            R::schema().name(),
            json_kind(&other)
        ))),
    }
}

/// Project an already serialized, wire-keyed record
pub fn project_value(schema: &Schema, data: JsonObject, exclude_managed: bool) -> JsonObject {
    let mut result = JsonObject::new();

    for (key, value) in data {
        let Some(descriptor) = schema.field_by_wire_name(&key) else {
            result.insert(key, value);
            continue;
        };

        if exclude_managed && descriptor.managed {
            continue;
        }

        let value = if classify_field(descriptor).is_addressable() {
            replace_related(value)
        } else {
            value
        };
        result.insert(key, value);
    }

    result
}

/// Replace a related record, or a list made only of related records, by identifiers
fn replace_related(value: Value) -> Value {
    match &value {
        Value::Object(record) => {
            if let Some(id) = record.get(IDENTIFIER) {
                return id.clone();
            }
        }
        Value::Array(items) if !items.is_empty() => {
            let ids: Option<Vec<Value>> = items
                .iter()
                .map(|item| item.as_object().and_then(|r| r.get(IDENTIFIER)).cloned())
                .collect();
            if let Some(ids) = ids {
                return Value::Array(ids);
            }
        }
        _ => {}
    }
    value
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
