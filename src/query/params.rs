//! Bracketed query parameter flattening
//!
//! The API parses nested query structures from bracketed keys:
//!
//! ```text
//! filters[title][$eq]=Hello
//! populate[0]=cover
//! populate[category][fields][0]=name
//! pagination[withCount]=true
//! ```

use indexmap::IndexMap;
use serde_json::Value;

/// Flat, ordered query parameters
pub type QueryParams = IndexMap<String, String>;

/// Flatten one named parameter value into bracketed keys.
///
/// Strings map to `{name: value}`, lists to `name[i]`, maps to
/// `name[k1]...[kn]` at every leaf. Null values (and null leaves) emit nothing.
pub fn flatten_parameter(name: &str, value: &Value) -> QueryParams {
    let mut params = QueryParams::new();
    flatten_into(name.to_string(), value, &mut params);
    params
}

/// Flatten into an existing parameter map
pub fn extend_parameters(params: &mut QueryParams, name: &str, value: &Value) {
    flatten_into(name.to_string(), value, params);
}

fn flatten_into(key: String, value: &Value, params: &mut QueryParams) {
    match value {
        Value::Null => {}
        Value::String(s) => {
            params.insert(key, s.clone());
        }
        Value::Bool(b) => {
            params.insert(key, b.to_string());
        }
        Value::Number(n) => {
            params.insert(key, n.to_string());
        }
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                flatten_into(format!("{key}[{i}]"), item, params);
            }
        }
        Value::Object(map) => {
            for (k, v) in map {
                flatten_into(format!("{key}[{k}]"), v, params);
            }
        }
    }
}
