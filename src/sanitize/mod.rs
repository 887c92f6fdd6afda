//! Masking of credentials in data that is about to be logged.
//!
//! Everything here is a pure transform over borrowed input. The output is
//! only ever handed to `tracing`; it is never sent to the controller or
//! returned to a caller.

use reqwest::header::HeaderMap;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Case-insensitive substrings that mark a field name as sensitive.
pub const SENSITIVE_KEY_PATTERNS: &[&str] =
    &["authorization", "token", "secret", "password", "client_id"];

/// Replacement for short sensitive strings.
pub const MASKED_SHORT: &str = "********";

/// Replacement for sensitive non-string scalars.
pub const MASKED_VALUE: &str = "[masked]";

/// Replacement for sensitive objects and arrays.
pub const MASKED_OBJECT: &str = "[masked-object]";

/// Strings up to this many characters are masked entirely.
const FULL_MASK_LIMIT: usize = 8;

/// Characters kept at each end of a longer masked string.
const VISIBLE_CHARS: usize = 4;

/// Authorization schemes stripped before masking so the visible window
/// shows the credential rather than the scheme name.
const AUTH_SCHEMES: &[&str] = &["Bearer ", "Basic ", "AccessToken="];

/// Returns true if values stored under `key` must be masked.
pub fn is_sensitive_key(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    SENSITIVE_KEY_PATTERNS
        .iter()
        .any(|pattern| key.contains(pattern))
}

/// Returns a copy of `value` with every sensitive field masked.
///
/// Mappings are walked key by key. A nested object, including one held in
/// an array, is replaced with [`MASKED_OBJECT`] when it sits under a
/// sensitive key or directly contains one.
pub fn sanitize(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(sanitize_map(map)),
        Value::Array(items) => Value::Array(items.iter().map(sanitize_nested).collect()),
        other => other.clone(),
    }
}

/// Sanitizes a header map into a JSON object suitable for logging.
///
/// Repeated headers are joined with `, ` so no value is dropped.
pub fn sanitize_headers(headers: &HeaderMap) -> Value {
    let map: Map<String, Value> = headers
        .keys()
        .map(|name| {
            let joined = headers
                .get_all(name)
                .iter()
                .map(|value| value.to_str().unwrap_or("<non-utf8>"))
                .collect::<Vec<_>>()
                .join(", ");
            (name.as_str().to_string(), Value::String(joined))
        })
        .collect();
    Value::Object(sanitize_map(&map))
}

/// Sanitizes query parameters into a JSON object suitable for logging.
pub fn sanitize_params(params: &BTreeMap<String, String>) -> Value {
    let map: Map<String, Value> = params
        .iter()
        .map(|(key, value)| (key.clone(), Value::String(value.clone())))
        .collect();
    Value::Object(sanitize_map(&map))
}

/// Query parameters with sensitive entries dropped, rendered as `k=v&k=v`.
pub fn public_params(params: &BTreeMap<String, String>) -> String {
    params
        .iter()
        .filter(|(key, _)| !is_sensitive_key(key))
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&")
}

/// Masks a single sensitive string.
///
/// Strings longer than eight characters keep their first and last four
/// characters; shorter ones are masked completely.
pub fn mask_str(value: &str) -> String {
    let secret = strip_auth_scheme(value);
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= FULL_MASK_LIMIT {
        return MASKED_SHORT.to_string();
    }

    let head: String = chars[..VISIBLE_CHARS].iter().collect();
    let tail: String = chars[chars.len() - VISIBLE_CHARS..].iter().collect();
    format!("{}…{}", head, tail)
}

fn sanitize_map(map: &Map<String, Value>) -> Map<String, Value> {
    map.iter()
        .map(|(key, value)| {
            let value = if is_sensitive_key(key) {
                mask(value)
            } else {
                sanitize_nested(value)
            };
            (key.clone(), value)
        })
        .collect()
}

fn sanitize_nested(value: &Value) -> Value {
    match value {
        Value::Object(map) if map.keys().any(|key| is_sensitive_key(key)) => {
            Value::String(MASKED_OBJECT.to_string())
        }
        other => sanitize(other),
    }
}

fn mask(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(mask_str(s)),
        Value::Object(_) | Value::Array(_) => Value::String(MASKED_OBJECT.to_string()),
        _ => Value::String(MASKED_VALUE.to_string()),
    }
}

fn strip_auth_scheme(value: &str) -> &str {
    for scheme in AUTH_SCHEMES {
        if let Some(prefix) = value.get(..scheme.len()) {
            if prefix.eq_ignore_ascii_case(scheme) {
                return &value[scheme.len()..];
            }
        }
    }
    value
}
