//! Content-addressed keys for derived objects.
//!
//! A resize request is hashed over its canonical JSON text: object keys are
//! emitted in sorted order at every depth, arrays keep their order and
//! scalars use their normal JSON encoding. Two requests that differ only in
//! key order therefore share a cache key.

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Render a JSON value as canonical text.
pub fn canonicalize(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(&map[key], out);
            }
            out.push('}');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

/// Hex-encoded SHA-256 of the canonical form of any serializable value.
pub fn hash_object<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let json = serde_json::to_value(value)?;
    Ok(hash_value(&json))
}

/// Hex-encoded SHA-256 of the canonical form of a JSON value.
pub fn hash_value(value: &Value) -> String {
    let canonical = canonicalize(value);
    hex::encode(Sha256::digest(canonical.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_canonicalize_sorts_nested_keys() {
        let value = json!({"b": 1, "a": {"z": true, "y": [3, {"d": null, "c": "x"}]}});
        assert_eq!(
            canonicalize(&value),
            r#"{"a":{"y":[3,{"c":"x","d":null}],"z":true},"b":1}"#
        );
    }

    #[test]
    fn test_hash_is_order_independent() {
        let a: Value = serde_json::from_str(r#"{"sizing":"crop","width":200,"height":200}"#).unwrap();
        let b: Value = serde_json::from_str(r#"{"height":200,"width":200,"sizing":"crop"}"#).unwrap();
        assert_eq!(hash_value(&a), hash_value(&b));
    }

    #[test]
    fn test_hash_distinguishes_values() {
        let a = json!({"sizing": "crop", "width": 200});
        let b = json!({"sizing": "crop", "width": 201});
        assert_ne!(hash_value(&a), hash_value(&b));
        assert_eq!(hash_value(&a).len(), 64);
    }

    #[test]
    fn test_hash_of_known_input() {
        // sha256 of the text `{"a":1}`
        assert_eq!(
            hash_value(&json!({"a": 1})),
            "015abd7f5cc57a2dd94b7590f04ad8084273905ee33ec5cebeae62276a97f862"
        );
    }
}
