//! Permissive record type for raw API payloads
//!
//! The PVE API returns loosely typed JSON objects: numbers sometimes arrive
//! as strings, booleans as 0/1 integers, and every endpoint has its own key
//! set. Generators only ever touch the keys they know about and pass the
//! rest through untouched, so an ordered string-to-value map is all the
//! schema we need.

use serde_json::Value;

/// One raw configuration entity (a disk, an interface, a user, ...).
///
/// Insertion-ordered so that API and microformat key order survives into the
/// generated documents.
pub type Record = serde_json::Map<String, Value>;

/// String value of `key`, if present and a string.
pub fn get_str<'a>(record: &'a Record, key: &str) -> Option<&'a str> {
    record.get(key).and_then(Value::as_str)
}

/// String value of `key`, or `default` when absent or not a string.
pub fn str_or<'a>(record: &'a Record, key: &str, default: &'a str) -> &'a str {
    get_str(record, key).unwrap_or(default)
}

/// Unsigned integer value of `key`. Accepts both JSON numbers and numeric
/// strings (the API is inconsistent about which it sends).
pub fn get_u64(record: &Record, key: &str) -> Option<u64> {
    match record.get(key)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// PVE boolean flag: `1`, `"1"`, or `true` all mean enabled.
pub fn flag(record: &Record, key: &str) -> bool {
    match record.get(key) {
        Some(Value::Number(n)) => n.as_u64() == Some(1),
        Some(Value::String(s)) => s == "1",
        Some(Value::Bool(b)) => *b,
        _ => false,
    }
}

/// Render a value for document output without JSON quoting.
pub fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Display form of `record[key]`, empty string when absent.
pub fn display_key(record: &Record, key: &str) -> String {
    record.get(key).map(display).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Record {
        match json!({
            "name": "web01",
            "cores": 4,
            "memory": "8192",
            "onboot": 1,
            "template": "0",
            "agent": true,
        }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn numeric_strings_parse() {
        let rec = sample();
        assert_eq!(get_u64(&rec, "cores"), Some(4));
        assert_eq!(get_u64(&rec, "memory"), Some(8192));
        assert_eq!(get_u64(&rec, "name"), None);
    }

    #[test]
    fn flags_accept_all_encodings() {
        let rec = sample();
        assert!(flag(&rec, "onboot"));
        assert!(!flag(&rec, "template"));
        assert!(flag(&rec, "agent"));
        assert!(!flag(&rec, "missing"));
    }

    #[test]
    fn display_strips_quotes() {
        let rec = sample();
        assert_eq!(display_key(&rec, "name"), "web01");
        assert_eq!(display_key(&rec, "cores"), "4");
        assert_eq!(display_key(&rec, "missing"), "");
    }
}
