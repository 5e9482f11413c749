//! Assertion helpers for plugin-log harnesses.
//!
//! These wrap `pretty_assertions` and say *which* record or snapshot broke
//! the expectation, not just that two values differ.

use serde_json::Value;

/// Assert a record has the given level and message.
///
/// ```rust
/// assert_record!(records[0], "warn", "cache miss");
/// ```
#[macro_export]
macro_rules! assert_record {
    ($record:expr, $level:expr, $message:expr) => {{
        let record: &serde_json::Value = &$record;
        if record["level"] != $level || record["message"] != $message {
            panic!(
                "assert_record! failed:\n  expected: [{}] {}\n  actual:   {}",
                $level, $message, record
            );
        }
    }};
}

/// Assert that a timestamp field is ISO-8601 UTC with a `Z` suffix.
pub fn assert_iso_timestamp(record: &Value) {
    let ts = record["timestamp"]
        .as_str()
        .unwrap_or_else(|| panic!("record has no string timestamp: {record}"));
    assert!(ts.ends_with('Z'), "timestamp not UTC: {ts}");
    assert!(
        chrono::DateTime::parse_from_rfc3339(ts).is_ok(),
        "timestamp not RFC 3339: {ts}"
    );
}

/// Assert that no string anywhere in `value` equals `needle`.
pub fn assert_no_string(value: &Value, needle: &str) {
    fn walk(value: &Value, needle: &str, path: &mut Vec<String>) {
        match value {
            Value::String(s) if s == needle => {
                panic!("found {needle:?} at /{}", path.join("/"))
            }
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    path.push(i.to_string());
                    walk(item, needle, path);
                    path.pop();
                }
            }
            Value::Object(map) => {
                for (k, item) in map {
                    path.push(k.clone());
                    walk(item, needle, path);
                    path.pop();
                }
            }
            _ => {}
        }
    }
    walk(value, needle, &mut Vec::new());
}
