//! Pulling loan-offer records out of JSON documents.
//!
//! Both the API and exported files wrap the record list in different
//! envelopes; anything unrecognized is treated as "no records".

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::domain::RawRecord;
use crate::error::AppError;

/// Envelope keys that may hold the record list, in lookup order.
const ENVELOPE_KEYS: [&str; 5] = ["results", "items", "data", "records", "objects"];

/// How many envelope objects we are willing to descend through.
const MAX_ENVELOPE_DEPTH: usize = 1;

/// Extract the record list from a response or file document.
///
/// Non-object elements inside the list are dropped.
pub fn extract_items(raw: &Value) -> Vec<RawRecord> {
    extract_at_depth(raw, 0)
}

fn extract_at_depth(raw: &Value, depth: usize) -> Vec<RawRecord> {
    match raw {
        Value::Array(values) => collect_records(values),
        Value::Object(map) => {
            for key in ENVELOPE_KEYS {
                match map.get(key) {
                    Some(Value::Array(values)) => return collect_records(values),
                    Some(inner @ Value::Object(_)) if depth < MAX_ENVELOPE_DEPTH => {
                        let items = extract_at_depth(inner, depth + 1);
                        if !items.is_empty() {
                            return items;
                        }
                    }
                    _ => {}
                }
            }
            Vec::new()
        }
        _ => Vec::new(),
    }
}

fn collect_records(values: &[Value]) -> Vec<RawRecord> {
    values
        .iter()
        .filter_map(|v| v.as_object().cloned())
        .collect()
}

/// Load records from a local JSON file.
pub fn load_items_from_file(path: &Path) -> Result<Vec<RawRecord>, AppError> {
    if !path.is_file() {
        return Err(AppError::new(
            2,
            format!("JSON file not found: {}", path.display()),
        ));
    }

    let text = fs::read_to_string(path)
        .map_err(|e| AppError::new(2, format!("Failed to read JSON '{}': {e}", path.display())))?;
    let doc: Value = serde_json::from_str(&text)
        .map_err(|e| AppError::new(2, format!("Invalid JSON in '{}': {e}", path.display())))?;

    Ok(extract_items(&doc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn extracts_top_level_array() {
        let doc = json!([{"amount": 100}, {"amount": 200}, 7, "x"]);
        let items = extract_items(&doc);
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].get("amount"), Some(&json!(200)));
    }

    #[test]
    fn extracts_from_results_envelope() {
        let doc = json!({"pagination": {"total_pages": 3}, "results": [{"amount": 1}]});
        assert_eq!(extract_items(&doc).len(), 1);
    }

    #[test]
    fn extracts_from_nested_data_envelope() {
        let doc = json!({"data": {"items": [{"amount": 1}, {"amount": 2}]}});
        assert_eq!(extract_items(&doc).len(), 2);
    }

    #[test]
    fn unrecognized_shapes_yield_nothing() {
        assert!(extract_items(&json!({"detail": "oops"})).is_empty());
        assert!(extract_items(&json!("text")).is_empty());
        assert!(extract_items(&json!(null)).is_empty());
        assert!(extract_items(&json!({"data": {"data": {"items": [{"a": 1}]}}})).is_empty());
    }

    #[test]
    fn missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_items_from_file(&dir.path().join("absent.json")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().starts_with("JSON file not found"));
    }

    #[test]
    fn loads_records_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"items": [{{"amount": "1,5", "period_days": 30}}]}}"#).unwrap();
        let items = load_items_from_file(file.path()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].get("period_days"), Some(&json!(30)));
    }

    #[test]
    fn invalid_json_file_is_fatal() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();
        let err = load_items_from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("Invalid JSON"), "got: {err}");
    }
}
