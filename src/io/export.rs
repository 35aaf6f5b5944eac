//! Export table reports to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::path::Path;

use serde_json::Value;

use crate::domain::TableReport;
use crate::error::AppError;

/// Write a table report (display headers + rows) to a CSV file.
pub fn write_table_csv(path: &Path, report: &TableReport) -> Result<(), AppError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_path(path)
        .map_err(|e| AppError::new(5, format!("Failed to create export CSV '{}': {e}", path.display())))?;

    writer
        .write_record(&report.headers)
        .map_err(|e| AppError::new(5, format!("Failed to write export CSV header: {e}")))?;

    for row in &report.rows {
        writer
            .write_record(row.iter().map(value_text))
            .map_err(|e| AppError::new(5, format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(5, format!("Failed to write export CSV: {e}")))?;
    Ok(())
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn writes_headers_and_quoted_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");
        let report = TableReport {
            columns: vec!["amount".to_string(), "note".to_string()],
            headers: vec!["Amount".to_string(), "note".to_string()],
            rows: vec![vec![json!(1000), json!("a, \"b\"")], vec![json!(5.5), Value::Null]],
            rows_count: 2,
        };

        write_table_csv(&path, &report).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "Amount,note\n1000,\"a, \"\"b\"\"\"\n5.5,\n");
    }

    #[test]
    fn multiline_and_nested_values_survive_a_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");
        let report = TableReport {
            columns: vec!["comment".to_string(), "meta".to_string()],
            headers: vec!["Comment".to_string(), "meta".to_string()],
            rows: vec![vec![json!("line one\nline two"), json!({"a": [1, 2]})]],
            rows_count: 1,
        };

        write_table_csv(&path, &report).unwrap();
        let mut reader = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "line one\nline two");
        assert_eq!(&rows[0][1], r#"{"a":[1,2]}"#);
    }

    #[test]
    fn unwritable_path_is_an_export_error() {
        let dir = tempfile::tempdir().unwrap();
        let report = TableReport::default();
        let err = write_table_csv(&dir.path().join("missing/report.csv"), &report).unwrap_err();
        assert_eq!(err.exit_code(), 5);
    }
}
