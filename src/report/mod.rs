//! Tabular reports over loan offers.
//!
//! The report engine is a seam: it receives the flat record list and returns
//! column names plus rows. Column headers are then renamed through a
//! user-supplied alias string.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::domain::{RawRecord, TableReport};
use crate::error::AppError;

pub mod format;

pub use format::*;

/// Runs the report query over a record set.
pub trait ReportEngine {
    fn run(&self, items: &[RawRecord]) -> Result<(Vec<String>, Vec<Vec<Value>>), AppError>;
}

/// Projects records onto the union of their keys (first-seen order).
///
/// Missing fields become `null`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatTableEngine;

impl ReportEngine for FlatTableEngine {
    fn run(&self, items: &[RawRecord]) -> Result<(Vec<String>, Vec<Vec<Value>>), AppError> {
        let mut columns: Vec<String> = Vec::new();
        for item in items {
            for key in item.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }

        let rows = items
            .iter()
            .map(|item| {
                columns
                    .iter()
                    .map(|c| item.get(c).cloned().unwrap_or(Value::Null))
                    .collect()
            })
            .collect();

        Ok((columns, rows))
    }
}

/// Parse `"key=value, key2=value2"` into a column alias map.
///
/// Pairs without `=` or with an empty side are ignored. Only the first `=`
/// splits, so values may contain `=`.
pub fn parse_aliases(raw: &str) -> BTreeMap<String, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            let (key, value) = (key.trim(), value.trim());
            (!key.is_empty() && !value.is_empty()).then(|| (key.to_string(), value.to_string()))
        })
        .collect()
}

/// Run `engine` over `items` and attach alias-renamed headers.
pub fn build_table<E: ReportEngine + ?Sized>(
    engine: &E,
    items: &[RawRecord],
    aliases_raw: &str,
) -> Result<TableReport, AppError> {
    let (columns, rows) = engine.run(items)?;
    let aliases = parse_aliases(aliases_raw);
    let headers = columns
        .iter()
        .map(|c| aliases.get(c).cloned().unwrap_or_else(|| c.clone()))
        .collect();

    Ok(TableReport {
        rows_count: rows.len(),
        columns,
        headers,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn records(values: Vec<Value>) -> Vec<RawRecord> {
        values
            .into_iter()
            .map(|v| v.as_object().cloned().unwrap())
            .collect()
    }

    #[test]
    fn aliases_drop_malformed_pairs() {
        let aliases = parse_aliases("amount=Amount, bad");
        assert_eq!(aliases.len(), 1);
        assert_eq!(aliases.get("amount").map(String::as_str), Some("Amount"));
    }

    #[test]
    fn aliases_handle_blanks_and_extra_equals() {
        assert!(parse_aliases("   ").is_empty());
        let aliases = parse_aliases("=x, y=, rate = Rate (%), expr=a=b,,");
        assert_eq!(aliases.len(), 2);
        assert_eq!(aliases.get("rate").map(String::as_str), Some("Rate (%)"));
        assert_eq!(aliases.get("expr").map(String::as_str), Some("a=b"));
    }

    #[test]
    fn flat_engine_unions_columns_in_first_seen_order() {
        let items = records(vec![
            json!({"id": 1, "amount": 100}),
            json!({"id": 2, "rating": 4.5}),
        ]);
        let (columns, rows) = FlatTableEngine.run(&items).unwrap();
        assert_eq!(columns, vec!["id", "amount", "rating"]);
        assert_eq!(rows[1], vec![json!(2), Value::Null, json!(4.5)]);
    }

    #[test]
    fn build_table_renames_headers_only() {
        let items = records(vec![json!({"amount": 100, "period_days": 30})]);
        let report = build_table(&FlatTableEngine, &items, "amount=Amount").unwrap();
        assert_eq!(report.columns, vec!["amount", "period_days"]);
        assert_eq!(report.headers, vec!["Amount", "period_days"]);
        assert_eq!(report.rows_count, 1);
    }
}
