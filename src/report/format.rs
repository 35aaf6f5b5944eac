//! Formatted terminal output for reports, distributions and calculations.
//!
//! We keep formatting code in one place so:
//! - the fetch/statistics code stays clean and testable
//! - output changes are localized

use serde_json::Value;

use crate::data::PagedItems;
use crate::domain::{AmountDistribution, Calculation, TableReport};

/// Widest a table cell may render before it is truncated.
const MAX_CELL_WIDTH: usize = 24;

/// Format a table report with aligned columns.
pub fn format_table_report(report: &TableReport) -> String {
    let cells: Vec<Vec<String>> = report
        .rows
        .iter()
        .map(|row| row.iter().map(render_value).collect())
        .collect();

    let mut widths: Vec<usize> = report
        .headers
        .iter()
        .map(|h| h.chars().count().min(MAX_CELL_WIDTH))
        .collect();
    for row in &cells {
        for (idx, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(idx) {
                *w = (*w).max(cell.chars().count().min(MAX_CELL_WIDTH));
            }
        }
    }

    let mut out = String::new();
    push_row(&mut out, report.headers.iter().map(String::as_str), &widths);
    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&separator.join(" "));
    out.push('\n');

    for row in &cells {
        push_row(&mut out, row.iter().map(String::as_str), &widths);
    }
    out
}

/// Format a distribution as an amount-by-bucket count table.
pub fn format_distribution(dist: &AmountDistribution) -> String {
    let mut out = String::new();

    if dist.labels.is_empty() {
        out.push_str("No records matched.\n");
        return out;
    }

    out.push_str(&format!("{:>12}", "amount"));
    for ds in &dist.datasets {
        out.push_str(&format!(" {:>7}", ds.label));
    }
    out.push_str(&format!(" {:>7}\n", "total"));

    out.push_str(&format!("{:-<12}", ""));
    for _ in &dist.datasets {
        out.push_str(&format!(" {:-<7}", ""));
    }
    out.push_str(&format!(" {:-<7}\n", ""));

    for (idx, label) in dist.labels.iter().enumerate() {
        out.push_str(&format!("{label:>12}"));
        let mut row_total = 0;
        for ds in &dist.datasets {
            let n = ds.data.get(idx).copied().unwrap_or(0);
            row_total += n;
            out.push_str(&format!(" {n:>7}"));
        }
        out.push_str(&format!(" {row_total:>7}\n"));
    }

    out.push_str(&format!("Records: {}\n", dist.total_records));
    out
}

/// Format calculator output.
pub fn format_calculation(calc: &Calculation) -> String {
    format!(
        "Income (with commission):    {}\nIncome (without commission): {}\nReal annual yield:           {}\n",
        calc.income_with_commission, calc.income_without_commission, calc.real_annual_yield
    )
}

/// One-line note about pages that could not be retrieved, if any.
pub fn format_fetch_notes(paged: &PagedItems) -> Option<String> {
    let mut notes = Vec::new();
    if !paged.skipped_pages.is_empty() {
        let pages: Vec<String> = paged.skipped_pages.iter().map(u32::to_string).collect();
        notes.push(format!("skipped pages: {}", pages.join(", ")));
    }
    if let Some(err) = &paged.scan_error {
        notes.push(format!("scan stopped early: {err}"));
    }
    (!notes.is_empty()).then(|| format!("Incomplete data ({})", notes.join("; ")))
}

fn push_row<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let parts: Vec<String> = cells
        .zip(widths)
        .map(|(cell, &w)| format!("{:<w$}", truncate(cell, MAX_CELL_WIDTH)))
        .collect();
    out.push_str(parts.join(" ").trim_end());
    out.push('\n');
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Dataset;
    use crate::data::FetchError;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn table_report_aligns_columns() {
        let report = TableReport {
            columns: vec!["amount".to_string(), "rating".to_string()],
            headers: vec!["Amount".to_string(), "rating".to_string()],
            rows: vec![vec![json!(1000), json!("4.5")], vec![json!(50), Value::Null]],
            rows_count: 2,
        };

        let expected = concat!(
            "Amount rating\n",
            "------ ------\n",
            "1000   4.5\n",
            "50\n",
        );
        assert_eq!(format_table_report(&report), expected);
    }

    #[test]
    fn long_cells_are_truncated() {
        assert_eq!(truncate("abcdef", 4), "abc.");
        assert_eq!(truncate("abc", 4), "abc");
    }

    #[test]
    fn distribution_table_has_row_totals() {
        let dist = AmountDistribution {
            labels: vec!["500.00".to_string(), "1000.00".to_string()],
            datasets: vec![
                Dataset { label: "30".to_string(), data: vec![0, 2] },
                Dataset { label: "other".to_string(), data: vec![1, 0] },
            ],
            total_records: 3,
        };

        let expected = concat!(
            "      amount      30   other   total\n",
            "------------ ------- ------- -------\n",
            "      500.00       0       1       1\n",
            "     1000.00       2       0       2\n",
            "Records: 3\n",
        );
        assert_eq!(format_distribution(&dist), expected);
    }

    #[test]
    fn fetch_notes_only_when_incomplete() {
        let mut paged = PagedItems::default();
        assert_eq!(format_fetch_notes(&paged), None);

        paged.skipped_pages = vec![3, 7];
        paged.scan_error = Some(FetchError::Status {
            url: "https://api.example.test/?page=9".to_string(),
            status: 502,
        });
        let note = format_fetch_notes(&paged).unwrap();
        assert!(note.starts_with("Incomplete data (skipped pages: 3, 7; scan stopped early:"));
    }
}
