//! Per-record field parsing.
//!
//! Every field is parsed on its own: a malformed `rating` never hides a valid
//! `amount`. Parsing never fails the record as a whole.

use serde_json::Value;

use crate::domain::{ParsedRecord, RawRecord};

impl ParsedRecord {
    pub fn from_record(record: &RawRecord) -> Self {
        Self {
            amount: record.get("amount").and_then(parse_amount),
            period_days: record.get("period_days").and_then(parse_period_days),
            rating: record.get("rating").and_then(parse_rating),
        }
    }

    /// `true` when the record can be placed in the distribution.
    pub fn is_countable(&self) -> bool {
        self.amount.is_some() && self.period_days.is_some()
    }

    /// Rating filter: without a threshold everything passes, with one the
    /// rating must be present and strictly greater.
    pub fn passes_min_rating(&self, min_rating: Option<f64>) -> bool {
        match (min_rating, self.rating) {
            (None, _) => true,
            (Some(min), Some(rating)) => rating > min,
            (Some(_), None) => false,
        }
    }
}

/// Parse an amount, accepting `,` as the decimal separator.
///
/// A comma followed by exact groups of three digits (`1,000`, `12,500,000`)
/// is read as digit grouping instead.
pub fn parse_amount(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => parse_decimal(s),
        _ => None,
    }
}

/// Parse a period in days; fractional input is truncated (`"30.0"` -> 30).
pub fn parse_period_days(value: &Value) -> Option<i64> {
    let days = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    days.is_finite().then(|| days.trunc() as i64)
}

pub fn parse_rating(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => parse_finite(s.trim()),
        _ => None,
    }
}

/// Parse a numeric string from a record (`"1,5"`, `" 12.75 "`, `"1,000"`).
pub fn parse_decimal(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let normalized = if is_digit_grouped(trimmed) {
        trimmed.replace(',', "")
    } else {
        trimmed.replace(',', ".")
    };
    parse_finite(&normalized)
}

fn is_digit_grouped(s: &str) -> bool {
    if s.contains('.') {
        return false;
    }
    let unsigned = s.strip_prefix(['-', '+']).unwrap_or(s);
    let mut groups = unsigned.split(',');
    let head = groups.next().unwrap_or("");
    let tail: Vec<&str> = groups.collect();

    let all_digits = |g: &str| !g.is_empty() && g.bytes().all(|b| b.is_ascii_digit());
    !tail.is_empty()
        && all_digits(head)
        && head.len() <= 3
        && tail.iter().all(|g| g.len() == 3 && all_digits(g))
}

fn parse_finite(s: &str) -> Option<f64> {
    let v = s.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}
