//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - built in-memory by the pipeline
//! - exported to JSON/CSV
//! - reloaded later for plotting

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One loan offer exactly as delivered by a file or the API.
///
/// No schema is guaranteed: any field may be absent or malformed.
pub type RawRecord = serde_json::Map<String, Value>;

/// Typed view of the fields the statistics engine cares about.
///
/// Each field is parsed independently; a failure only clears that field.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ParsedRecord {
    pub amount: Option<f64>,
    pub period_days: Option<i64>,
    pub rating: Option<f64>,
}

/// Period buckets with a dedicated dataset, in canonical order.
pub const PERIOD_BUCKETS: [i64; 5] = [10, 20, 30, 40, 60];

/// Period-in-days category of a record.
///
/// The derived ordering is the canonical dataset order: numeric buckets
/// ascending, `Other` last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BucketKey {
    Days(i64),
    Other,
}

impl BucketKey {
    pub fn for_period(period_days: i64) -> Self {
        if PERIOD_BUCKETS.contains(&period_days) {
            BucketKey::Days(period_days)
        } else {
            BucketKey::Other
        }
    }

    pub fn label(self) -> String {
        match self {
            BucketKey::Days(days) => days.to_string(),
            BucketKey::Other => "other".to_string(),
        }
    }
}

/// Counts for one bucket, aligned positionally with `AmountDistribution::labels`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    pub label: String,
    pub data: Vec<usize>,
}

/// Chart-ready histogram of offer amounts split by period bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountDistribution {
    /// Distinct amounts, ascending, formatted with two decimals.
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
    pub total_records: usize,
}

/// Optional filters applied while building an `AmountDistribution`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DistributionFilters {
    /// Drop amounts seen fewer times than this.
    pub min_amount_count: Option<usize>,
    /// Drop amounts seen more times than this.
    pub max_amount_count: Option<usize>,
    /// Keep only records whose rating is strictly greater than this.
    pub min_rating: Option<f64>,
}

/// Server-side filters for the loan-offer API.
///
/// Values are passed through verbatim; empty values are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiParams {
    pub amount_min: String,
    pub amount_max: String,
    pub period_days_min: String,
    pub period_days_max: String,
    pub rating_min: String,
}

impl ApiParams {
    pub fn to_query_params(&self) -> BTreeMap<String, String> {
        [
            ("amount_min", &self.amount_min),
            ("amount_max", &self.amount_max),
            ("period_days_min", &self.period_days_min),
            ("period_days_max", &self.period_days_max),
            ("rating_min", &self.rating_min),
        ]
        .into_iter()
        .filter_map(|(key, value)| {
            let value = value.trim();
            (!value.is_empty()).then(|| (key.to_string(), value.to_string()))
        })
        .collect()
    }
}

/// Tabular report with alias-renamed headers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableReport {
    /// Column names as produced by the report engine.
    pub columns: Vec<String>,
    /// Display headers (`columns` after alias substitution).
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Value>>,
    pub rows_count: usize,
}

/// Output of the interest/yield calculator.
///
/// Every field is `"-"` when the inputs cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Calculation {
    pub income_with_commission: String,
    pub income_without_commission: String,
    pub real_annual_yield: String,
}
