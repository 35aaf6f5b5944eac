//! Amount distribution by period bucket.
//!
//! The output is shaped for a grouped bar chart: one label per distinct
//! amount and one count series per populated period bucket.

use std::collections::BTreeMap;

use crate::domain::{
    AmountDistribution, BucketKey, Dataset, DistributionFilters, ParsedRecord, RawRecord,
};

/// Amount rounded to whole cents; one key per distinct label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct AmountKey(i64);

impl AmountKey {
    fn new(amount: f64) -> Self {
        // `as` saturates on overflow; -0.0 rounds to 0.
        Self((amount * 100.0).round() as i64)
    }

    fn label(self) -> String {
        format!("{:.2}", self.0 as f64 / 100.0)
    }
}

/// Count records per amount and per (bucket, amount).
///
/// Records without a usable amount or period are ignored, as are records
/// failing the rating filter. Amount-count filters apply after counting.
pub fn build_distribution(items: &[RawRecord], filters: &DistributionFilters) -> AmountDistribution {
    let mut amount_totals: BTreeMap<AmountKey, usize> = BTreeMap::new();
    let mut bucket_counts: BTreeMap<BucketKey, BTreeMap<AmountKey, usize>> = BTreeMap::new();

    for item in items {
        let parsed = ParsedRecord::from_record(item);
        let (Some(amount), Some(period_days)) = (parsed.amount, parsed.period_days) else {
            continue;
        };
        if !parsed.passes_min_rating(filters.min_rating) {
            continue;
        }

        let amount = AmountKey::new(amount);
        *amount_totals.entry(amount).or_default() += 1;
        *bucket_counts
            .entry(BucketKey::for_period(period_days))
            .or_default()
            .entry(amount)
            .or_default() += 1;
    }

    let amounts: Vec<AmountKey> = amount_totals
        .iter()
        .filter(|&(_, &count)| keeps_count(count, filters))
        .map(|(&amount, _)| amount)
        .collect();

    let labels = amounts.iter().map(|a| a.label()).collect();

    // BTreeMap iteration yields the canonical bucket order.
    let datasets = bucket_counts
        .iter()
        .map(|(bucket, counts)| Dataset {
            label: bucket.label(),
            data: amounts
                .iter()
                .map(|a| counts.get(a).copied().unwrap_or(0))
                .collect(),
        })
        .collect();

    let total_records = amounts
        .iter()
        .map(|a| amount_totals.get(a).copied().unwrap_or(0))
        .sum();

    AmountDistribution {
        labels,
        datasets,
        total_records,
    }
}

fn keeps_count(count: usize, filters: &DistributionFilters) -> bool {
    filters.min_amount_count.is_none_or(|min| count >= min)
        && filters.max_amount_count.is_none_or(|max| count <= max)
}
