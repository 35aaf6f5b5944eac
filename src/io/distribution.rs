//! Read/write distribution JSON files.
//!
//! The file is the chart payload (`labels`, `datasets`, `total_records`) plus a
//! little run metadata, so it can be fed to a charting front-end or re-plotted
//! with `lend plot`.

use std::fs::File;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{AmountDistribution, DistributionFilters};
use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionFile {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    #[serde(default)]
    pub min_amount_count: Option<usize>,
    #[serde(default)]
    pub max_amount_count: Option<usize>,
    #[serde(default)]
    pub min_rating: Option<f64>,
    #[serde(flatten)]
    pub distribution: AmountDistribution,
}

impl DistributionFile {
    pub fn new(distribution: AmountDistribution, filters: &DistributionFilters) -> Self {
        Self {
            tool: "lend".to_string(),
            generated_at: Utc::now(),
            min_amount_count: filters.min_amount_count,
            max_amount_count: filters.max_amount_count,
            min_rating: filters.min_rating,
            distribution,
        }
    }
}

/// Write a distribution JSON file.
pub fn write_distribution_json(
    path: &Path,
    distribution: &AmountDistribution,
    filters: &DistributionFilters,
) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(5, format!("Failed to create distribution JSON '{}': {e}", path.display()))
    })?;

    let doc = DistributionFile::new(distribution.clone(), filters);
    serde_json::to_writer_pretty(file, &doc)
        .map_err(|e| AppError::new(5, format!("Failed to write distribution JSON: {e}")))?;

    Ok(())
}

/// Read a distribution JSON file.
pub fn read_distribution_json(path: &Path) -> Result<DistributionFile, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(2, format!("Failed to open distribution JSON '{}': {e}", path.display()))
    })?;
    let doc: DistributionFile = serde_json::from_reader(file)
        .map_err(|e| AppError::new(2, format!("Invalid distribution JSON: {e}")))?;

    let n = doc.distribution.labels.len();
    if let Some(ds) = doc.distribution.datasets.iter().find(|ds| ds.data.len() != n) {
        return Err(AppError::new(
            2,
            format!(
                "Invalid distribution JSON: dataset '{}' has {} values for {n} labels.",
                ds.label,
                ds.data.len()
            ),
        ));
    }
    Ok(doc)
}
