//! Shared report/statistics workflows.
//!
//! Each run returns an explicit result object (data + status line); the
//! caller decides what to keep and for how long. Nothing here holds state
//! between runs.
//!
//! - table: file or API -> records -> report engine -> aliased headers
//! - statistics: API (unfiltered) -> records -> amount distribution

use std::path::Path;

use log::warn;

use crate::data::{ItemSource, JsonFetcher, PagedItems};
use crate::domain::{AmountDistribution, ApiParams, DistributionFilters, TableReport};
use crate::error::AppError;
use crate::report::{ReportEngine, build_table, format_fetch_notes};
use crate::stats::build_distribution;

/// Which workflow produced a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunKind {
    Table,
    Statistics,
}

/// Output of a table run.
#[derive(Debug, Clone)]
pub struct TableRun {
    pub report: TableReport,
    /// Set when some API pages could not be retrieved.
    pub fetch_note: Option<String>,
    pub status: String,
}

/// Output of a statistics run.
#[derive(Debug, Clone)]
pub struct DistributionRun {
    pub distribution: AmountDistribution,
    pub filters: DistributionFilters,
    pub fetch_note: Option<String>,
    pub status: String,
}

/// API request for a table run.
#[derive(Debug, Clone, Copy)]
pub struct ApiQuery<'a> {
    pub base_url: &'a str,
    pub params: &'a ApiParams,
    pub status: Option<&'a str>,
    pub ignore_tls: bool,
}

pub fn run_table_from_file<F, E>(
    source: &ItemSource<F>,
    engine: &E,
    path: &Path,
    aliases: &str,
) -> Result<TableRun, AppError>
where
    F: JsonFetcher,
    E: ReportEngine + ?Sized,
{
    let items = source.load_from_file(path)?;
    let report = build_table(engine, &items, aliases)?;
    Ok(TableRun {
        status: table_status(&report),
        report,
        fetch_note: None,
    })
}

pub fn run_table_from_api<F, E>(
    source: &ItemSource<F>,
    engine: &E,
    query: ApiQuery<'_>,
    aliases: &str,
) -> Result<TableRun, AppError>
where
    F: JsonFetcher,
    E: ReportEngine + ?Sized,
{
    let paged = source.fetch_filtered(query.base_url, query.params, query.status, query.ignore_tls)?;
    let fetch_note = incomplete_note(&paged);
    let report = build_table(engine, &paged.items, aliases)?;
    Ok(TableRun {
        status: table_status(&report),
        report,
        fetch_note,
    })
}

pub fn run_distribution<F: JsonFetcher>(
    source: &ItemSource<F>,
    base_url: &str,
    ignore_tls: bool,
    filters: DistributionFilters,
) -> Result<DistributionRun, AppError> {
    let paged = source.fetch_unfiltered(base_url, ignore_tls)?;
    let fetch_note = incomplete_note(&paged);
    let distribution = build_distribution(&paged.items, &filters);
    Ok(DistributionRun {
        status: format!("Statistics built. Records: {}", distribution.total_records),
        distribution,
        filters,
        fetch_note,
    })
}

/// Status line for a failed run.
pub fn failure_status(kind: RunKind, err: &AppError) -> String {
    match kind {
        RunKind::Table => format!("Error: {err}"),
        RunKind::Statistics => format!("Statistics error: {err}"),
    }
}

fn table_status(report: &TableReport) -> String {
    format!("Rows: {}", report.rows_count)
}

fn incomplete_note(paged: &PagedItems) -> Option<String> {
    let note = format_fetch_notes(paged)?;
    warn!("{note}");
    Some(note)
}
