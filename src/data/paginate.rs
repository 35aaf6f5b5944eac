//! Paginated retrieval of a whole collection.
//!
//! Strategy:
//!
//! 1. Page 1 is always requested first. An empty page 1 ends the run.
//! 2. If page 1 carries usable pagination metadata, pages `2..=total` are
//!    fetched concurrently on a small worker pool. A failed page contributes
//!    nothing and is recorded in `PagedItems::skipped_pages`.
//! 3. Otherwise pages are scanned one by one until an empty or short page.
//!    A failure ends the scan; what was collected so far is kept.
//!
//! A response body that is not JSON counts as a page with no records.
//!
//! Pages are always concatenated in ascending page order.

use std::collections::BTreeMap;

use log::{debug, info, warn};
use rayon::prelude::*;
use reqwest::Url;
use serde_json::Value;

use crate::data::http::{Endpoint, FetchError, JsonFetcher};
use crate::data::items::extract_items;
use crate::domain::RawRecord;

/// Records requested per page.
pub const PAGE_SIZE: usize = 100;

/// Hard stop for runaway pagination.
pub const MAX_PAGES: u32 = 1000;

/// Upper bound on concurrent page requests.
pub const MAX_WORKERS: usize = 8;

const TOTAL_PAGES_KEYS: [&str; 3] = ["total_pages", "pages", "page_count"];
const TOTAL_COUNT_KEYS: [&str; 4] = ["count", "total", "total_count", "items_count"];

/// Pagination metadata found in the page-1 response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationHint {
    /// The response states the number of pages.
    Pages(u32),
    /// The response states the number of records.
    Count(u64),
    Unrecognized,
}

impl PaginationHint {
    /// Inspect `response.pagination` for a page count or record count.
    ///
    /// Only JSON integers are accepted; a page count must be positive.
    pub fn from_response(raw: &Value) -> Self {
        let Some(pagination) = raw.get("pagination").and_then(Value::as_object) else {
            return PaginationHint::Unrecognized;
        };

        for key in TOTAL_PAGES_KEYS {
            if let Some(pages) = pagination.get(key).and_then(Value::as_u64) {
                if pages > 0 {
                    return PaginationHint::Pages(u32::try_from(pages).unwrap_or(u32::MAX));
                }
            }
        }

        for key in TOTAL_COUNT_KEYS {
            if let Some(count) = pagination.get(key).and_then(Value::as_u64) {
                return PaginationHint::Count(count);
            }
        }

        PaginationHint::Unrecognized
    }

    /// Total number of pages, if it can be inferred.
    pub fn total_pages(self, page_size: usize) -> Option<u32> {
        match self {
            PaginationHint::Pages(pages) => Some(pages),
            PaginationHint::Count(count) => {
                let pages = count.div_ceil(page_size.max(1) as u64).max(1);
                Some(u32::try_from(pages).unwrap_or(u32::MAX))
            }
            PaginationHint::Unrecognized => None,
        }
    }
}

/// Every record of a collection plus how complete the retrieval was.
#[derive(Debug, Default)]
pub struct PagedItems {
    pub items: Vec<RawRecord>,
    /// Pages that returned a response (including empty ones).
    pub pages_fetched: u32,
    /// Pages whose request failed during the concurrent fan-out.
    pub skipped_pages: Vec<u32>,
    /// Failure that ended a sequential scan early.
    pub scan_error: Option<FetchError>,
}

impl PagedItems {
    pub fn is_complete(&self) -> bool {
        self.skipped_pages.is_empty() && self.scan_error.is_none()
    }
}

/// Fetch every page of the collection at `base_url`.
///
/// Errors are only returned when page 1 cannot be fetched or the URL is
/// unusable; later failures degrade as described in the module docs.
pub fn fetch_all<F>(
    fetcher: &F,
    base_url: &str,
    base_params: &BTreeMap<String, String>,
    ignore_tls: bool,
) -> Result<PagedItems, FetchError>
where
    F: JsonFetcher + ?Sized,
{
    let endpoint = Endpoint::parse(base_url)?;
    let pager = Pager {
        fetcher,
        endpoint,
        base_params,
        verify_tls: !ignore_tls,
    };
    pager.run()
}

struct Pager<'a, F: ?Sized> {
    fetcher: &'a F,
    endpoint: Endpoint,
    base_params: &'a BTreeMap<String, String>,
    verify_tls: bool,
}

impl<F> Pager<'_, F>
where
    F: JsonFetcher + ?Sized,
{
    fn run(&self) -> Result<PagedItems, FetchError> {
        let first_raw = self.fetch_raw(1)?;
        let first_items = extract_items(&first_raw);

        let mut out = PagedItems {
            pages_fetched: 1,
            ..PagedItems::default()
        };
        if first_items.is_empty() {
            debug!("Page 1 is empty; nothing to fetch.");
            return Ok(out);
        }
        out.items = first_items;

        match PaginationHint::from_response(&first_raw).total_pages(PAGE_SIZE) {
            Some(total) if total > 1 => {
                let total = if total > MAX_PAGES {
                    warn!("Pagination reports {total} pages; capping at {MAX_PAGES}.");
                    MAX_PAGES
                } else {
                    total
                };
                info!("Fetching pages 2..={total} concurrently.");
                self.fetch_fan_out(total, &mut out)?;
            }
            _ => {
                debug!("Total page count unknown; scanning sequentially.");
                self.scan_sequential(&mut out);
            }
        }

        Ok(out)
    }

    fn fetch_fan_out(&self, total: u32, out: &mut PagedItems) -> Result<(), FetchError> {
        let pages: Vec<u32> = (2..=total).collect();
        let workers = MAX_WORKERS.min(pages.len()).max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .map_err(|e| FetchError::WorkerPool(e.to_string()))?;

        // Slot `i` belongs to page `i + 2`; `collect` keeps input order no
        // matter which request finishes first.
        let slots: Vec<Result<Vec<RawRecord>, FetchError>> =
            pool.install(|| pages.par_iter().map(|&page| self.fetch_page(page)).collect());

        for (page, slot) in pages.into_iter().zip(slots) {
            match slot {
                Ok(items) => {
                    out.pages_fetched += 1;
                    out.items.extend(items);
                }
                Err(err) => {
                    warn!("Skipping page {page}: {err}");
                    out.skipped_pages.push(page);
                }
            }
        }
        Ok(())
    }

    fn scan_sequential(&self, out: &mut PagedItems) {
        for page in 2..=MAX_PAGES {
            let items = match self.fetch_page(page) {
                Ok(items) => items,
                Err(err) => {
                    warn!("Stopping page scan at page {page}: {err}");
                    out.scan_error = Some(err);
                    return;
                }
            };
            out.pages_fetched += 1;

            if items.is_empty() {
                return;
            }
            let short_page = items.len() < PAGE_SIZE;
            out.items.extend(items);
            if short_page {
                return;
            }
        }
        warn!("Page scan reached the {MAX_PAGES}-page limit.");
    }

    fn fetch_page(&self, page: u32) -> Result<Vec<RawRecord>, FetchError> {
        self.fetch_raw(page).map(|raw| extract_items(&raw))
    }

    /// A body that is not JSON reads as a page without records.
    fn fetch_raw(&self, page: u32) -> Result<Value, FetchError> {
        let url: Url = self.endpoint.page_url(self.base_params, page, PAGE_SIZE);
        match self.fetcher.fetch_json(&url, self.verify_tls) {
            Err(err @ FetchError::Decode { .. }) => {
                warn!("Treating page {page} as empty: {err}");
                Ok(Value::Null)
            }
            other => other,
        }
    }
}
