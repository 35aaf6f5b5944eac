//! Loan-offer acquisition: HTTP JSON access, item extraction and pagination.

pub mod http;
pub mod items;
pub mod paginate;
pub mod source;

pub use http::{Endpoint, FetchError, HttpFetcher, JsonFetcher, build_query_url};
pub use items::{extract_items, load_items_from_file};
pub use paginate::{MAX_PAGES, MAX_WORKERS, PAGE_SIZE, PagedItems, PaginationHint, fetch_all};
pub use source::{DEFAULT_STATUS, ItemSource};
