//! Where loan offers come from: a local JSON export or the remote API.

use std::collections::BTreeMap;
use std::path::Path;

use log::info;

use crate::data::http::{Endpoint, FetchError, JsonFetcher};
use crate::data::items::load_items_from_file;
use crate::data::paginate::{PagedItems, fetch_all};
use crate::domain::{ApiParams, RawRecord};
use crate::error::AppError;

/// Offer status requested when the caller does not pick one.
pub const DEFAULT_STATUS: &str = "active";

pub struct ItemSource<F> {
    fetcher: F,
}

impl<F: JsonFetcher> ItemSource<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    pub fn load_from_file(&self, path: &Path) -> Result<Vec<RawRecord>, AppError> {
        let items = load_items_from_file(path)?;
        info!("Loaded {} records from {}", items.len(), path.display());
        Ok(items)
    }

    /// Fetch offers matching the API filters.
    ///
    /// `status` falls back to a `status` already in `base_url`, then to
    /// [`DEFAULT_STATUS`].
    pub fn fetch_filtered(
        &self,
        base_url: &str,
        api_params: &ApiParams,
        status: Option<&str>,
        ignore_tls: bool,
    ) -> Result<PagedItems, FetchError> {
        let mut params = api_params.to_query_params();
        match status.map(str::trim).filter(|s| !s.is_empty()) {
            Some(status) => {
                params.insert("status".to_string(), status.to_string());
            }
            None => {
                if !Endpoint::parse(base_url)?.params.contains_key("status") {
                    params.insert("status".to_string(), DEFAULT_STATUS.to_string());
                }
            }
        }
        self.fetch(base_url, &params, ignore_tls)
    }

    /// Fetch every offer without server-side filtering.
    pub fn fetch_unfiltered(&self, base_url: &str, ignore_tls: bool) -> Result<PagedItems, FetchError> {
        self.fetch(base_url, &BTreeMap::new(), ignore_tls)
    }

    fn fetch(
        &self,
        base_url: &str,
        params: &BTreeMap<String, String>,
        ignore_tls: bool,
    ) -> Result<PagedItems, FetchError> {
        let paged = fetch_all(&self.fetcher, base_url, params, ignore_tls)?;
        info!(
            "Fetched {} records from {} page(s) of {base_url}",
            paged.items.len(),
            paged.pages_fetched
        );
        Ok(paged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Url;
    use serde_json::{Value, json};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<Url>>);

    impl JsonFetcher for Recorder {
        fn fetch_json(&self, url: &Url, _verify_tls: bool) -> Result<Value, FetchError> {
            self.0.lock().unwrap().push(url.clone());
            let first = url.query_pairs().any(|(k, v)| k == "page" && v == "1");
            if first {
                Ok(json!({"results": [{"amount": 1}]}))
            } else {
                Ok(json!({"results": []}))
            }
        }
    }

    fn query_of(url: &Url) -> BTreeMap<String, String> {
        url.query_pairs().into_owned().collect()
    }

    #[test]
    fn filtered_fetch_defaults_status_to_active() {
        let recorder = Recorder::default();
        let source = ItemSource::new(&recorder);
        let params = ApiParams {
            period_days_max: "30".to_string(),
            ..ApiParams::default()
        };

        let paged = source
            .fetch_filtered("https://api.example.test/loans/", &params, None, false)
            .unwrap();
        assert_eq!(paged.items.len(), 1);

        let urls = recorder.0.lock().unwrap();
        let query = query_of(&urls[0]);
        assert_eq!(query.get("status").map(String::as_str), Some(DEFAULT_STATUS));
        assert_eq!(query.get("period_days_max").map(String::as_str), Some("30"));
        assert!(!query.contains_key("amount_min"));
    }

    #[test]
    fn filtered_fetch_honours_explicit_status() {
        let recorder = Recorder::default();
        let source = ItemSource::new(&recorder);
        source
            .fetch_filtered("https://api.example.test/loans/", &ApiParams::default(), Some("closed"), false)
            .unwrap();

        let urls = recorder.0.lock().unwrap();
        assert_eq!(query_of(&urls[0]).get("status").map(String::as_str), Some("closed"));
    }

    #[test]
    fn status_in_base_url_is_not_overridden() {
        let recorder = Recorder::default();
        let source = ItemSource::new(&recorder);
        source
            .fetch_filtered("https://api.example.test/loans/?status=closed", &ApiParams::default(), None, false)
            .unwrap();
        source
            .fetch_filtered("https://api.example.test/loans%3Fstatus%3Dfunded", &ApiParams::default(), None, false)
            .unwrap();

        let urls = recorder.0.lock().unwrap();
        assert_eq!(query_of(&urls[0]).get("status").map(String::as_str), Some("closed"));
        let last = urls.last().unwrap();
        assert_eq!(query_of(last).get("status").map(String::as_str), Some("funded"));
    }

    #[test]
    fn explicit_status_beats_base_url_status() {
        let recorder = Recorder::default();
        let source = ItemSource::new(&recorder);
        source
            .fetch_filtered("https://api.example.test/loans/?status=closed", &ApiParams::default(), Some("active"), false)
            .unwrap();

        let urls = recorder.0.lock().unwrap();
        assert_eq!(query_of(&urls[0]).get("status").map(String::as_str), Some("active"));
    }

    #[test]
    fn unfiltered_fetch_sends_only_paging() {
        let recorder = Recorder::default();
        let source = ItemSource::new(&recorder);
        source.fetch_unfiltered("https://api.example.test/loans/", false).unwrap();

        let urls = recorder.0.lock().unwrap();
        let keys: Vec<String> = query_of(&urls[0]).into_keys().collect();
        assert_eq!(keys, vec!["page".to_string(), "page_size".to_string()]);
    }
}
