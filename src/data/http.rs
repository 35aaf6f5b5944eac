//! Blocking HTTP access to the loan-offer API.
//!
//! The paginated fetcher only depends on the `JsonFetcher` trait, so it can be
//! exercised against an in-memory fake in tests.

use std::collections::BTreeMap;
use std::time::Duration;

use log::debug;
use percent_encoding::percent_decode_str;
use reqwest::blocking::Client;
use reqwest::{StatusCode, Url};
use serde_json::Value;
use thiserror::Error;

use crate::error::AppError;

/// Failure of a single JSON request.
///
/// Every variant names the request that failed so it can be shown as-is.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Not found (HTTP 404): {url}")]
    NotFound { url: String },

    #[error("Request {url} failed with status {status}")]
    Status { url: String, status: u16 },

    #[error("Request {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Response from {url} is not valid JSON: {message}")]
    Decode { url: String, message: String },

    #[error("Invalid API URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    #[error("Failed to start page workers: {0}")]
    WorkerPool(String),
}

impl FetchError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound { .. })
    }
}

/// Fetch one URL and decode its body as JSON.
pub trait JsonFetcher: Sync {
    fn fetch_json(&self, url: &Url, verify_tls: bool) -> Result<Value, FetchError>;
}

impl<T: JsonFetcher + ?Sized> JsonFetcher for &T {
    fn fetch_json(&self, url: &Url, verify_tls: bool) -> Result<Value, FetchError> {
        (**self).fetch_json(url, verify_tls)
    }
}

/// `reqwest`-backed fetcher.
///
/// Holds one client per TLS mode so verification can be toggled per call.
pub struct HttpFetcher {
    verified: Client,
    unverified: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, AppError> {
        let verified = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::new(4, format!("Failed to build HTTP client: {e}")))?;
        let unverified = Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(|e| AppError::new(4, format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            verified,
            unverified,
        })
    }
}

impl JsonFetcher for HttpFetcher {
    fn fetch_json(&self, url: &Url, verify_tls: bool) -> Result<Value, FetchError> {
        let client = if verify_tls {
            &self.verified
        } else {
            &self.unverified
        };

        debug!("GET {url}");
        let resp = client.get(url.clone()).send().map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound {
                url: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = resp.text().map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })?;
        serde_json::from_str(&body).map_err(|e| FetchError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

/// A collection endpoint: normalized base URL plus parameters that were
/// embedded in the URL the caller supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub base: Url,
    pub params: BTreeMap<String, String>,
}

impl Endpoint {
    /// Normalize a user-supplied base URL.
    ///
    /// - percent-encoded paths are decoded (`loans%3Fstatus%3Dactive`)
    /// - a query string found in the path or the URL itself is hoisted into
    ///   `params`
    /// - the path always ends with `/`
    pub fn parse(raw: &str) -> Result<Self, FetchError> {
        let raw = raw.trim();
        let mut base = Url::parse(raw).map_err(|e| FetchError::InvalidUrl {
            url: raw.to_string(),
            message: e.to_string(),
        })?;

        let mut params: BTreeMap<String, String> = BTreeMap::new();

        let decoded_path = percent_decode_str(base.path()).decode_utf8_lossy().into_owned();
        let mut path = match decoded_path.split_once('?') {
            Some((path, embedded)) => {
                params.extend(split_query(embedded));
                path.to_string()
            }
            None => decoded_path,
        };

        // The real query string wins over one smuggled into the path.
        params.extend(base.query_pairs().into_owned());
        base.set_query(None);
        base.set_fragment(None);

        if !path.ends_with('/') {
            path.push('/');
        }
        base.set_path(&path);

        Ok(Self { base, params })
    }

    /// URL of one page, merging endpoint params, caller params and paging.
    pub fn page_url(&self, extra: &BTreeMap<String, String>, page: u32, page_size: usize) -> Url {
        let mut params = self.params.clone();
        params.extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));
        params.insert("page".to_string(), page.to_string());
        params.insert("page_size".to_string(), page_size.to_string());
        build_query_url(&self.base, &params)
    }
}

/// Append `params` to `base` as a query string (replacing any existing one).
pub fn build_query_url(base: &Url, params: &BTreeMap<String, String>) -> Url {
    let mut url = base.clone();
    url.set_query(None);
    if !params.is_empty() {
        url.query_pairs_mut().extend_pairs(params.iter());
    }
    url
}

fn split_query(query: &str) -> impl Iterator<Item = (String, String)> + '_ {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (k.to_string(), v.to_string()),
            None => (pair.to_string(), String::new()),
        })
        .filter(|(k, _)| !k.is_empty())
}
