//! Remote JSON fetch with a time-bounded memo cache.
//!
//! # Design
//! - Entries are keyed by `"{url}-{options as JSON}"` and are fresh while
//!   `now - fetched_at < expiry`.
//! - Every request races the configured timeout; losing the race drops the
//!   transport future, which aborts the underlying browser fetch.
//! - Concurrent misses for the same key are coalesced behind a per-key async
//!   lock; the waiter re-checks the cache before issuing its own request.
//! - The platform plugs in through [`Transport`], [`Clock`] and [`Sleeper`].
//!   They are `?Send` because the browser implementations hold JS handles.

use crate::catalog::{CatalogItem, CatalogKind, decode_catalog};
use crate::config::CatalogUrls;
use crate::error::{FetchError, TransportError};
use async_trait::async_trait;
use futures_util::future::{self, Either};
use futures_util::lock::Mutex;
use serde::Serialize;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::Rc;
use tracing::debug;

/// Default freshness window for cached responses.
pub const DEFAULT_CACHE_EXPIRY_MS: u64 = 5 * 60 * 1000;
/// Default abort timeout for a single request.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

/// Top-level JSON shape a caller is willing to accept.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExpectedShape {
    /// Only a JSON array.
    Array,
    /// An array or an object (including `null`).
    #[default]
    ArrayOrObject,
}

impl ExpectedShape {
    fn accepts(self, value: &Value) -> bool {
        match self {
            Self::Array => value.is_array(),
            Self::ArrayOrObject => value.is_array() || value.is_object() || value.is_null(),
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Array => "array",
            Self::ArrayOrObject => "array or object",
        }
    }
}

/// Per-request options. Headers participate in the cache key; the expected
/// shape does not.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FetchOptions {
    /// Extra request headers.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    /// Accepted top-level shape of the decoded body.
    #[serde(skip)]
    pub expect: ExpectedShape,
}

impl FetchOptions {
    /// Options that only accept a JSON array.
    #[must_use]
    pub fn array() -> Self {
        Self {
            expect: ExpectedShape::Array,
            ..Self::default()
        }
    }

    /// Add a request header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// Outgoing GET request handed to the transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpRequest {
    /// Absolute or page-relative URL.
    pub url: String,
    /// Request headers.
    pub headers: BTreeMap<String, String>,
}

/// Response as seen by the cache: status plus undecoded body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body text.
    pub body: String,
}

impl RawResponse {
    /// Whether the status is in the 2xx range.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Issues HTTP GET requests.
#[async_trait(?Send)]
pub trait Transport {
    /// Perform `request`. Dropping the returned future must cancel it.
    async fn get(&self, request: &HttpRequest) -> Result<RawResponse, TransportError>;
}

/// Wall-clock source in milliseconds.
pub trait Clock {
    /// Current time in milliseconds since an arbitrary fixed origin.
    fn now_ms(&self) -> u64;
}

/// Timer used to bound requests.
#[async_trait(?Send)]
pub trait Sleeper {
    /// Resolve after `ms` milliseconds.
    async fn sleep(&self, ms: u64);
}

/// Tunables for [`FetchCache`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchSettings {
    /// Freshness window for cached entries.
    pub expiry_ms: u64,
    /// Abort timeout per request.
    pub timeout_ms: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            expiry_ms: DEFAULT_CACHE_EXPIRY_MS,
            timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

#[derive(Clone, Debug)]
struct CacheEntry {
    data: Value,
    fetched_at_ms: u64,
}

/// Memoizing JSON fetcher shared by every page section.
pub struct FetchCache {
    transport: Rc<dyn Transport>,
    clock: Rc<dyn Clock>,
    sleeper: Rc<dyn Sleeper>,
    settings: FetchSettings,
    entries: RefCell<HashMap<String, CacheEntry>>,
    inflight: RefCell<HashMap<String, Rc<Mutex<()>>>>,
}

impl fmt::Debug for FetchCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchCache")
            .field("settings", &self.settings)
            .field("entries", &self.entries.borrow().len())
            .finish_non_exhaustive()
    }
}

impl FetchCache {
    /// Build a cache over the given platform seams.
    #[must_use]
    pub fn new(
        transport: Rc<dyn Transport>,
        clock: Rc<dyn Clock>,
        sleeper: Rc<dyn Sleeper>,
        settings: FetchSettings,
    ) -> Self {
        Self {
            transport,
            clock,
            sleeper,
            settings,
            entries: RefCell::new(HashMap::new()),
            inflight: RefCell::new(HashMap::new()),
        }
    }

    /// Active settings.
    #[must_use]
    pub const fn settings(&self) -> FetchSettings {
        self.settings
    }

    /// Number of memoized responses, fresh or stale.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether nothing is memoized.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Fetch `url` and decode its JSON body, serving a fresh memoized copy
    /// when one exists.
    ///
    /// # Errors
    /// - [`FetchError::Http`] for a non-2xx status.
    /// - [`FetchError::InvalidJson`] when the body does not decode.
    /// - [`FetchError::UnexpectedShape`] when the decoded value has the wrong
    ///   top-level shape.
    /// - [`FetchError::TimedOut`] when the request outlives the timeout.
    /// - [`FetchError::Network`] when the transport fails.
    pub async fn fetch_data(&self, url: &str, options: &FetchOptions) -> Result<Value, FetchError> {
        let key = cache_key(url, options);
        if let Some(data) = self.fresh(&key) {
            debug!(url, "fetch cache hit");
            return Ok(data);
        }

        let lock = self.inflight_lock(&key);
        let result = {
            let _guard = lock.lock().await;
            if let Some(data) = self.fresh(&key) {
                debug!(url, "fetch coalesced with in-flight request");
                Ok(data)
            } else {
                self.fetch_uncached(url, options, &key).await
            }
        };
        self.release_inflight(&key, &lock);
        result
    }

    /// Evict every entry older than the expiry window. Returns the number of
    /// evicted entries.
    pub fn sweep_expired(&self) -> usize {
        let now = self.clock.now_ms();
        let expiry = self.settings.expiry_ms;
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|_, entry| now.saturating_sub(entry.fetched_at_ms) <= expiry);
        let evicted = before - entries.len();
        if evicted > 0 {
            debug!(evicted, "swept expired fetch cache entries");
        }
        evicted
    }

    /// Drop every memoized response.
    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }

    fn fresh(&self, key: &str) -> Option<Value> {
        let now = self.clock.now_ms();
        self.entries
            .borrow()
            .get(key)
            .filter(|entry| now.saturating_sub(entry.fetched_at_ms) < self.settings.expiry_ms)
            .map(|entry| entry.data.clone())
    }

    fn inflight_lock(&self, key: &str) -> Rc<Mutex<()>> {
        Rc::clone(
            self.inflight
                .borrow_mut()
                .entry(key.to_string())
                .or_insert_with(|| Rc::new(Mutex::new(()))),
        )
    }

    fn release_inflight(&self, key: &str, lock: &Rc<Mutex<()>>) {
        // Map slot plus our clone means no other caller is queued.
        if Rc::strong_count(lock) <= 2 {
            self.inflight.borrow_mut().remove(key);
        }
    }

    async fn fetch_uncached(
        &self,
        url: &str,
        options: &FetchOptions,
        key: &str,
    ) -> Result<Value, FetchError> {
        debug!(url, "fetch cache miss");
        let request = HttpRequest {
            url: url.to_string(),
            headers: options.headers.clone(),
        };
        let response = {
            let send = self.transport.get(&request);
            let timeout = self.sleeper.sleep(self.settings.timeout_ms);
            match future::select(send, timeout).await {
                Either::Left((response, _)) => response?,
                Either::Right(((), _)) => {
                    debug!(url, timeout_ms = self.settings.timeout_ms, "fetch timed out");
                    return Err(FetchError::TimedOut);
                }
            }
        };

        if !response.is_success() {
            return Err(FetchError::Http {
                status: response.status,
            });
        }
        let data: Value =
            serde_json::from_str(&response.body).map_err(|_| FetchError::InvalidJson)?;
        if !options.expect.accepts(&data) {
            return Err(FetchError::UnexpectedShape {
                expected: options.expect.label(),
            });
        }

        self.entries.borrow_mut().insert(
            key.to_string(),
            CacheEntry {
                data: data.clone(),
                fetched_at_ms: self.clock.now_ms(),
            },
        );
        Ok(data)
    }
}

/// Cache key for a request: the URL, a dash, then the options as JSON.
#[must_use]
pub fn cache_key(url: &str, options: &FetchOptions) -> String {
    let encoded = serde_json::to_string(options).unwrap_or_else(|_| String::from("{}"));
    format!("{url}-{encoded}")
}

/// Loads and decodes the configured catalogs.
#[derive(Clone, Debug)]
pub struct CatalogService {
    cache: Rc<FetchCache>,
    urls: CatalogUrls,
}

impl CatalogService {
    /// Service over a shared cache.
    #[must_use]
    pub const fn new(cache: Rc<FetchCache>, urls: CatalogUrls) -> Self {
        Self { cache, urls }
    }

    /// Shared fetch cache.
    #[must_use]
    pub const fn cache(&self) -> &Rc<FetchCache> {
        &self.cache
    }

    /// Configured source URL for `kind`.
    #[must_use]
    pub fn url(&self, kind: CatalogKind) -> &str {
        self.urls.url(kind)
    }

    /// Fetch and decode one catalog. The payload must be a JSON array.
    ///
    /// # Errors
    /// Propagates [`FetchError`] from [`FetchCache::fetch_data`].
    pub async fn load(&self, kind: CatalogKind) -> Result<Vec<CatalogItem>, FetchError> {
        let data = self
            .cache
            .fetch_data(self.urls.url(kind), &FetchOptions::array())
            .await?;
        Ok(decode_catalog(&data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_options_key_matches_empty_object() {
        assert_eq!(
            cache_key("./data/movie_data.json", &FetchOptions::default()),
            "./data/movie_data.json-{}"
        );
        assert_eq!(
            cache_key("./a.json", &FetchOptions::array()),
            cache_key("./a.json", &FetchOptions::default())
        );
    }

    #[test]
    fn header_order_does_not_change_key() {
        let first = FetchOptions::default()
            .with_header("b", "2")
            .with_header("a", "1");
        let second = FetchOptions::default()
            .with_header("a", "1")
            .with_header("b", "2");
        assert_eq!(cache_key("u", &first), cache_key("u", &second));
        assert_eq!(cache_key("u", &first), r#"u-{"headers":{"a":"1","b":"2"}}"#);
    }

    #[test]
    fn shape_checks() {
        assert!(ExpectedShape::Array.accepts(&json!([])));
        assert!(!ExpectedShape::Array.accepts(&json!({})));
        assert!(ExpectedShape::ArrayOrObject.accepts(&json!({})));
        assert!(!ExpectedShape::ArrayOrObject.accepts(&json!("text")));
        assert!(!ExpectedShape::ArrayOrObject.accepts(&json!(3)));
    }

    #[test]
    fn success_range_is_2xx() {
        let ok = RawResponse {
            status: 204,
            body: String::new(),
        };
        let moved = RawResponse {
            status: 301,
            body: String::new(),
        };
        assert!(ok.is_success());
        assert!(!moved.is_success());
    }
}
