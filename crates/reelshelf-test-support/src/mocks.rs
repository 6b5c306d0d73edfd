//! Fake platform services for driving the engine without a browser.

use async_trait::async_trait;
use reelshelf_core::error::{StorageError, TransportError};
use reelshelf_core::fetch::{Clock, HttpRequest, RawResponse, Sleeper, Transport};
use reelshelf_core::storage::KeyValueStore;
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::time::Duration;

/// Scripted outcome for one URL.
#[derive(Clone, Debug)]
pub enum Scripted {
    /// 200 with the JSON-encoded value as body.
    Json(Value),
    /// Arbitrary status and body.
    Raw {
        /// Status code.
        status: u16,
        /// Body text.
        body: String,
    },
    /// Transport failure before any response.
    Fail(String),
    /// Never resolves; only the timeout ends the request.
    Hang,
}

/// Transport answering from a per-URL script and recording every request.
#[derive(Debug, Default)]
pub struct FakeTransport {
    routes: RefCell<HashMap<String, Scripted>>,
    requests: RefCell<Vec<HttpRequest>>,
    delay_ms: Cell<u64>,
}

impl FakeTransport {
    /// Transport with no routes; unknown URLs answer 404.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the outcome for `url`, replacing any earlier script.
    pub fn route(&self, url: &str, outcome: Scripted) {
        self.routes.borrow_mut().insert(url.to_string(), outcome);
    }

    /// Answer `url` with a 200 JSON body.
    pub fn route_json(&self, url: &str, value: Value) {
        self.route(url, Scripted::Json(value));
    }

    /// Delay every response by `ms` of tokio time.
    pub fn set_delay_ms(&self, ms: u64) {
        self.delay_ms.set(ms);
    }

    /// Number of requests issued so far.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    /// Requests issued so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }
}

#[async_trait(?Send)]
impl Transport for FakeTransport {
    async fn get(&self, request: &HttpRequest) -> Result<RawResponse, TransportError> {
        self.requests.borrow_mut().push(request.clone());
        let outcome = self.routes.borrow().get(&request.url).cloned();
        let delay = self.delay_ms.get();
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        match outcome {
            Some(Scripted::Json(value)) => Ok(RawResponse {
                status: 200,
                body: value.to_string(),
            }),
            Some(Scripted::Raw { status, body }) => Ok(RawResponse { status, body }),
            Some(Scripted::Fail(detail)) => Err(TransportError::new(detail)),
            Some(Scripted::Hang) => std::future::pending().await,
            None => Ok(RawResponse {
                status: 404,
                body: String::new(),
            }),
        }
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: Cell<u64>,
}

impl ManualClock {
    /// Clock reading `start_ms`.
    #[must_use]
    pub const fn at(start_ms: u64) -> Self {
        Self {
            now_ms: Cell::new(start_ms),
        }
    }

    /// Move forward by `ms`.
    pub fn advance(&self, ms: u64) {
        self.now_ms.set(self.now_ms.get() + ms);
    }

    /// Jump to `ms`.
    pub fn set(&self, ms: u64) {
        self.now_ms.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms.get()
    }
}

/// Timer backed by tokio time, so paused-clock tests advance it instantly.
#[derive(Clone, Copy, Debug, Default)]
pub struct TokioSleeper;

#[async_trait(?Send)]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}

/// Store whose every operation fails, like a browser with storage disabled.
#[derive(Clone, Copy, Debug, Default)]
pub struct FailingStore;

impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable)
    }

    fn set(&self, key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::QuotaExceeded {
            key: key.to_string(),
        })
    }

    fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn fake_transport_records_and_answers() {
        let transport = FakeTransport::new();
        transport.route_json("/a.json", json!([1]));
        let request = HttpRequest {
            url: "/a.json".into(),
            headers: Default::default(),
        };
        let response = transport.get(&request).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.body, "[1]");

        let missing = HttpRequest {
            url: "/b.json".into(),
            headers: Default::default(),
        };
        assert_eq!(transport.get(&missing).await.unwrap().status, 404);
        assert_eq!(transport.request_count(), 2);
    }

    #[test]
    fn manual_clock_moves_only_when_told() {
        let clock = ManualClock::at(10);
        assert_eq!(clock.now_ms(), 10);
        clock.advance(5);
        assert_eq!(clock.now_ms(), 15);
        clock.set(1);
        assert_eq!(clock.now_ms(), 1);
    }

    #[test]
    fn failing_store_fails_everything() {
        assert_eq!(FailingStore.get("k"), Err(StorageError::Unavailable));
        assert!(FailingStore.set("k", "v").is_err());
    }
}
