//! Catalog payloads and a fully wired fake platform.

use crate::mocks::{FakeTransport, ManualClock, TokioSleeper};
use reelshelf_core::config::ShelfConfig;
use reelshelf_core::context::{AppContext, Platform};
use reelshelf_core::storage::MemoryStore;
use serde_json::{Value, json};
use std::rc::Rc;

/// Clock reading used by [`TestPlatform::new`].
pub const START_MS: u64 = 1_700_000_000_000;

/// Movie catalog with an untitled entry and a duplicate title.
#[must_use]
pub fn movies_json() -> Value {
    json!([
        {"title": "Blade Runner", "thumbnail": "br.jpg", "embed_link": "br.mp4",
         "description": "A **neo-noir** classic"},
        {"thumbnail": "untitled.jpg"},
        {"title": "Arrival", "video": "arrival.mp4"},
        {"title": "Arrival", "embed_link": "arrival-2.mp4"}
    ])
}

/// Season catalog; the second season has no episodes.
#[must_use]
pub fn seasons_json() -> Value {
    json!([
        {"title": "Dark S1", "thumbnail": "dark.jpg", "embed_links": [
            {"title": "Secrets", "embed_link": "dark-1.mp4", "thumbnail": "d1.jpg"},
            {"title": "Lies", "embed_link": "dark-2.mp4"},
            {"description": "Past and present"}
        ]},
        {"title": "Empty Season"}
    ])
}

/// Coming-soon catalog.
#[must_use]
pub fn coming_soon_json() -> Value {
    json!([
        {"title": "Dune Part Three", "trailer": "dune3.mp4"},
        {"title": "Untitled Project", "preview": "teaser.mp4"}
    ])
}

/// Fake platform whose pieces stay reachable for assertions.
#[derive(Debug)]
pub struct TestPlatform {
    /// Backing store.
    pub store: Rc<MemoryStore>,
    /// Scripted transport.
    pub transport: Rc<FakeTransport>,
    /// Manual clock starting at [`START_MS`].
    pub clock: Rc<ManualClock>,
}

impl Default for TestPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl TestPlatform {
    /// Empty store, no routes, clock at [`START_MS`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: Rc::new(MemoryStore::new()),
            transport: Rc::new(FakeTransport::new()),
            clock: Rc::new(ManualClock::at(START_MS)),
        }
    }

    /// Platform with the three default catalog URLs routed to the fixtures.
    #[must_use]
    pub fn with_catalogs() -> Self {
        let platform = Self::new();
        let urls = ShelfConfig::default().catalogs;
        platform.transport.route_json(&urls.movies, movies_json());
        platform.transport.route_json(&urls.seasons, seasons_json());
        platform
            .transport
            .route_json(&urls.coming_soon, coming_soon_json());
        platform
    }

    /// Engine-facing view of the fakes.
    #[must_use]
    pub fn platform(&self) -> Platform {
        Platform {
            store: self.store.clone(),
            transport: self.transport.clone(),
            clock: self.clock.clone(),
            sleeper: Rc::new(TokioSleeper),
        }
    }

    /// Context wired with default configuration.
    #[must_use]
    pub fn context(&self) -> AppContext {
        AppContext::new(ShelfConfig::default(), self.platform())
    }
}
