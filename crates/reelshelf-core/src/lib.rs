#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::future_not_send)]
//! DOM-free engine for the Reelshelf catalog front-end.
//!
//! Everything in this crate compiles and tests on the native target; the
//! browser specifics (storage, fetch, timers) plug in through the traits in
//! [`storage`] and [`fetch`].

pub mod catalog;
pub mod config;
pub mod context;
pub mod detail;
pub mod error;
pub mod fetch;
pub mod gallery;
pub mod preferences;
pub mod sidebar;
pub mod storage;
pub mod watched;

pub use catalog::{CatalogItem, CatalogKind, EpisodeRef, IndexedItem};
pub use config::ShelfConfig;
pub use context::{AppContext, Platform};
pub use error::{ConfigError, DetailError, FetchError, StorageError, TransportError};
pub use fetch::{CatalogService, FetchCache, FetchOptions};
pub use storage::{KeyValueStore, MemoryStore, PersistentStore};
pub use watched::WatchedState;
