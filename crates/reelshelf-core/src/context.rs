//! Page-lifetime application context.
//!
//! # Design
//! - Built once at startup and handed to components; replaces module-level
//!   singletons for the cache, the watched engine and preferences.
//! - Cloning is cheap: every service is reference counted or a thin handle
//!   around the shared store.

use crate::config::ShelfConfig;
use crate::fetch::{CatalogService, Clock, FetchCache, Sleeper, Transport};
use crate::preferences::Preferences;
use crate::storage::{KeyValueStore, PersistentStore};
use crate::watched::WatchedState;
use std::rc::Rc;

/// Platform services the engine runs on.
#[derive(Clone)]
pub struct Platform {
    /// Durable key-value backend.
    pub store: Rc<dyn KeyValueStore>,
    /// HTTP transport.
    pub transport: Rc<dyn Transport>,
    /// Millisecond clock.
    pub clock: Rc<dyn Clock>,
    /// Timer used for request timeouts.
    pub sleeper: Rc<dyn Sleeper>,
}

/// Shared services for one page.
#[derive(Clone, Debug)]
pub struct AppContext {
    /// Active configuration.
    pub config: Rc<ShelfConfig>,
    /// JSON storage adapter.
    pub store: PersistentStore,
    /// Watched-state engine.
    pub watched: WatchedState,
    /// Catalog loader over the shared fetch cache.
    pub catalogs: CatalogService,
    /// Viewer preferences.
    pub preferences: Preferences,
}

impl AppContext {
    /// Wire every service from `config` and `platform`.
    #[must_use]
    pub fn new(config: ShelfConfig, platform: Platform) -> Self {
        let store = PersistentStore::new(platform.store);
        let cache = Rc::new(FetchCache::new(
            platform.transport,
            platform.clock,
            platform.sleeper,
            config.fetch_settings(),
        ));
        Self {
            watched: WatchedState::new(store.clone()),
            preferences: Preferences::new(store.clone()),
            catalogs: CatalogService::new(cache, config.catalogs.clone()),
            store,
            config: Rc::new(config),
        }
    }

    /// Shared fetch cache.
    #[must_use]
    pub const fn cache(&self) -> &Rc<FetchCache> {
        self.catalogs.cache()
    }
}

impl PartialEq for AppContext {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.config, &other.config) && Rc::ptr_eq(self.cache(), other.cache())
    }
}
