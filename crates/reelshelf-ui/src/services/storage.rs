//! `localStorage` backend.

use reelshelf_core::error::StorageError;
use reelshelf_core::storage::{KeyValueStore, MemoryStore};
use std::rc::Rc;
use tracing::warn;
use wasm_bindgen::JsValue;
use web_sys::Storage;

/// Origin-scoped `localStorage`, shared by every tab of the site.
#[derive(Clone, Debug)]
pub struct BrowserStore {
    storage: Storage,
}

impl BrowserStore {
    /// Open the window's `localStorage`, if the browser grants access.
    #[must_use]
    pub fn open() -> Option<Self> {
        let storage = web_sys::window()?.local_storage().ok().flatten()?;
        Some(Self { storage })
    }
}

impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage.get_item(key).map_err(backend_error)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage.set_item(key, value).map_err(|err| {
            if is_quota_error(&err) {
                StorageError::QuotaExceeded {
                    key: key.to_string(),
                }
            } else {
                backend_error(err)
            }
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.storage.remove_item(key).map_err(backend_error)
    }
}

/// `localStorage` when available, otherwise a page-lifetime memory store.
#[must_use]
pub fn browser_store() -> Rc<dyn KeyValueStore> {
    match BrowserStore::open() {
        Some(store) => Rc::new(store),
        None => {
            warn!("localStorage unavailable; watched state will not persist");
            Rc::new(MemoryStore::new())
        }
    }
}

fn backend_error(err: JsValue) -> StorageError {
    StorageError::Backend {
        detail: js_detail(&err),
    }
}

fn is_quota_error(err: &JsValue) -> bool {
    js_detail(err).contains("QuotaExceeded")
}

pub(crate) fn js_detail(err: &JsValue) -> String {
    err.as_string()
        .or_else(|| {
            js_sys::Reflect::get(err, &JsValue::from_str("name"))
                .ok()
                .and_then(|name| name.as_string())
        })
        .unwrap_or_else(|| format!("{err:?}"))
}
