//! Browser implementations of the engine's platform seams.
//!
//! # Design
//! - Each seam wraps the raw `web_sys` API and maps failures into the engine's
//!   error types; nothing here panics when an API is missing.
//! - Storage degrades to an in-memory map when the browser refuses access.

pub mod clock;
pub mod config;
pub mod storage;
pub mod transport;

use reelshelf_core::Platform;
use std::rc::Rc;

/// Platform services backed by the current window.
#[must_use]
pub fn browser_platform() -> Platform {
    Platform {
        store: storage::browser_store(),
        transport: Rc::new(transport::BrowserTransport),
        clock: Rc::new(clock::JsClock),
        sleeper: Rc::new(clock::BrowserSleeper),
    }
}
