//! Wall clock and timers.

use async_trait::async_trait;
use gloo_timers::future::TimeoutFuture;
use js_sys::Date;
use reelshelf_core::fetch::{Clock, Sleeper};

/// Milliseconds since the Unix epoch from `Date.now()`.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsClock;

impl Clock for JsClock {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn now_ms(&self) -> u64 {
        Date::now() as u64
    }
}

/// `setTimeout`-backed sleeper.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserSleeper;

#[async_trait(?Send)]
impl Sleeper for BrowserSleeper {
    async fn sleep(&self, ms: u64) {
        TimeoutFuture::new(u32::try_from(ms).unwrap_or(u32::MAX)).await;
    }
}
