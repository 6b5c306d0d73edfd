//! `fetch`-backed transport.
//!
//! # Design
//! - Each request owns an `AbortController`; dropping the future (for example
//!   when the engine's timeout wins the race) aborts the underlying request.
//! - Bodies are read as text so the engine decides how to parse them.

use super::storage::js_detail;
use async_trait::async_trait;
use reelshelf_core::error::TransportError;
use reelshelf_core::fetch::{HttpRequest, RawResponse, Transport};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortController, Headers, Request, RequestInit, RequestMode, Response};

/// Transport over `window.fetch`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserTransport;

struct AbortOnDrop {
    controller: AbortController,
    done: bool,
}

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        if !self.done {
            self.controller.abort();
        }
    }
}

#[async_trait(?Send)]
impl Transport for BrowserTransport {
    async fn get(&self, request: &HttpRequest) -> Result<RawResponse, TransportError> {
        let window = web_sys::window().ok_or_else(|| TransportError::new("window unavailable"))?;
        let controller = AbortController::new().map_err(|err| TransportError::new(js_detail(&err)))?;
        let mut guard = AbortOnDrop {
            controller,
            done: false,
        };

        let init = RequestInit::new();
        init.set_method("GET");
        init.set_mode(RequestMode::Cors);
        init.set_signal(Some(&guard.controller.signal()));
        if !request.headers.is_empty() {
            let headers = Headers::new().map_err(|err| TransportError::new(js_detail(&err)))?;
            for (name, value) in &request.headers {
                headers
                    .set(name, value)
                    .map_err(|err| TransportError::new(js_detail(&err)))?;
            }
            init.set_headers(&headers);
        }

        let req = Request::new_with_str_and_init(&request.url, &init)
            .map_err(|err| TransportError::new(js_detail(&err)))?;
        let resp = JsFuture::from(window.fetch_with_request(&req))
            .await
            .map_err(|err| TransportError::new(js_detail(&err)))?;
        let response: Response = resp
            .dyn_into()
            .map_err(|_| TransportError::new("fetch returned a non-Response value"))?;
        let status = response.status();
        let text = response
            .text()
            .map_err(|err| TransportError::new(js_detail(&err)))?;
        let body = JsFuture::from(text)
            .await
            .map_err(|err| TransportError::new(js_detail(&err)))?
            .as_string()
            .unwrap_or_default();
        guard.done = true;
        Ok(RawResponse { status, body })
    }
}
