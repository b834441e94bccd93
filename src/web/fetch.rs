//! `fetch` routed through the request throttle.
//!
//! API requests run one at a time with a fixed gap after each
//! completion; everything else goes straight to `window.fetch`.

use std::cell::RefCell;
use std::time::Duration;

use js_sys::{Function, Promise};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;
use web_time::Instant;

use crate::net::throttle::{RequestId, RequestThrottle, Submission};
use crate::options::NetworkOptions;

/// Poll interval while another request is in flight.
const POLL: Duration = Duration::from_millis(50);

thread_local! {
    static THROTTLE: RefCell<RequestThrottle> =
        RefCell::new(RequestThrottle::new(&NetworkOptions::default()));
}

/// Replace the page-wide throttle. Requests already queued are dropped.
pub(crate) fn configure(opts: &NetworkOptions) {
    THROTTLE.with(|t| *t.borrow_mut() = RequestThrottle::new(opts));
}

/// Fetch `url` and resolve to the response body text.
///
/// # Errors
///
/// Rejects on network failure or a non-2xx status.
#[wasm_bindgen(js_name = throttledFetch)]
pub async fn throttled_fetch(url: String) -> Result<JsValue, JsValue> {
    let submission = THROTTLE.with(|t| t.borrow_mut().submit(url));
    let id = match submission {
        Submission::PassThrough(url) => return fetch_text(&url).await,
        Submission::Queued(id) => id,
    };
    loop {
        match poll(id) {
            Ok(url) => {
                let result = fetch_text(&url).await;
                let _ = THROTTLE
                    .with(|t| t.borrow_mut().complete(id, Instant::now()));
                return result;
            }
            Err(wait) => sleep(wait).await?,
        }
    }
}

/// The URL to fetch if `id` is ready now, otherwise how long to wait.
fn poll(id: RequestId) -> Result<String, Duration> {
    THROTTLE.with(|t| {
        let mut t = t.borrow_mut();
        let now = Instant::now();
        if t.front() == Some(id) {
            if let Some(request) = t.next_ready(now) {
                return Ok(request.url);
            }
        }
        Err(t.wait_time(now).filter(|w| !w.is_zero()).unwrap_or(POLL))
    })
}

async fn fetch_text(url: &str) -> Result<JsValue, JsValue> {
    let window =
        web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let response: Response =
        JsFuture::from(window.fetch_with_str(url)).await?.dyn_into()?;
    if !response.ok() {
        return Err(JsValue::from_str(&format!(
            "{url}: HTTP {}",
            response.status()
        )));
    }
    JsFuture::from(response.text()?).await
}

async fn sleep(duration: Duration) -> Result<(), JsValue> {
    let ms = duration.as_millis().min(i32::MAX as u128) as i32;
    let promise = Promise::new(&mut |resolve: Function, _reject| {
        let scheduled = web_sys::window().and_then(|w| {
            w.set_timeout_with_callback_and_timeout_and_arguments_0(
                &resolve, ms,
            )
            .ok()
        });
        if scheduled.is_none() {
            let _ = resolve.call0(&JsValue::NULL);
        }
    });
    let _ = JsFuture::from(promise).await?;
    Ok(())
}
