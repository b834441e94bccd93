//! Blocking HTTP client for the CLI.

use web_time::Instant;

use super::throttle::{RequestThrottle, Submission};
use crate::error::VizError;
use crate::options::NetworkOptions;

/// Fetches URLs with `ureq`, serializing API calls through a
/// [`RequestThrottle`].
#[derive(Debug)]
pub struct BlockingClient {
    throttle: RequestThrottle,
}

impl BlockingClient {
    /// Client throttling URLs that match `opts.api_pattern`.
    #[must_use]
    pub fn new(opts: &NetworkOptions) -> Self {
        Self {
            throttle: RequestThrottle::new(opts),
        }
    }

    /// GET `url` and return the body as text. API URLs wait for their turn
    /// in the queue, sleeping out the delay after the previous request.
    ///
    /// # Errors
    ///
    /// [`VizError::Request`] when the request or the body read fails.
    pub fn get(&mut self, url: &str) -> Result<String, VizError> {
        let id = match self.throttle.submit(url) {
            Submission::PassThrough(url) => return fetch(&url),
            Submission::Queued(id) => id,
        };

        loop {
            if let Some(wait) = self.throttle.wait_time(Instant::now()) {
                std::thread::sleep(wait);
            }
            let Some(request) = self.throttle.next_ready(Instant::now())
            else {
                continue;
            };
            let result = fetch(&request.url);
            let _ = self.throttle.complete(request.id, Instant::now());
            if request.id == id {
                return result;
            }
        }
    }
}

fn fetch(url: &str) -> Result<String, VizError> {
    log::info!("fetching {url}");
    ureq::get(url)
        .call()
        .map_err(|e| VizError::Request(format!("{url}: {e}")))?
        .into_body()
        .read_to_string()
        .map_err(|e| VizError::Request(format!("{url}: {e}")))
}
