//! FIFO request throttle.
//!
//! A sans-IO queue: callers [`submit`](RequestThrottle::submit) URLs, poll
//! [`next_ready`](RequestThrottle::next_ready) with the current time, run
//! the request themselves and report [`complete`](RequestThrottle::complete)
//! when it settles (success or failure alike). One request is in flight
//! at a time, and the next one becomes ready a fixed delay after the
//! previous one completed. There is no priority, timeout or retry.
//!
//! URLs that do not contain the API pattern bypass the queue.

use std::collections::VecDeque;
use std::time::Duration;

use web_time::Instant;

use crate::options::NetworkOptions;

/// Identifies one queued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(u64);

/// A queued request handed out for execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Queue-assigned id, passed back to `complete`.
    pub id: RequestId,
    /// Target URL.
    pub url: String,
}

/// What `submit` did with a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// The URL matched the API pattern and waits in the queue.
    Queued(RequestId),
    /// The URL is not throttled; fetch it directly.
    PassThrough(String),
}

/// Serializes API requests with a fixed gap between them.
#[derive(Debug)]
pub struct RequestThrottle {
    pattern: String,
    delay: Duration,
    queue: VecDeque<Request>,
    in_flight: Option<RequestId>,
    ready_at: Option<Instant>,
    next_id: u64,
}

impl RequestThrottle {
    /// Throttle matching `opts.api_pattern` with `opts.delay_ms` between
    /// requests.
    #[must_use]
    pub fn new(opts: &NetworkOptions) -> Self {
        Self {
            pattern: opts.api_pattern.clone(),
            delay: Duration::from_millis(opts.delay_ms),
            queue: VecDeque::new(),
            in_flight: None,
            ready_at: None,
            next_id: 0,
        }
    }

    /// Whether `url` goes through the queue.
    #[must_use]
    pub fn matches(&self, url: &str) -> bool {
        !self.pattern.is_empty() && url.contains(&self.pattern)
    }

    /// Queue `url` if it matches the API pattern.
    pub fn submit(&mut self, url: impl Into<String>) -> Submission {
        let url = url.into();
        if !self.matches(&url) {
            return Submission::PassThrough(url);
        }
        self.next_id += 1;
        let id = RequestId(self.next_id);
        log::debug!("queued request {} for {url}", self.next_id);
        self.queue.push_back(Request { id, url });
        Submission::Queued(id)
    }

    /// Take the next request if nothing is in flight and the post-
    /// completion delay has elapsed.
    pub fn next_ready(&mut self, now: Instant) -> Option<Request> {
        if self.in_flight.is_some() {
            return None;
        }
        if self.ready_at.is_some_and(|at| now < at) {
            return None;
        }
        let request = self.queue.pop_front()?;
        self.in_flight = Some(request.id);
        Some(request)
    }

    /// The in-flight request `id` settled at `now`. Returns `false` for an
    /// id that is not in flight.
    pub fn complete(&mut self, id: RequestId, now: Instant) -> bool {
        if self.in_flight != Some(id) {
            log::warn!("completion for request {} not in flight", id.0);
            return false;
        }
        self.in_flight = None;
        self.ready_at = Some(now + self.delay);
        true
    }

    /// How long until `next_ready` can return something: `None` when the
    /// queue is empty or a request is in flight.
    #[must_use]
    pub fn wait_time(&self, now: Instant) -> Option<Duration> {
        if self.in_flight.is_some() || self.queue.is_empty() {
            return None;
        }
        let wait = self.ready_at.map_or(Duration::ZERO, |at| {
            at.saturating_duration_since(now)
        });
        Some(wait)
    }

    /// Requests waiting in the queue.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// The request at the head of the queue.
    #[must_use]
    pub fn front(&self) -> Option<RequestId> {
        self.queue.front().map(|r| r.id)
    }

    /// The request currently in flight.
    #[must_use]
    pub fn in_flight(&self) -> Option<RequestId> {
        self.in_flight
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn throttle() -> RequestThrottle {
        RequestThrottle::new(&NetworkOptions::default())
    }

    fn queued(s: Submission) -> RequestId {
        match s {
            Submission::Queued(id) => id,
            Submission::PassThrough(url) => unreachable!("{url} not queued"),
        }
    }

    #[test]
    fn non_api_urls_pass_through() {
        let mut t = throttle();
        assert_eq!(
            t.submit("/static/app.js"),
            Submission::PassThrough("/static/app.js".to_owned())
        );
        assert_eq!(t.pending(), 0);
    }

    #[test]
    fn one_in_flight_in_fifo_order() {
        let mut t = throttle();
        let now = Instant::now();
        let a = queued(t.submit("/api/visualize/1"));
        let b = queued(t.submit("/api/visualize/2"));

        assert_eq!(t.front(), Some(a));
        let first = t.next_ready(now).unwrap();
        assert_eq!(first.id, a);
        assert_eq!(first.url, "/api/visualize/1");
        assert!(t.next_ready(now).is_none());
        assert_eq!(t.wait_time(now), None);

        assert!(t.complete(a, now));
        assert!(!t.complete(a, now));
        assert_eq!(t.in_flight(), None);
        assert_eq!(t.next_ready(now).map(|r| r.id), None);
        assert_eq!(t.next_ready(now + Duration::from_millis(299)), None);
        assert_eq!(
            t.wait_time(now + Duration::from_millis(100)),
            Some(Duration::from_millis(200))
        );

        assert_eq!(t.front(), Some(b));
        let second = t.next_ready(now + Duration::from_millis(300)).unwrap();
        assert_eq!(second.id, b);
        assert_eq!(t.pending(), 0);
    }

    #[test]
    fn idle_queue_serves_immediately() {
        let mut t = throttle();
        let now = Instant::now();
        let _ = t.submit("/api/x");
        assert_eq!(t.wait_time(now), Some(Duration::ZERO));
        assert!(t.next_ready(now).is_some());
    }

    #[test]
    fn empty_pattern_throttles_nothing() {
        let opts = NetworkOptions {
            api_pattern: String::new(),
            ..NetworkOptions::default()
        };
        let mut t = RequestThrottle::new(&opts);
        assert!(matches!(t.submit("/api/x"), Submission::PassThrough(_)));
    }
}
