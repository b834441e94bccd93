//! Event listener options.
//!
//! Scroll and touch listeners default to passive so they never block
//! scrolling. A caller that explicitly asks for `passive: false` keeps it.

/// Events whose listeners default to passive.
pub const PASSIVE_BY_DEFAULT: [&str; 3] =
    ["scroll", "touchstart", "touchmove"];

/// Options for registering one listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListenerOptions {
    /// `None` leaves the platform default in place.
    pub passive: Option<bool>,
    /// Capture-phase listener.
    pub capture: bool,
    /// Remove after the first call.
    pub once: bool,
}

impl ListenerOptions {
    /// Options for an `event` listener, starting from what the caller
    /// requested.
    #[must_use]
    pub fn for_event(event: &str, requested: Self) -> Self {
        if PASSIVE_BY_DEFAULT.contains(&event) {
            Self {
                passive: Some(requested.passive != Some(false)),
                ..requested
            }
        } else {
            requested
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touch_and_scroll_become_passive() {
        for event in PASSIVE_BY_DEFAULT {
            let opts =
                ListenerOptions::for_event(event, ListenerOptions::default());
            assert_eq!(opts.passive, Some(true));
        }
    }

    #[test]
    fn explicit_non_passive_is_kept() {
        let requested = ListenerOptions {
            passive: Some(false),
            capture: true,
            once: false,
        };
        let opts = ListenerOptions::for_event("touchmove", requested);
        assert_eq!(opts, requested);
    }

    #[test]
    fn other_events_are_untouched() {
        let requested = ListenerOptions {
            once: true,
            ..ListenerOptions::default()
        };
        assert_eq!(ListenerOptions::for_event("click", requested), requested);
        assert_eq!(
            ListenerOptions::for_event("wheel", requested).passive,
            None
        );
    }
}
