//! Network-facing policy: the API request throttle, listener options and
//! (with the `binary` feature) a blocking HTTP client that goes through
//! the throttle.

#[cfg(feature = "binary")]
pub mod http;
pub mod listener;
pub mod throttle;
