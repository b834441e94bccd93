//! Crate-level error types.

use std::fmt;

/// Errors produced by the nanoviz crate.
#[derive(Debug)]
pub enum VizError {
    /// The visualization payload could not be parsed.
    Payload(String),
    /// Scene composition failed as a whole (individual entity failures are
    /// logged and skipped instead).
    Compose(String),
    /// No rendering backend is available to draw the scene.
    BackendUnavailable(String),
    /// A rendering backend failed while drawing a frame.
    Render(String),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// A network request failed.
    Request(String),
}

impl fmt::Display for VizError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Payload(msg) => write!(f, "invalid visualization data: {msg}"),
            Self::Compose(msg) => {
                write!(f, "failed to create visualization: {msg}")
            }
            Self::BackendUnavailable(msg) => {
                write!(f, "rendering backend not available: {msg}")
            }
            Self::Render(msg) => write!(f, "render error: {msg}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Request(msg) => write!(f, "request failed: {msg}"),
        }
    }
}

impl std::error::Error for VizError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for VizError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for VizError {
    fn from(e: serde_json::Error) -> Self {
        Self::Payload(e.to_string())
    }
}
