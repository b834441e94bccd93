use serde::{Deserialize, Serialize};

/// Request throttling for backend API calls.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NetworkOptions {
    /// Substring that marks a URL as a throttled API call.
    pub api_pattern: String,
    /// Pause after each throttled request completes, in milliseconds.
    pub delay_ms: u64,
}

impl Default for NetworkOptions {
    fn default() -> Self {
        Self {
            api_pattern: "/api/".to_owned(),
            delay_ms: 300,
        }
    }
}

/// Resource pool sizing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PoolOptions {
    /// Maximum templates per pool before least-recently-used eviction
    /// (0 = unbounded).
    pub max_entries: usize,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self { max_entries: 256 }
    }
}
