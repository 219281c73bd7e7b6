//! Configuration Module
//!
//! Handles loading list construction defaults from environment variables.

use std::env;

/// Construction parameters for an [`OrderedList`](crate::list::OrderedList).
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct ListConfig {
    /// Number of element slots reserved up front
    pub initial_capacity: usize,
    /// TTL in seconds applied by `insert_default`
    pub default_ttl: i64,
}

impl ListConfig {
    /// Creates a new ListConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `LIST_INITIAL_CAPACITY` - Slots reserved at construction (default: 1024)
    /// - `LIST_DEFAULT_TTL` - Default TTL in seconds (default: 300)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            initial_capacity: env::var("LIST_INITIAL_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.initial_capacity),
            default_ttl: env::var("LIST_DEFAULT_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.default_ttl),
        }
    }
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 1024,
            default_ttl: 300,
        }
    }
}
