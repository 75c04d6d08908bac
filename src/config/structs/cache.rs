//! Analysis cache configuration.

use serde::{Deserialize, Serialize};

/// Grouping analysis cache.
///
/// The cache lives for one process; nothing is written to disk.
///
/// # Example
/// ```toml
/// [cache]
/// enabled = true
/// ttl = 60        # minutes
/// max_size = 100  # entries
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Entry lifetime in minutes.
    #[serde(default = "default_ttl")]
    pub ttl: u64,

    /// Maximum number of entries.
    #[serde(default = "default_max_size")]
    pub max_size: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl: default_ttl(),
            max_size: default_max_size(),
        }
    }
}

impl CacheConfig {
    pub(crate) fn collect_errors(&self, errors: &mut Vec<String>) {
        if self.ttl < 1 {
            errors.push("cache.ttl must be at least 1 minute".to_string());
        }
        if self.max_size < 1 {
            errors.push("cache.max_size must be at least 1".to_string());
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_ttl() -> u64 {
    60
}

fn default_max_size() -> usize {
    100
}
