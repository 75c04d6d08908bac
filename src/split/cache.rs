//! In-memory cache of grouping results.
//!
//! Keys are SHA-256 fingerprints of the request (file set, diff prefix,
//! model parameters). Entries expire after the configured TTL and the
//! store never grows beyond its capacity: a full cache first drops expired
//! entries, then the oldest half, and skips the write if that still does
//! not free a slot.
//!
//! The cache lives for one process; nothing is written to disk.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use serde::Serialize;
use sha2::{Digest, Sha256};

use super::{FileGroup, dedup_paths};
use crate::config::CacheConfig;
use crate::constants::grouping::FINGERPRINT_DIFF_PREFIX;

/// Milliseconds since the Unix epoch.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Default, Clone)]
pub struct ManualClock(Arc<AtomicI64>);

impl ManualClock {
    pub fn at(ms: i64) -> Self {
        Self(Arc::new(AtomicI64::new(ms)))
    }

    pub fn set(&self, ms: i64) {
        self.0.store(ms, Ordering::SeqCst);
    }

    pub fn advance(&self, ms: i64) {
        self.0.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Serialize)]
struct FingerprintInput<'a> {
    files: Vec<String>,
    diff_prefix: &'a str,
    model: &'a str,
    temperature: f32,
}

/// Cache key for one classification request.
///
/// The file set is de-duplicated and sorted, so order does not matter;
/// only the first characters of the diff participate.
pub fn fingerprint(files: &[String], diff: &str, model: &str, temperature: f32) -> String {
    let mut files = dedup_paths(files);
    files.sort();

    let diff_prefix = match diff.char_indices().nth(FINGERPRINT_DIFF_PREFIX) {
        Some((idx, _)) => &diff[..idx],
        None => diff,
    };

    let input = FingerprintInput {
        files,
        diff_prefix,
        model,
        temperature,
    };
    // struct fields serialize in declaration order, so the JSON is canonical
    let canonical = serde_json::to_vec(&input).unwrap_or_default();

    hex::encode(Sha256::digest(&canonical))
}

#[derive(Debug, Clone)]
struct CacheEntry {
    groups: Vec<FileGroup>,
    timestamp: i64,
    seq: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub size: usize,
    pub capacity: usize,
    pub enabled: bool,
}

/// TTL and capacity bounded store of grouping results.
pub struct AnalysisCache {
    enabled: bool,
    ttl_ms: i64,
    capacity: usize,
    entries: HashMap<String, CacheEntry>,
    next_seq: u64,
    clock: Box<dyn Clock>,
}

impl AnalysisCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self::with_clock(config, Box::new(SystemClock))
    }

    pub fn with_clock(config: &CacheConfig, clock: Box<dyn Clock>) -> Self {
        let ttl_ms = i64::try_from(config.ttl)
            .unwrap_or(i64::MAX)
            .saturating_mul(60_000);
        Self {
            enabled: config.enabled,
            ttl_ms,
            capacity: config.max_size,
            entries: HashMap::new(),
            next_seq: 0,
            clock,
        }
    }

    fn is_expired(&self, entry: &CacheEntry, now: i64) -> bool {
        now.saturating_sub(entry.timestamp) > self.ttl_ms
    }

    /// Cached groups for `key`. An expired entry is removed and reported as a miss.
    pub fn get(&mut self, key: &str) -> Option<Vec<FileGroup>> {
        if !self.enabled {
            return None;
        }

        let now = self.clock.now_ms();
        let expired = self.is_expired(self.entries.get(key)?, now);
        if expired {
            tracing::debug!(
                "Analysis cache entry expired: {}",
                key.chars().take(12).collect::<String>()
            );
            self.entries.remove(key);
            return None;
        }

        self.entries.get(key).map(|entry| entry.groups.clone())
    }

    /// Stores `groups` under `key`; may silently skip when the cache is full.
    pub fn set(&mut self, key: &str, groups: Vec<FileGroup>) {
        if !self.enabled || self.capacity == 0 {
            return;
        }

        if !self.entries.contains_key(key) && self.entries.len() >= self.capacity {
            self.cleanup();
            if self.entries.len() >= self.capacity {
                tracing::debug!("Analysis cache full, dropping write");
                return;
            }
        }

        let entry = CacheEntry {
            groups,
            timestamp: self.clock.now_ms(),
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.entries.insert(key.to_string(), entry);
    }

    /// Drops expired entries, then the oldest half if still full.
    fn cleanup(&mut self) {
        let now = self.clock.now_ms();
        let ttl_ms = self.ttl_ms;
        self.entries
            .retain(|_, entry| now.saturating_sub(entry.timestamp) <= ttl_ms);

        if self.entries.len() < self.capacity {
            return;
        }

        let evict = self.capacity.div_ceil(2);
        let mut by_age: Vec<(i64, u64, String)> = self
            .entries
            .iter()
            .map(|(key, entry)| (entry.timestamp, entry.seq, key.clone()))
            .collect();
        by_age.sort();

        for (_, _, key) in by_age.into_iter().take(evict) {
            self.entries.remove(&key);
        }
        tracing::debug!("Analysis cache evicted {} oldest entries", evict);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.entries.len(),
            capacity: self.capacity,
            enabled: self.enabled,
        }
    }
}
