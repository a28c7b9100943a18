// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Cache contracts shared across the pipeline: retention policies,
//! statistics, and configuration.
//!
//! The cache implementation itself lives in the data layer; this module
//! only defines the vocabulary it speaks.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How an individual cache entry participates in eviction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CachePolicy {
    /// The entry is never stored at all.
    Never,
    /// The entry is stored and never evicted.
    Always,
    /// Evict the entry least recently accessed.
    #[default]
    Lru,
    /// Evict the entry least frequently accessed.
    Lfu,
    /// Evict the entry loaded longest ago.
    Ttl,
    /// Evict the largest entry first.
    SizeBased,
    /// Evict only entries with no live reference guards.
    ReferenceBased,
}

impl fmt::Display for CachePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CachePolicy::Never => write!(f, "Never"),
            CachePolicy::Always => write!(f, "Always"),
            CachePolicy::Lru => write!(f, "LRU"),
            CachePolicy::Lfu => write!(f, "LFU"),
            CachePolicy::Ttl => write!(f, "TTL"),
            CachePolicy::SizeBased => write!(f, "SizeBased"),
            CachePolicy::ReferenceBased => write!(f, "ReferenceBased"),
        }
    }
}

/// Counters describing cache behavior since construction or the last clear.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Lookups that returned a cached handle.
    pub hits: u64,
    /// Lookups that found nothing (including failed hot reloads).
    pub misses: u64,
    /// Entries removed to satisfy a budget.
    pub evictions: u64,
    /// Estimated bytes currently held by cached payloads.
    pub memory_bytes: u64,
    /// Number of entries currently cached.
    pub entry_count: usize,
}

impl CacheStats {
    /// Fraction of lookups that hit, `0.0` when nothing was looked up yet.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// The complement of [`CacheStats::hit_rate`].
    ///
    /// Reported as `1.0` before any lookup happened, matching the
    /// definition rather than special-casing the empty cache.
    pub fn miss_rate(&self) -> f64 {
        1.0 - self.hit_rate()
    }
}

fn default_max_memory_bytes() -> u64 {
    256 * 1024 * 1024
}

fn default_max_entry_count() -> usize {
    1024
}

fn default_enable_hot_reload() -> bool {
    true
}

/// Tunable limits and behavior switches for the cache.
///
/// Every field has a default so partial configuration files deserialize
/// cleanly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Soft ceiling on the estimated bytes held by cached payloads.
    #[serde(default = "default_max_memory_bytes")]
    pub max_memory_bytes: u64,
    /// Soft ceiling on the number of cached entries.
    #[serde(default = "default_max_entry_count")]
    pub max_entry_count: usize,
    /// Policy assigned to entries stored without an explicit one.
    #[serde(default)]
    pub default_policy: CachePolicy,
    /// Whether lookups check file modification times and reload stale
    /// entries in place.
    #[serde(default = "default_enable_hot_reload")]
    pub enable_hot_reload: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            max_memory_bytes: default_max_memory_bytes(),
            max_entry_count: default_max_entry_count(),
            default_policy: CachePolicy::default(),
            enable_hot_reload: default_enable_hot_reload(),
        }
    }
}

/// Opaque token returned when registering a callback, used to remove it.
///
/// Ids are only meaningful to the registry that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackId(pub u64);
