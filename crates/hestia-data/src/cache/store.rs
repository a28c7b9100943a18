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

use super::entry::CacheEntry;
use super::eviction::select_victim;
use super::references::ReferenceGuard;
use ahash::AHashMap;
use hestia_core::asset::{AssetHandle, AssetReloadSource};
use hestia_core::cache::{CacheConfig, CachePolicy, CacheStats, CallbackId};
use hestia_core::AssetError;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard};

/// Signature of a hot-reload notification: the entry's path and its handle.
pub type ReloadCallback = dyn Fn(&str, &AssetHandle) + Send + Sync;

/// Everything behind the cache's single lock.
pub(crate) struct CacheInner {
    pub(crate) entries: AHashMap<String, CacheEntry>,
    stats: CacheStats,
    config: CacheConfig,
    next_sequence: u64,
    next_callback_id: u64,
    next_reference_id: u64,
    reload_callbacks: Vec<(CallbackId, Arc<ReloadCallback>)>,
}

/// A thread-safe asset cache with per-entry retention policies.
///
/// Entries are keyed by logical path and hold [`AssetHandle`]s. Budgets are
/// soft: storing never fails, and when every remaining entry is exempt from
/// eviction the cache simply grows past its limits. Evicted and replaced
/// entries get their assets unloaded so outstanding handles observe the
/// payload disappear.
///
/// When a reload source is attached and hot reload is enabled, lookups
/// re-decode stale entries in place before returning them; registered
/// reload callbacks run after the cache lock is released.
pub struct EvictionCache {
    inner: Arc<Mutex<CacheInner>>,
    reload_source: Option<Arc<dyn AssetReloadSource>>,
}

impl EvictionCache {
    /// Creates an empty cache with the given limits.
    pub fn new(config: CacheConfig) -> Self {
        EvictionCache {
            inner: Arc::new(Mutex::new(CacheInner {
                entries: AHashMap::new(),
                stats: CacheStats::default(),
                config,
                next_sequence: 0,
                next_callback_id: 0,
                next_reference_id: 0,
                reload_callbacks: Vec::new(),
            })),
            reload_source: None,
        }
    }

    /// Attaches the source used to re-decode stale entries in place.
    pub fn with_reload_source(mut self, source: Arc<dyn AssetReloadSource>) -> Self {
        self.reload_source = Some(source);
        self
    }

    /// Looks up a cached handle, hot reloading it first if it went stale.
    ///
    /// Returns `Ok(None)` on a miss. A failed hot reload removes the entry,
    /// counts as a miss, and surfaces the failure as
    /// [`AssetError::Cache`] with operation `"hot_reload"`.
    pub fn get(&self, path: &str) -> Result<Option<AssetHandle>, AssetError> {
        let mut inner = self.inner.lock().unwrap();
        let enable_hot_reload = inner.config.enable_hot_reload;
        let mut stale = false;
        let mut found: Option<AssetHandle> = None;
        if let Some(entry) = inner.entries.get_mut(path) {
            if enable_hot_reload && self.reload_source.is_some() && entry.handle.is_stale() {
                stale = true;
            } else {
                entry.touch();
                found = Some(entry.handle.clone());
            }
        }
        if stale {
            return self.reload_stale_entry(inner, path);
        }
        match found {
            Some(handle) => {
                inner.stats.hits += 1;
                Ok(Some(handle))
            }
            None => {
                inner.stats.misses += 1;
                Ok(None)
            }
        }
    }

    fn reload_stale_entry(
        &self,
        mut inner: MutexGuard<'_, CacheInner>,
        path: &str,
    ) -> Result<Option<AssetHandle>, AssetError> {
        let Some(source) = self.reload_source.as_ref() else {
            inner.stats.misses += 1;
            return Ok(None);
        };
        log::debug!("Hot reloading stale cache entry '{path}'");
        let (handle, old_size, outcome) = match inner.entries.get_mut(path) {
            Some(entry) => {
                let handle = entry.handle.clone();
                let old_size = entry.size_bytes;
                let outcome = handle.with_asset_mut(|asset| source.reload(asset));
                (handle, old_size, outcome)
            }
            None => {
                inner.stats.misses += 1;
                return Ok(None);
            }
        };
        match outcome {
            Ok(()) => {
                let new_size = handle.estimated_size();
                if let Some(entry) = inner.entries.get_mut(path) {
                    entry.refresh_after_reload(new_size);
                    entry.touch();
                }
                inner.stats.memory_bytes = inner.stats.memory_bytes - old_size + new_size;
                inner.stats.hits += 1;
                let callbacks: Vec<Arc<ReloadCallback>> = inner
                    .reload_callbacks
                    .iter()
                    .map(|(_, callback)| callback.clone())
                    .collect();
                // Callbacks may call back into the cache, so run them unlocked.
                drop(inner);
                fire_reload_callbacks(&callbacks, path, &handle);
                Ok(Some(handle))
            }
            Err(err) => {
                log::warn!("Hot reload of '{path}' failed, dropping the entry: {err}");
                Self::detach_entry(&mut inner, path);
                inner.stats.misses += 1;
                Err(AssetError::hot_reload(path, err))
            }
        }
    }

    /// Stores a handle under `path`, evicting to make room first.
    ///
    /// A `Never` policy (explicit or from the config default) makes this a
    /// no-op; the caller keeps the only reference. Replacing an existing
    /// entry unloads the previous asset unless both are the same handle,
    /// and does not count as an eviction.
    pub fn put(&self, path: &str, handle: AssetHandle, policy: Option<CachePolicy>) {
        let mut inner = self.inner.lock().unwrap();
        let policy = policy.unwrap_or(inner.config.default_policy);
        if policy == CachePolicy::Never {
            log::trace!("Not caching '{path}' (Never policy)");
            return;
        }
        if let Some(previous) = inner.entries.remove(path) {
            if !previous.handle.ptr_eq(&handle) {
                previous.handle.with_asset_mut(|asset| asset.unload());
            }
            inner.stats.memory_bytes -= previous.size_bytes;
        }
        Self::enforce_limits(&mut inner);
        let sequence = inner.next_sequence;
        inner.next_sequence += 1;
        let entry = CacheEntry::new(handle, policy, sequence);
        inner.stats.memory_bytes += entry.size_bytes;
        inner.entries.insert(path.to_string(), entry);
        inner.stats.entry_count = inner.entries.len();
    }

    /// Evicts until both budgets are satisfied or no victim remains.
    ///
    /// Runs before an insert, against the current totals; the incoming
    /// entry is not charged yet, which is what keeps the budgets soft.
    fn enforce_limits(inner: &mut CacheInner) {
        while inner.entries.len() >= inner.config.max_entry_count
            || inner.stats.memory_bytes > inner.config.max_memory_bytes
        {
            let Some(victim) = select_victim(&inner.entries) else {
                log::debug!("Cache over budget but no evictable entry remains");
                break;
            };
            if let Some(entry) = inner.entries.get(&victim) {
                log::debug!(
                    "Evicting '{victim}' ({} policy) to satisfy cache budgets",
                    entry.policy
                );
            }
            if Self::detach_entry(inner, &victim) {
                inner.stats.evictions += 1;
            }
        }
    }

    fn detach_entry(inner: &mut CacheInner, path: &str) -> bool {
        match inner.entries.remove(path) {
            Some(entry) => {
                entry.handle.with_asset_mut(|asset| asset.unload());
                inner.stats.memory_bytes -= entry.size_bytes;
                inner.stats.entry_count = inner.entries.len();
                true
            }
            None => false,
        }
    }

    /// Removes an entry and unloads its asset. Not counted as an eviction.
    pub fn remove(&self, path: &str) -> bool {
        let mut inner = self.inner.lock().unwrap();
        let removed = Self::detach_entry(&mut inner, path);
        if removed {
            log::trace!("Removed '{path}' from the cache");
        }
        removed
    }

    /// Empties the cache, unloading every asset, and resets all statistics.
    pub fn clear(&self) {
        let mut inner = self.inner.lock().unwrap();
        for (_, entry) in inner.entries.drain() {
            entry.handle.with_asset_mut(|asset| asset.unload());
        }
        inner.stats = CacheStats::default();
        log::debug!("Cache cleared");
    }

    /// Whether an entry exists under `path`. Does not touch access stats.
    pub fn contains(&self, path: &str) -> bool {
        self.inner.lock().unwrap().entries.contains_key(path)
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().entries.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A snapshot of the cache counters.
    pub fn stats(&self) -> CacheStats {
        let mut inner = self.inner.lock().unwrap();
        inner.stats.entry_count = inner.entries.len();
        inner.stats
    }

    /// A copy of the configured limits.
    pub fn config(&self) -> CacheConfig {
        self.inner.lock().unwrap().config.clone()
    }

    /// Reassigns an existing entry's retention policy.
    pub fn set_policy(&self, path: &str, policy: CachePolicy) -> bool {
        let mut inner = self.inner.lock().unwrap();
        match inner.entries.get_mut(path) {
            Some(entry) => {
                entry.policy = policy;
                true
            }
            None => false,
        }
    }

    /// The retention policy assigned to `path`, if cached.
    pub fn policy(&self, path: &str) -> Option<CachePolicy> {
        let inner = self.inner.lock().unwrap();
        inner.entries.get(path).map(|entry| entry.policy)
    }

    /// Pins `path` against `ReferenceBased` eviction until the guard drops.
    ///
    /// Returns `None` when nothing is cached under `path`.
    pub fn register_reference(&self, path: &str) -> Option<ReferenceGuard> {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_reference_id;
        match inner.entries.get_mut(path) {
            Some(entry) => {
                entry.references.insert(id);
            }
            None => return None,
        }
        inner.next_reference_id += 1;
        Some(ReferenceGuard {
            inner: Arc::downgrade(&self.inner),
            path: path.to_string(),
            id,
        })
    }

    /// Registers a callback fired after every successful hot reload.
    pub fn add_reload_callback(
        &self,
        callback: impl Fn(&str, &AssetHandle) + Send + Sync + 'static,
    ) -> CallbackId {
        let mut inner = self.inner.lock().unwrap();
        let id = CallbackId(inner.next_callback_id);
        inner.next_callback_id += 1;
        let callback: Arc<ReloadCallback> = Arc::new(callback);
        inner.reload_callbacks.push((id, callback));
        id
    }

    /// Removes a previously registered reload callback.
    pub fn remove_reload_callback(&self, id: CallbackId) -> bool {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.reload_callbacks.len();
        inner.reload_callbacks.retain(|(existing, _)| *existing != id);
        inner.reload_callbacks.len() != before
    }
}

/// Runs reload callbacks in registration order, isolating panics so one
/// faulty observer cannot take down the caller.
fn fire_reload_callbacks(callbacks: &[Arc<ReloadCallback>], path: &str, handle: &AssetHandle) {
    for callback in callbacks {
        if catch_unwind(AssertUnwindSafe(|| callback(path, handle))).is_err() {
            log::error!("A reload callback panicked while handling '{path}'");
        }
    }
}
