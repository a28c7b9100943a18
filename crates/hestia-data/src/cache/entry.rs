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

use hestia_core::asset::AssetHandle;
use hestia_core::cache::CachePolicy;
use std::collections::HashSet;
use std::time::Instant;

/// Per-entry bookkeeping the eviction policies decide over.
///
/// Access statistics live here rather than on the asset itself: the entry
/// is the cache's private view, and dropping it must not disturb handles
/// the rest of the application still holds.
#[derive(Debug)]
pub(crate) struct CacheEntry {
    pub(crate) handle: AssetHandle,
    pub(crate) policy: CachePolicy,
    /// When the current payload was installed; reset by a hot reload.
    pub(crate) loaded_at: Instant,
    /// Insertion order, the final tie-break for every policy.
    pub(crate) sequence: u64,
    pub(crate) last_access: Instant,
    pub(crate) access_count: u64,
    pub(crate) size_bytes: u64,
    /// Ids of live reference guards pinning this entry.
    pub(crate) references: HashSet<u64>,
}

impl CacheEntry {
    /// Builds the bookkeeping for a freshly inserted handle.
    ///
    /// Insertion counts as the first access.
    pub(crate) fn new(handle: AssetHandle, policy: CachePolicy, sequence: u64) -> Self {
        let now = Instant::now();
        let size_bytes = handle.estimated_size();
        CacheEntry {
            handle,
            policy,
            loaded_at: now,
            sequence,
            last_access: now,
            access_count: 1,
            size_bytes,
            references: HashSet::new(),
        }
    }

    /// Records a cache hit.
    pub(crate) fn touch(&mut self) {
        self.last_access = Instant::now();
        self.access_count += 1;
    }

    /// Updates bookkeeping after an in-place hot reload.
    ///
    /// The reload installed a new payload, so the TTL clock restarts.
    pub(crate) fn refresh_after_reload(&mut self, new_size: u64) {
        self.size_bytes = new_size;
        self.loaded_at = Instant::now();
    }
}
