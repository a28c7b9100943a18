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
use ahash::AHashMap;
use hestia_core::cache::CachePolicy;
use std::cmp::Reverse;

/// The order in which policy groups are considered for eviction.
///
/// The first group that yields a victim wins. `Always` and `Never`
/// entries never appear as victims.
const POLICY_PRIORITY: [CachePolicy; 5] = [
    CachePolicy::Ttl,
    CachePolicy::ReferenceBased,
    CachePolicy::Lfu,
    CachePolicy::Lru,
    CachePolicy::SizeBased,
];

/// Picks the path of the next entry to evict, if any entry is evictable.
///
/// Within each policy group the victim is the entry the policy considers
/// least worth keeping; every comparison falls back to insertion sequence
/// so repeated calls are deterministic. A `ReferenceBased` group in which
/// every entry is pinned yields nothing and the walk moves on.
pub(crate) fn select_victim(entries: &AHashMap<String, CacheEntry>) -> Option<String> {
    for policy in POLICY_PRIORITY {
        let group = entries.iter().filter(|(_, entry)| entry.policy == policy);
        let victim = match policy {
            CachePolicy::Ttl => group
                .min_by_key(|(_, entry)| (entry.loaded_at, entry.sequence))
                .map(|(path, _)| path),
            CachePolicy::ReferenceBased => group
                .filter(|(_, entry)| entry.references.is_empty())
                .min_by_key(|(_, entry)| entry.sequence)
                .map(|(path, _)| path),
            CachePolicy::Lfu => group
                .min_by_key(|(_, entry)| (entry.access_count, entry.sequence))
                .map(|(path, _)| path),
            CachePolicy::Lru => group
                .min_by_key(|(_, entry)| (entry.last_access, entry.sequence))
                .map(|(path, _)| path),
            CachePolicy::SizeBased => group
                .min_by_key(|(_, entry)| (Reverse(entry.size_bytes), entry.sequence))
                .map(|(path, _)| path),
            CachePolicy::Always | CachePolicy::Never => None,
        };
        if let Some(path) = victim {
            return Some(path.clone());
        }
    }
    None
}
