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

use super::store::CacheInner;
use std::sync::{Mutex, Weak};

/// Pins a `ReferenceBased` cache entry for as long as the guard lives.
///
/// Dropping the guard releases the pin. Guards hold only a weak link to the
/// cache, so they may safely outlive it; releasing after the cache is gone
/// is a no-op.
#[derive(Debug)]
pub struct ReferenceGuard {
    pub(crate) inner: Weak<Mutex<CacheInner>>,
    pub(crate) path: String,
    pub(crate) id: u64,
}

impl ReferenceGuard {
    /// The path of the entry this guard pins.
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl Drop for ReferenceGuard {
    fn drop(&mut self) {
        // Must not panic inside drop, so a poisoned lock is left alone.
        if let Some(inner) = self.inner.upgrade() {
            if let Ok(mut inner) = inner.lock() {
                if let Some(entry) = inner.entries.get_mut(&self.path) {
                    entry.references.remove(&self.id);
                }
            }
        }
    }
}
