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
use hestia_core::cache::CallbackId;
use hestia_core::AssetError;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// Notification fired after an asset loads: resolved path and its handle.
pub type LoadCallback = dyn Fn(&str, &AssetHandle) + Send + Sync;

/// Notification fired when an operation fails: resolved path and error.
pub type ErrorCallback = dyn Fn(&str, &AssetError) + Send + Sync;

/// An ordered set of callbacks with removal by id.
///
/// Ids come from a counter private to each set, so a load-callback id
/// cannot remove an error callback.
pub(crate) struct CallbackSet<F: ?Sized> {
    next_id: u64,
    entries: Vec<(CallbackId, Arc<F>)>,
}

impl<F: ?Sized> CallbackSet<F> {
    pub(crate) fn new() -> Self {
        CallbackSet {
            next_id: 0,
            entries: Vec::new(),
        }
    }

    pub(crate) fn add(&mut self, callback: Arc<F>) -> CallbackId {
        let id = CallbackId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, callback));
        id
    }

    pub(crate) fn remove(&mut self, id: CallbackId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(existing, _)| *existing != id);
        self.entries.len() != before
    }

    /// Clones the callbacks so they can be fired after releasing locks.
    pub(crate) fn snapshot(&self) -> Vec<Arc<F>> {
        self.entries
            .iter()
            .map(|(_, callback)| callback.clone())
            .collect()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Runs one callback, isolating panics so a faulty observer cannot take
/// down the loading path.
pub(crate) fn run_isolated(description: &str, path: &str, f: impl FnOnce()) {
    if catch_unwind(AssertUnwindSafe(f)).is_err() {
        log::error!("A {description} callback panicked while handling '{path}'");
    }
}
