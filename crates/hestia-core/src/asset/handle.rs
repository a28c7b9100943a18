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

use super::{Asset, AssetKind, AssetMetadata};
use std::sync::{Arc, RwLock};

/// A cheap, clonable, shared reference to an [`Asset`].
///
/// Handles share one underlying asset slot, so an in-place hot reload
/// becomes visible through every clone without invalidating any of them.
/// Identity is pointer identity: two handles compare equal under
/// [`AssetHandle::ptr_eq`] exactly when they share the same slot.
#[derive(Debug, Clone)]
pub struct AssetHandle(Arc<RwLock<Asset>>);

impl AssetHandle {
    /// Wraps an asset into a shared handle.
    pub fn new(asset: Asset) -> Self {
        AssetHandle(Arc::new(RwLock::new(asset)))
    }

    /// Whether two handles refer to the same underlying asset slot.
    pub fn ptr_eq(&self, other: &AssetHandle) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Runs `f` with shared access to the asset.
    pub fn with_asset<R>(&self, f: impl FnOnce(&Asset) -> R) -> R {
        f(&self.0.read().unwrap())
    }

    /// Runs `f` with exclusive access to the asset.
    pub fn with_asset_mut<R>(&self, f: impl FnOnce(&mut Asset) -> R) -> R {
        f(&mut self.0.write().unwrap())
    }

    /// The asset's logical path.
    pub fn path(&self) -> String {
        self.with_asset(|asset| asset.path().to_string())
    }

    /// The asset's kind.
    pub fn kind(&self) -> AssetKind {
        self.with_asset(Asset::kind)
    }

    /// Whether the asset currently holds a payload.
    pub fn is_loaded(&self) -> bool {
        self.with_asset(Asset::is_loaded)
    }

    /// A snapshot of the asset's metadata.
    pub fn metadata(&self) -> AssetMetadata {
        self.with_asset(|asset| asset.metadata().clone())
    }

    /// The asset's estimated payload size in bytes.
    pub fn estimated_size(&self) -> u64 {
        self.with_asset(Asset::estimated_size)
    }

    /// Whether the source file changed on disk since the asset was loaded.
    pub fn is_stale(&self) -> bool {
        self.with_asset(Asset::is_stale)
    }
}
