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

//! The multi-policy eviction cache.
//!
//! [`EvictionCache`] maps logical asset paths to
//! [`hestia_core::asset::AssetHandle`]s and enforces entry-count and memory
//! budgets by evicting according to each entry's assigned
//! [`hestia_core::cache::CachePolicy`]. Hot reload hooks in through the
//! read path: a stale entry is re-decoded in place before its handle is
//! returned.

mod entry;
mod eviction;
mod references;
mod store;

pub use references::ReferenceGuard;
pub use store::{EvictionCache, ReloadCallback};
