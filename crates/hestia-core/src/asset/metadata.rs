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

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::SystemTime;

/// Descriptive information captured alongside an asset's payload.
///
/// Loaders fill this in at decode time; the cache and the agent read it for
/// staleness checks and dependency tracking but never mutate it directly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetMetadata {
    /// The physical file the payload was decoded from.
    pub source_path: PathBuf,
    /// Size of the source file in bytes.
    pub size_bytes: u64,
    /// Filesystem modification time observed when the file was read.
    ///
    /// `None` when the filesystem did not report one; staleness checks then
    /// treat the asset as never stale.
    pub modified_at_load: Option<SystemTime>,
    /// Content checksum of the raw bytes, as a lowercase hex string.
    pub checksum: Option<String>,
    /// Logical paths of other assets this one declares a dependency on.
    pub dependencies: Vec<String>,
    /// Free-form labels attached by the source document.
    pub tags: Vec<String>,
    /// Loader-specific key/value annotations (e.g. a font's family name).
    pub properties: HashMap<String, String>,
}
