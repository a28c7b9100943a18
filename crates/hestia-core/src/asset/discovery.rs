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

use super::AssetKind;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Summary of one directory scan performed by a [`DiscoveryService`].
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    /// Total files visited, whether or not they were recognized.
    pub total_files: usize,
    /// Files a loader lane claimed.
    pub assets_found: usize,
    /// Human-readable descriptions of files that could not be inspected.
    pub errors: Vec<String>,
    /// Wall-clock time the scan took.
    pub scan_duration: Duration,
    /// How many recognized assets fell into each kind.
    pub counts_by_kind: HashMap<AssetKind, usize>,
}

/// Walks directories ahead of time to report which assets are available.
///
/// Discovery is an offline concern: nothing on the load path depends on a
/// scan having run, and implementations are free to cache results between
/// calls unless `force_rescan` is set.
pub trait DiscoveryService: Send + Sync {
    /// Scans `paths` recursively and reports what was found.
    fn scan(&self, paths: &[PathBuf], force_rescan: bool) -> ScanReport;

    /// Classifies a single path without reading the file.
    fn detect_kind(&self, path: &Path) -> Option<AssetKind>;
}
