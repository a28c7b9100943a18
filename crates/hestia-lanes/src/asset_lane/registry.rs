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

use super::loading::{
    ext_lowercase, AudioLoaderLane, DataLoaderLane, FontLoaderLane, ImageLoaderLane,
    ThemeLoaderLane,
};
use super::{AssetLoaderLane, DecodeError};
use ahash::AHashMap;
use hestia_core::asset::{Asset, AssetKind, AssetReloadSource};
use hestia_core::AssetError;
use std::path::Path;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct RegistryInner {
    lanes: Vec<Arc<dyn AssetLoaderLane>>,
    by_extension: AHashMap<String, Vec<usize>>,
    by_kind: AHashMap<AssetKind, Vec<usize>>,
}

impl RegistryInner {
    fn rebuild_indexes(&mut self) {
        self.by_extension.clear();
        self.by_kind.clear();
        for (index, lane) in self.lanes.iter().enumerate() {
            for extension in lane.extensions() {
                let key = extension.trim_start_matches('.').to_ascii_lowercase();
                self.by_extension.entry(key).or_default().push(index);
            }
            self.by_kind.entry(lane.kind()).or_default().push(index);
        }
    }
}

/// Dispatches asset paths to registered loader lanes.
///
/// Lanes are consulted in registration order, so when several lanes claim
/// the same extension the earliest registration wins. With the default
/// lanes that means an unhinted `.json` file loads as a theme; pass a
/// kind hint to pick the data lane instead.
///
/// The registry also implements [`AssetReloadSource`], which lets the
/// cache re-decode stale entries through the same lanes that produced
/// them.
pub struct LoaderLaneRegistry {
    inner: Mutex<RegistryInner>,
}

impl LoaderLaneRegistry {
    /// Creates a registry with no lanes.
    pub fn new() -> Self {
        LoaderLaneRegistry {
            inner: Mutex::new(RegistryInner::default()),
        }
    }

    /// Creates a registry stocked with the five built-in lanes, registered
    /// in the order Image, Font, Audio, Theme, Data.
    pub fn with_default_lanes() -> Self {
        let registry = LoaderLaneRegistry::new();
        registry.register_lane(Arc::new(ImageLoaderLane::new()));
        registry.register_lane(Arc::new(FontLoaderLane::new()));
        registry.register_lane(Arc::new(AudioLoaderLane::new()));
        registry.register_lane(Arc::new(ThemeLoaderLane::new()));
        registry.register_lane(Arc::new(DataLoaderLane::new()));
        registry
    }

    /// Adds a lane to the end of the dispatch order.
    ///
    /// Registering the same lane instance twice is a no-op.
    pub fn register_lane(&self, lane: Arc<dyn AssetLoaderLane>) {
        let mut inner = self.inner.lock().unwrap();
        if inner.lanes.iter().any(|existing| Arc::ptr_eq(existing, &lane)) {
            return;
        }
        log::debug!(
            "Registered loader lane '{}' for {} assets",
            lane.strategy_name(),
            lane.kind()
        );
        inner.lanes.push(lane);
        inner.rebuild_indexes();
    }

    /// Removes every lane with the given strategy name.
    pub fn unregister_lane(&self, strategy_name: &str) -> bool {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.lanes.len();
        inner.lanes.retain(|lane| lane.strategy_name() != strategy_name);
        let removed = inner.lanes.len() != before;
        if removed {
            inner.rebuild_indexes();
        }
        removed
    }

    fn resolve(
        inner: &RegistryInner,
        path: &Path,
        kind_hint: Option<AssetKind>,
    ) -> Option<Arc<dyn AssetLoaderLane>> {
        let hint_matches =
            |lane: &dyn AssetLoaderLane| kind_hint.map_or(true, |kind| lane.kind() == kind);
        if let Some(extension) = ext_lowercase(path) {
            if let Some(indexes) = inner.by_extension.get(&extension) {
                for &index in indexes {
                    let lane = &inner.lanes[index];
                    if hint_matches(lane.as_ref()) && lane.can_load(path) {
                        return Some(lane.clone());
                    }
                }
            }
        }
        // Custom lanes may accept paths beyond their declared extensions.
        inner
            .lanes
            .iter()
            .find(|lane| hint_matches(lane.as_ref()) && lane.can_load(path))
            .cloned()
    }

    /// The lane that would load `path`, honoring an optional kind filter.
    pub fn lane_for(
        &self,
        path: &Path,
        kind_hint: Option<AssetKind>,
    ) -> Option<Arc<dyn AssetLoaderLane>> {
        let inner = self.inner.lock().unwrap();
        Self::resolve(&inner, path, kind_hint)
    }

    /// Loads `path` through the lane that claims it.
    pub fn load(&self, path: &Path, kind_hint: Option<AssetKind>) -> Result<Asset, AssetError> {
        let Some(lane) = self.lane_for(path, kind_hint) else {
            return Err(AssetError::load(
                path.display().to_string(),
                DecodeError::NoLane {
                    path: path.display().to_string(),
                    kind_hint,
                },
            ));
        };
        log::debug!(
            "Loading '{}' through the '{}' lane",
            path.display(),
            lane.strategy_name()
        );
        lane.load(path)
    }

    /// Classifies `path` by which lane would claim it.
    pub fn detect_kind(&self, path: &Path) -> Option<AssetKind> {
        self.lane_for(path, None).map(|lane| lane.kind())
    }

    /// Every claimed extension (without the dot), optionally restricted to
    /// one kind. Sorted and deduplicated.
    pub fn supported_extensions(&self, kind: Option<AssetKind>) -> Vec<String> {
        let inner = self.inner.lock().unwrap();
        let mut extensions: Vec<String> = match kind {
            Some(kind) => inner
                .by_kind
                .get(&kind)
                .map(|indexes| {
                    indexes
                        .iter()
                        .flat_map(|&index| inner.lanes[index].extensions())
                        .map(|extension| extension.trim_start_matches('.').to_ascii_lowercase())
                        .collect()
                })
                .unwrap_or_default(),
            None => inner.by_extension.keys().cloned().collect(),
        };
        extensions.sort();
        extensions.dedup();
        extensions
    }

    /// Number of registered lanes.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().lanes.len()
    }

    /// Whether no lanes are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for LoaderLaneRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetReloadSource for LoaderLaneRegistry {
    fn reload(&self, asset: &mut Asset) -> Result<(), AssetError> {
        let source_path = asset.metadata().source_path.clone();
        let kind = asset.kind();
        let Some(lane) = self.lane_for(&source_path, Some(kind)) else {
            return Err(AssetError::load(
                asset.path().to_string(),
                DecodeError::NoLane {
                    path: source_path.display().to_string(),
                    kind_hint: Some(kind),
                },
            ));
        };
        let fresh = lane.load(&source_path)?;
        let (metadata, payload) = fresh.into_parts();
        let Some(payload) = payload else {
            return Err(AssetError::load(
                asset.path().to_string(),
                "loader lane produced an unloaded asset",
            ));
        };
        asset.commit(metadata, payload);
        Ok(())
    }
}
