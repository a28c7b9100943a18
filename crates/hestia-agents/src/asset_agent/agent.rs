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

use super::callbacks::{run_isolated, CallbackSet, ErrorCallback, LoadCallback};
use hestia_core::asset::{AssetHandle, AssetKind, AssetReloadSource};
use hestia_core::cache::{CacheConfig, CachePolicy, CacheStats, CallbackId};
use hestia_core::AssetError;
use hestia_data::{EvictionCache, ReferenceGuard};
use hestia_lanes::LoaderLaneRegistry;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Configuration for an [`AssetAgent`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Directories probed, in order, when resolving relative asset paths.
    #[serde(default)]
    pub search_paths: Vec<PathBuf>,
    /// Limits and behavior of the underlying cache.
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Per-request knobs for [`AssetAgent::load_with`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    /// Restricts lane dispatch to one kind, disambiguating shared
    /// extensions such as `.json`.
    pub kind_hint: Option<AssetKind>,
    /// Retention policy for the cached result; the cache default applies
    /// when unset.
    pub policy: Option<CachePolicy>,
    /// Skips the cache lookup and decodes from disk unconditionally.
    pub force_reload: bool,
}

struct AgentState {
    aliases: HashMap<String, String>,
    search_paths: Vec<PathBuf>,
    dependencies: HashMap<String, Vec<String>>,
}

/// The facade applications load assets through.
///
/// The agent resolves aliases and search paths, dispatches files to the
/// loader lanes, caches the results, follows declared dependencies, and
/// notifies registered observers. All methods take `&self`; the agent is
/// meant to be shared behind the [`Arc`] its constructors return.
///
/// Asset identity is the alias-resolved request path: that string keys the
/// cache and the dependency table, and it is what load callbacks receive.
pub struct AssetAgent {
    registry: Arc<LoaderLaneRegistry>,
    cache: Arc<EvictionCache>,
    state: Mutex<AgentState>,
    load_callbacks: Mutex<CallbackSet<LoadCallback>>,
    error_callbacks: Mutex<CallbackSet<ErrorCallback>>,
    /// Reload callbacks registered through this agent, so shutdown can
    /// drop them without touching the cache's internal one.
    reload_callback_ids: Mutex<Vec<CallbackId>>,
}

impl AssetAgent {
    /// Creates an agent with the five built-in loader lanes.
    pub fn new(config: AgentConfig) -> Arc<Self> {
        Self::with_registry(config, Arc::new(LoaderLaneRegistry::with_default_lanes()))
    }

    /// Creates an agent over a caller-assembled lane registry.
    ///
    /// The registry doubles as the cache's reload source, so stale entries
    /// re-decode through the same lanes that produced them.
    pub fn with_registry(config: AgentConfig, registry: Arc<LoaderLaneRegistry>) -> Arc<Self> {
        let reload_source: Arc<dyn AssetReloadSource> = registry.clone();
        let cache = Arc::new(EvictionCache::new(config.cache).with_reload_source(reload_source));

        let mut search_paths = Vec::new();
        for path in config.search_paths {
            if !search_paths.contains(&path) {
                search_paths.push(path);
            }
        }

        let agent = Arc::new(AssetAgent {
            registry,
            cache,
            state: Mutex::new(AgentState {
                aliases: HashMap::new(),
                search_paths,
                dependencies: HashMap::new(),
            }),
            load_callbacks: Mutex::new(CallbackSet::new()),
            error_callbacks: Mutex::new(CallbackSet::new()),
            reload_callback_ids: Mutex::new(Vec::new()),
        });

        // The cache only holds a weak link back, so dropping the last
        // outside Arc still tears the agent down.
        let weak = Arc::downgrade(&agent);
        agent.cache.add_reload_callback(move |path, handle| {
            if let Some(agent) = weak.upgrade() {
                agent.on_asset_reloaded(path, handle);
            }
        });
        agent
    }

    /// Loads an asset with default options, serving from cache when possible.
    pub fn load(&self, path: &str) -> Result<AssetHandle, AssetError> {
        self.load_with(path, LoadOptions::default())
    }

    /// Loads an asset.
    ///
    /// The path is alias-resolved first; the result is cached under the
    /// resolved path. A cache-internal failure (a failed hot reload) is
    /// reported to error callbacks and then treated as a miss, so the
    /// asset is decoded fresh from disk.
    pub fn load_with(&self, path: &str, options: LoadOptions) -> Result<AssetHandle, AssetError> {
        let resolved = self.resolve_alias(path);
        if !options.force_reload {
            match self.cache.get(&resolved) {
                Ok(Some(handle)) => {
                    log::trace!("Cache hit for '{resolved}'");
                    return Ok(handle);
                }
                Ok(None) => {}
                Err(err) => {
                    log::warn!("Cache lookup for '{resolved}' failed: {err}");
                    self.fire_error_callbacks(&resolved, &err);
                }
            }
        }
        match self.load_fresh(&resolved, options) {
            Ok(handle) => {
                self.fire_load_callbacks(&resolved, &handle);
                Ok(handle)
            }
            Err(err) => {
                self.fire_error_callbacks(&resolved, &err);
                Err(err)
            }
        }
    }

    fn load_fresh(&self, resolved: &str, options: LoadOptions) -> Result<AssetHandle, AssetError> {
        let physical = self.locate(resolved)?;
        let mut asset = self.registry.load(&physical, options.kind_hint)?;
        asset.set_path(resolved);

        let dependencies = asset.metadata().dependencies.clone();
        let handle = AssetHandle::new(asset);
        self.cache.put(resolved, handle.clone(), options.policy);
        {
            let mut state = self.state.lock().unwrap();
            state
                .dependencies
                .insert(resolved.to_string(), dependencies.clone());
        }

        // The parent is cached before its dependencies load, so dependency
        // cycles terminate instead of recursing forever. Failures here are
        // logged and reported, never propagated to the parent.
        for dependency in dependencies {
            if let Err(err) = self.load(&dependency) {
                log::warn!("Failed to load dependency '{dependency}' of '{resolved}': {err}");
            }
        }
        Ok(handle)
    }

    /// Maps a logical path to the physical file to read.
    ///
    /// Absolute paths must exist as given. Relative paths are probed under
    /// each search path in order, then relative to the working directory.
    fn locate(&self, resolved: &str) -> Result<PathBuf, AssetError> {
        let mut searched = Vec::new();
        let direct = PathBuf::from(resolved);
        if direct.is_absolute() {
            if direct.is_file() {
                return Ok(direct);
            }
            searched.push(direct);
        } else {
            let search_paths = {
                let state = self.state.lock().unwrap();
                state.search_paths.clone()
            };
            for base in search_paths {
                let candidate = base.join(resolved);
                if candidate.is_file() {
                    return Ok(candidate);
                }
                searched.push(candidate);
            }
            if direct.is_file() {
                return Ok(direct);
            }
            searched.push(direct);
        }
        Err(AssetError::NotFound {
            path: resolved.to_string(),
            searched,
        })
    }

    fn resolve_alias(&self, path: &str) -> String {
        let state = self.state.lock().unwrap();
        match state.aliases.get(path) {
            Some(target) => target.clone(),
            None => path.to_string(),
        }
    }

    /// Fetches from cache without loading. Counts as a hit or miss.
    pub fn get(&self, path: &str) -> Option<AssetHandle> {
        let resolved = self.resolve_alias(path);
        match self.cache.get(&resolved) {
            Ok(found) => found,
            Err(err) => {
                log::warn!("Cache lookup for '{resolved}' failed: {err}");
                self.fire_error_callbacks(&resolved, &err);
                None
            }
        }
    }

    /// Evicts an asset from the cache and unloads it.
    pub fn unload(&self, path: &str) -> bool {
        let resolved = self.resolve_alias(path);
        let removed = self.cache.remove(&resolved);
        if removed {
            let mut state = self.state.lock().unwrap();
            state.dependencies.remove(&resolved);
        }
        removed
    }

    /// Re-decodes an asset from disk, replacing any cached entry.
    pub fn reload(&self, path: &str) -> Result<AssetHandle, AssetError> {
        self.load_with(
            path,
            LoadOptions {
                force_reload: true,
                ..LoadOptions::default()
            },
        )
    }

    /// Whether an asset is currently cached. Does not touch access stats.
    pub fn is_loaded(&self, path: &str) -> bool {
        self.cache.contains(&self.resolve_alias(path))
    }

    /// Maps `alias` to `target`. Re-adding an alias overwrites it.
    ///
    /// Resolution is single-level: an alias target naming another alias is
    /// used as-is.
    pub fn add_alias(&self, alias: impl Into<String>, target: impl Into<String>) {
        let alias = alias.into();
        let target = target.into();
        log::debug!("Alias '{alias}' -> '{target}'");
        self.state.lock().unwrap().aliases.insert(alias, target);
    }

    /// Removes an alias mapping.
    pub fn remove_alias(&self, alias: &str) -> bool {
        self.state.lock().unwrap().aliases.remove(alias).is_some()
    }

    /// A snapshot of the alias table.
    pub fn aliases(&self) -> HashMap<String, String> {
        self.state.lock().unwrap().aliases.clone()
    }

    /// Appends a search path. Duplicates are ignored.
    pub fn add_asset_path(&self, path: impl Into<PathBuf>) {
        let path = path.into();
        let mut state = self.state.lock().unwrap();
        if !state.search_paths.contains(&path) {
            log::debug!("Search path added: '{}'", path.display());
            state.search_paths.push(path);
        }
    }

    /// Removes a search path.
    pub fn remove_asset_path(&self, path: &Path) -> bool {
        let mut state = self.state.lock().unwrap();
        let before = state.search_paths.len();
        state.search_paths.retain(|existing| existing.as_path() != path);
        state.search_paths.len() != before
    }

    /// The search paths in probing order.
    pub fn asset_paths(&self) -> Vec<PathBuf> {
        self.state.lock().unwrap().search_paths.clone()
    }

    /// A snapshot of the cache counters.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Unloads everything and forgets all dependency edges.
    pub fn clear_cache(&self) {
        self.cache.clear();
        self.state.lock().unwrap().dependencies.clear();
    }

    /// Reassigns the retention policy of a cached asset.
    pub fn set_cache_policy(&self, path: &str, policy: CachePolicy) -> bool {
        self.cache.set_policy(&self.resolve_alias(path), policy)
    }

    /// The dependencies recorded for an asset at its last load.
    pub fn dependencies_of(&self, path: &str) -> Vec<String> {
        let resolved = self.resolve_alias(path);
        self.state
            .lock()
            .unwrap()
            .dependencies
            .get(&resolved)
            .cloned()
            .unwrap_or_default()
    }

    /// Pins a cached asset against `ReferenceBased` eviction.
    pub fn pin(&self, path: &str) -> Option<ReferenceGuard> {
        self.cache.register_reference(&self.resolve_alias(path))
    }

    /// The lane registry this agent dispatches through.
    pub fn registry(&self) -> &Arc<LoaderLaneRegistry> {
        &self.registry
    }

    /// The cache this agent stores into.
    pub fn cache(&self) -> &Arc<EvictionCache> {
        &self.cache
    }

    /// Registers a callback fired after every successful load.
    ///
    /// Receives the alias-resolved path and the loaded handle.
    pub fn add_load_callback(
        &self,
        callback: impl Fn(&str, &AssetHandle) + Send + Sync + 'static,
    ) -> CallbackId {
        let callback: Arc<LoadCallback> = Arc::new(callback);
        self.load_callbacks.lock().unwrap().add(callback)
    }

    /// Removes a load callback.
    pub fn remove_load_callback(&self, id: CallbackId) -> bool {
        self.load_callbacks.lock().unwrap().remove(id)
    }

    /// Registers a callback fired when an operation fails.
    ///
    /// Receives the alias-resolved path and the error.
    pub fn add_error_callback(
        &self,
        callback: impl Fn(&str, &AssetError) + Send + Sync + 'static,
    ) -> CallbackId {
        let callback: Arc<ErrorCallback> = Arc::new(callback);
        self.error_callbacks.lock().unwrap().add(callback)
    }

    /// Removes an error callback.
    pub fn remove_error_callback(&self, id: CallbackId) -> bool {
        self.error_callbacks.lock().unwrap().remove(id)
    }

    /// Registers a callback fired after every successful hot reload.
    pub fn add_reload_callback(
        &self,
        callback: impl Fn(&str, &AssetHandle) + Send + Sync + 'static,
    ) -> CallbackId {
        let id = self.cache.add_reload_callback(callback);
        self.reload_callback_ids.lock().unwrap().push(id);
        id
    }

    /// Removes a reload callback.
    pub fn remove_reload_callback(&self, id: CallbackId) -> bool {
        self.reload_callback_ids
            .lock()
            .unwrap()
            .retain(|existing| *existing != id);
        self.cache.remove_reload_callback(id)
    }

    /// Unloads all assets and drops every registered callback.
    ///
    /// Aliases and search paths survive, so the agent can keep serving
    /// loads afterwards.
    pub fn shutdown(&self) {
        log::info!("Asset agent shutting down");
        self.cache.clear();
        self.load_callbacks.lock().unwrap().clear();
        self.error_callbacks.lock().unwrap().clear();
        for id in self.reload_callback_ids.lock().unwrap().drain(..) {
            self.cache.remove_reload_callback(id);
        }
        self.state.lock().unwrap().dependencies.clear();
    }

    fn fire_load_callbacks(&self, resolved: &str, handle: &AssetHandle) {
        let callbacks = self.load_callbacks.lock().unwrap().snapshot();
        for callback in callbacks {
            run_isolated("load", resolved, || callback(resolved, handle));
        }
    }

    fn fire_error_callbacks(&self, resolved: &str, error: &AssetError) {
        let callbacks = self.error_callbacks.lock().unwrap().snapshot();
        for callback in callbacks {
            run_isolated("error", resolved, || callback(resolved, error));
        }
    }

    /// Invoked by the cache after a hot reload; refreshes dependency edges
    /// and loads any dependency the new contents introduced.
    fn on_asset_reloaded(&self, path: &str, handle: &AssetHandle) {
        log::info!("Asset '{path}' was hot reloaded");
        let dependencies = handle.metadata().dependencies;
        {
            let mut state = self.state.lock().unwrap();
            state
                .dependencies
                .insert(path.to_string(), dependencies.clone());
        }
        for dependency in dependencies {
            if self.cache.contains(&self.resolve_alias(&dependency)) {
                continue;
            }
            if let Err(err) = self.load(&dependency) {
                log::warn!(
                    "Failed to load dependency '{dependency}' of reloaded '{path}': {err}"
                );
            }
        }
    }
}
