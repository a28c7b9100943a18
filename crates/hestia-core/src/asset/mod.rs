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

//! The asset model: kinds, metadata, payloads, handles, and discovery.
//!
//! An [`Asset`] couples a logical path with optional decoded contents.
//! Loaders produce assets, the cache stores them behind [`AssetHandle`]s,
//! and hot reload swaps payloads in place through [`AssetReloadSource`].

mod discovery;
mod handle;
mod kind;
mod metadata;
mod payload;

pub use discovery::*;
pub use handle::*;
pub use kind::*;
pub use metadata::*;
pub use payload::*;

use crate::error::AssetError;
use std::time::SystemTime;

/// A single loadable resource identified by a logical path.
///
/// The path is the asset's identity throughout the pipeline: cache keys,
/// dependency edges, and callbacks all use it. The payload is optional so
/// the same value models both a loaded asset and one that was unloaded to
/// free memory.
#[derive(Debug)]
pub struct Asset {
    path: String,
    kind: AssetKind,
    metadata: AssetMetadata,
    payload: Option<AssetPayload>,
    load_time: Option<SystemTime>,
}

impl Asset {
    /// Creates an unloaded asset.
    pub fn new(path: impl Into<String>, kind: AssetKind, metadata: AssetMetadata) -> Self {
        Asset {
            path: path.into(),
            kind,
            metadata,
            payload: None,
            load_time: None,
        }
    }

    /// Creates an asset that is loaded from the start.
    pub fn loaded(
        path: impl Into<String>,
        kind: AssetKind,
        metadata: AssetMetadata,
        payload: AssetPayload,
    ) -> Self {
        let mut asset = Asset::new(path, kind, AssetMetadata::default());
        asset.commit(metadata, payload);
        asset
    }

    /// Installs freshly decoded contents, replacing whatever was there.
    ///
    /// Metadata and payload are swapped together so observers never see a
    /// payload paired with the previous file's metadata.
    pub fn commit(&mut self, metadata: AssetMetadata, payload: AssetPayload) {
        self.metadata = metadata;
        self.payload = Some(payload);
        self.load_time = Some(SystemTime::now());
    }

    /// Drops the payload, keeping path, kind, and metadata.
    pub fn unload(&mut self) {
        self.payload = None;
        self.load_time = None;
    }

    /// Whether the asset currently holds a payload.
    pub fn is_loaded(&self) -> bool {
        self.payload.is_some()
    }

    /// The asset's logical path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Rewrites the logical path.
    ///
    /// Loaders build assets keyed by the physical file they read; the agent
    /// calls this to re-key the asset under the alias-resolved request path
    /// before handing it to the cache.
    pub fn set_path(&mut self, path: impl Into<String>) {
        self.path = path.into();
    }

    /// The asset's kind.
    pub fn kind(&self) -> AssetKind {
        self.kind
    }

    /// The metadata captured at load time.
    pub fn metadata(&self) -> &AssetMetadata {
        &self.metadata
    }

    /// The decoded payload, if the asset is loaded.
    pub fn payload(&self) -> Option<&AssetPayload> {
        self.payload.as_ref()
    }

    /// When the current payload was installed.
    pub fn load_time(&self) -> Option<SystemTime> {
        self.load_time
    }

    /// The estimated payload size in bytes, zero when unloaded.
    pub fn estimated_size(&self) -> u64 {
        self.payload.as_ref().map_or(0, AssetPayload::estimated_size)
    }

    /// Whether the source file changed on disk since the payload was read.
    ///
    /// Unloaded assets are never stale. For a loaded asset, a source file
    /// that disappeared or became unreadable counts as stale so the reload
    /// path can surface the problem; an intact file is stale only when its
    /// modification time moved past the one recorded at load.
    pub fn is_stale(&self) -> bool {
        if !self.is_loaded() {
            return false;
        }
        let Ok(current) = std::fs::metadata(&self.metadata.source_path).and_then(|m| m.modified())
        else {
            return true;
        };
        match self.metadata.modified_at_load {
            Some(recorded) => current > recorded,
            None => false,
        }
    }

    /// Splits the asset into its metadata and payload.
    pub fn into_parts(self) -> (AssetMetadata, Option<AssetPayload>) {
        (self.metadata, self.payload)
    }
}

/// Re-decodes an asset from its source in place.
///
/// Implementations must decode first and mutate the asset only on success,
/// so a failed reload leaves the previous payload intact for the caller to
/// dispose of.
pub trait AssetReloadSource: Send + Sync {
    /// Reloads `asset` from its recorded source path.
    fn reload(&self, asset: &mut Asset) -> Result<(), AssetError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn text_payload(contents: &str) -> AssetPayload {
        AssetPayload::Data(DataDocument {
            body: DocumentBody::Text(contents.to_string()),
            raw_len: contents.len() as u64,
        })
    }

    #[test]
    fn commit_and_unload_round_trip() {
        let mut asset = Asset::new("notes/readme.txt", AssetKind::Data, AssetMetadata::default());
        assert!(!asset.is_loaded());
        assert_eq!(asset.estimated_size(), 0);

        asset.commit(AssetMetadata::default(), text_payload("hello"));
        assert!(asset.is_loaded());
        assert_eq!(asset.estimated_size(), 5);
        assert!(asset.load_time().is_some());

        asset.unload();
        assert!(!asset.is_loaded());
        assert_eq!(asset.estimated_size(), 0);
        assert!(asset.load_time().is_none());
        assert_eq!(asset.path(), "notes/readme.txt");
    }

    #[test]
    fn unloaded_asset_is_never_stale() {
        let metadata = AssetMetadata {
            source_path: "definitely/not/a/real/file.txt".into(),
            modified_at_load: Some(SystemTime::UNIX_EPOCH),
            ..AssetMetadata::default()
        };
        let asset = Asset::new("a.txt", AssetKind::Data, metadata);
        assert!(!asset.is_stale());
    }

    #[test]
    fn missing_source_file_makes_loaded_asset_stale() {
        let metadata = AssetMetadata {
            source_path: "definitely/not/a/real/file.txt".into(),
            modified_at_load: Some(SystemTime::UNIX_EPOCH),
            ..AssetMetadata::default()
        };
        let asset = Asset::loaded("a.txt", AssetKind::Data, metadata, text_payload("x"));
        assert!(asset.is_stale());
    }

    #[test]
    fn missing_file_is_stale_even_without_a_recorded_mtime() {
        let metadata = AssetMetadata {
            source_path: "definitely/not/a/real/file.txt".into(),
            ..AssetMetadata::default()
        };
        let asset = Asset::loaded("a.txt", AssetKind::Data, metadata, text_payload("x"));
        assert!(asset.is_stale());
    }

    #[test]
    fn existing_file_without_a_recorded_mtime_is_not_stale() {
        let dir = tempfile::tempdir().unwrap();
        let source_path = dir.path().join("tuning.txt");
        fs::write(&source_path, "speed = 10").unwrap();

        let metadata = AssetMetadata {
            source_path,
            ..AssetMetadata::default()
        };
        let asset = Asset::loaded("tuning.txt", AssetKind::Data, metadata, text_payload("x"));
        assert!(!asset.is_stale());
    }

    #[test]
    fn staleness_follows_the_backing_file_mtime() {
        let dir = tempfile::tempdir().unwrap();
        let source_path = dir.path().join("tuning.txt");
        fs::write(&source_path, "speed = 10").unwrap();
        let on_disk = fs::metadata(&source_path).and_then(|m| m.modified()).unwrap();

        let current = Asset::loaded(
            "tuning.txt",
            AssetKind::Data,
            AssetMetadata {
                source_path: source_path.clone(),
                modified_at_load: Some(on_disk),
                ..AssetMetadata::default()
            },
            text_payload("speed = 10"),
        );
        assert!(!current.is_stale());

        let behind = Asset::loaded(
            "tuning.txt",
            AssetKind::Data,
            AssetMetadata {
                source_path,
                modified_at_load: Some(SystemTime::UNIX_EPOCH),
                ..AssetMetadata::default()
            },
            text_payload("speed = 10"),
        );
        assert!(behind.is_stale());
    }

    #[test]
    fn set_path_rewrites_identity() {
        let mut asset =
            Asset::new("assets/ui/theme.json", AssetKind::Theme, AssetMetadata::default());
        asset.set_path("ui/theme.json");
        assert_eq!(asset.path(), "ui/theme.json");
    }
}
