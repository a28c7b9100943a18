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

//! The loader lane contract and its registry.
//!
//! A lane claims file extensions for one [`AssetKind`] and splits loading
//! into validation (cheap structural checks on the raw bytes) and decoding
//! (producing a loaded [`Asset`]). The provided [`AssetLoaderLane::load`]
//! always validates before it decodes.

pub mod loading;
mod registry;

pub use loading::*;
pub use registry::LoaderLaneRegistry;

use hestia_core::asset::{Asset, AssetKind};
use hestia_core::AssetError;
use std::path::Path;
use thiserror::Error;

/// Low-level failures produced while reading or decoding asset files.
///
/// These are always wrapped into [`AssetError::Load`] before they cross the
/// lane boundary, keeping the public error surface to a single type.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The file could not be read at all.
    #[error("failed to read '{path}': {source}")]
    Io {
        /// The file that could not be read.
        path: String,
        /// The originating I/O error.
        source: std::io::Error,
    },
    /// The file was read but its contents do not parse.
    #[error("malformed {format} content in '{path}': {details}")]
    Malformed {
        /// The file with unparseable contents.
        path: String,
        /// The format the lane expected (e.g. `"wav"`, `"theme"`).
        format: &'static str,
        /// What the decoder reported.
        details: String,
    },
    /// No registered lane accepts the path.
    #[error("no loader lane accepts '{path}' (kind hint: {kind_hint:?})")]
    NoLane {
        /// The path that found no lane.
        path: String,
        /// The kind filter that was in effect, if any.
        kind_hint: Option<AssetKind>,
    },
}

pub(crate) fn read_bytes(path: &Path) -> Result<Vec<u8>, AssetError> {
    std::fs::read(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            return AssetError::Validation {
                path: path.display().to_string(),
                problems: vec!["file does not exist".to_string()],
            };
        }
        AssetError::load(
            path.display().to_string(),
            DecodeError::Io {
                path: path.display().to_string(),
                source,
            },
        )
    })
}

/// A loader for one asset kind.
///
/// Implementations are stateless and shared behind `Arc`, so every method
/// takes `&self`.
pub trait AssetLoaderLane: Send + Sync {
    /// A unique, stable name identifying this lane.
    fn strategy_name(&self) -> &'static str;

    /// The asset kind this lane produces.
    fn kind(&self) -> AssetKind;

    /// The file extensions this lane claims, lowercase with a leading dot.
    fn extensions(&self) -> &[&str];

    /// Whether this lane accepts `path`, by extension and case-insensitively.
    fn can_load(&self, path: &Path) -> bool {
        let Some(extension) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        let extension = extension.to_ascii_lowercase();
        self.extensions()
            .iter()
            .any(|known| known.trim_start_matches('.') == extension)
    }

    /// Inspects raw bytes and reports every problem found, without decoding.
    ///
    /// An empty result means the file may be handed to [`AssetLoaderLane::decode`].
    fn validate(&self, path: &Path, bytes: &[u8]) -> Vec<String>;

    /// Decodes validated bytes into a loaded asset.
    fn decode(&self, path: &Path, bytes: &[u8]) -> Result<Asset, AssetError>;

    /// Reads, validates, and decodes `path` in one step.
    ///
    /// A file that is missing at read time is a validation failure, like
    /// any other problem found before decoding; other read errors surface
    /// as [`AssetError::Load`].
    fn load(&self, path: &Path) -> Result<Asset, AssetError> {
        let bytes = read_bytes(path)?;
        let problems = self.validate(path, &bytes);
        if !problems.is_empty() {
            return Err(AssetError::Validation {
                path: path.display().to_string(),
                problems,
            });
        }
        self.decode(path, &bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hestia_core::asset::AssetMetadata;

    struct StubLane;

    impl AssetLoaderLane for StubLane {
        fn strategy_name(&self) -> &'static str {
            "stub"
        }

        fn kind(&self) -> AssetKind {
            AssetKind::Data
        }

        fn extensions(&self) -> &[&str] {
            &[".txt", ".cfg"]
        }

        fn validate(&self, _path: &Path, bytes: &[u8]) -> Vec<String> {
            if bytes.is_empty() {
                vec!["file is empty".to_string()]
            } else {
                Vec::new()
            }
        }

        fn decode(&self, path: &Path, _bytes: &[u8]) -> Result<Asset, AssetError> {
            Ok(Asset::new(
                path.display().to_string(),
                AssetKind::Data,
                AssetMetadata::default(),
            ))
        }
    }

    #[test]
    fn can_load_matches_extensions_case_insensitively() {
        let lane = StubLane;
        assert!(lane.can_load(Path::new("notes/readme.TXT")));
        assert!(lane.can_load(Path::new("settings.cfg")));
        assert!(!lane.can_load(Path::new("image.png")));
        assert!(!lane.can_load(Path::new("no_extension")));
    }

    #[test]
    fn load_refuses_files_that_fail_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        std::fs::write(&path, b"").unwrap();

        let err = StubLane.load(&path).unwrap_err();
        assert!(matches!(err, AssetError::Validation { .. }));
    }

    #[test]
    fn load_reports_missing_files_as_validation_failures() {
        let err = StubLane
            .load(Path::new("definitely/missing.txt"))
            .unwrap_err();
        match err {
            AssetError::Validation { problems, .. } => {
                assert_eq!(problems, vec!["file does not exist".to_string()]);
            }
            other => panic!("expected a validation failure, got {other}"),
        }
    }

    #[test]
    fn load_reports_unreadable_files_as_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = StubLane.load(dir.path()).unwrap_err();
        assert!(matches!(err, AssetError::Load { .. }));
    }
}
