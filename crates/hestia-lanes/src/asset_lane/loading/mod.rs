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

//! The built-in loader lanes, one per asset kind.

mod audio_lane;
mod data_lane;
mod font_lane;
mod image_lane;
mod theme_lane;

pub use audio_lane::AudioLoaderLane;
pub use data_lane::DataLoaderLane;
pub use font_lane::FontLoaderLane;
pub use image_lane::ImageLoaderLane;
pub use theme_lane::ThemeLoaderLane;

use super::DecodeError;
use hestia_core::asset::AssetMetadata;
use hestia_core::AssetError;
use std::path::Path;

/// Metadata every lane records: source path, size, mtime, and checksum.
pub(crate) fn base_metadata(path: &Path, bytes: &[u8]) -> AssetMetadata {
    AssetMetadata {
        source_path: path.to_path_buf(),
        size_bytes: bytes.len() as u64,
        modified_at_load: std::fs::metadata(path).and_then(|m| m.modified()).ok(),
        checksum: Some(blake3::hash(bytes).to_hex().to_string()),
        ..AssetMetadata::default()
    }
}

pub(crate) fn common_problems(bytes: &[u8]) -> Vec<String> {
    if bytes.is_empty() {
        vec!["file is empty".to_string()]
    } else {
        Vec::new()
    }
}

pub(crate) fn malformed(
    path: &Path,
    format: &'static str,
    details: impl Into<String>,
) -> AssetError {
    AssetError::load(
        path.display().to_string(),
        DecodeError::Malformed {
            path: path.display().to_string(),
            format,
            details: details.into(),
        },
    )
}

pub(crate) fn ext_lowercase(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Parses JSON or (by extension) YAML into a generic value tree.
pub(crate) fn parse_document(path: &Path, bytes: &[u8]) -> Result<serde_json::Value, String> {
    match ext_lowercase(path).as_deref() {
        Some("yaml") | Some("yml") => {
            serde_yaml::from_slice::<serde_json::Value>(bytes).map_err(|e| e.to_string())
        }
        _ => serde_json::from_slice::<serde_json::Value>(bytes).map_err(|e| e.to_string()),
    }
}

/// Pulls a top-level array of strings out of a document, e.g. `"tags"`.
pub(crate) fn string_list(value: &serde_json::Value, key: &str) -> Vec<String> {
    value
        .get(key)
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
