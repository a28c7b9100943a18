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

//! Implements the loader lane for UI theme documents.

use super::{base_metadata, common_problems, malformed, parse_document, string_list};
use crate::asset_lane::AssetLoaderLane;
use hestia_core::asset::{Asset, AssetKind, AssetPayload, ThemeData};
use hestia_core::AssetError;
use std::collections::HashMap;
use std::path::Path;

/// An `AssetLoaderLane` that parses theme documents into named colors and
/// per-widget style blocks.
///
/// Themes also support `"dependencies"` and `"tags"` arrays at the top
/// level; dependencies feed the agent's recursive loading.
#[derive(Debug, Default)]
pub struct ThemeLoaderLane;

impl ThemeLoaderLane {
    /// Creates a new instance of `ThemeLoaderLane`.
    pub fn new() -> Self {
        Self
    }
}

impl AssetLoaderLane for ThemeLoaderLane {
    fn strategy_name(&self) -> &'static str {
        "theme_loader"
    }

    fn kind(&self) -> AssetKind {
        AssetKind::Theme
    }

    fn extensions(&self) -> &[&str] {
        &[".json", ".yaml", ".yml"]
    }

    fn validate(&self, path: &Path, bytes: &[u8]) -> Vec<String> {
        let mut problems = common_problems(bytes);
        if problems.is_empty() {
            // Parsing is the real check here; the parse result is cheap
            // enough to throw away.
            match parse_document(path, bytes) {
                Ok(value) if !value.is_object() => {
                    problems.push("top level must be an object".to_string());
                }
                Ok(_) => {}
                Err(details) => problems.push(details),
            }
        }
        problems
    }

    fn decode(&self, path: &Path, bytes: &[u8]) -> Result<Asset, AssetError> {
        let value =
            parse_document(path, bytes).map_err(|details| malformed(path, "theme", details))?;
        let Some(object) = value.as_object() else {
            return Err(malformed(path, "theme", "top level must be an object"));
        };

        let name = object
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or("unnamed")
            .to_string();

        let mut colors = HashMap::new();
        if let Some(color_map) = object.get("colors").and_then(|v| v.as_object()) {
            for (key, value) in color_map {
                if let Some(text) = value.as_str() {
                    colors.insert(key.clone(), text.to_string());
                }
            }
        }

        let mut styles = HashMap::new();
        if let Some(style_map) = object.get("styles").and_then(|v| v.as_object()) {
            for (key, value) in style_map {
                styles.insert(key.clone(), value.clone());
            }
        }

        let mut metadata = base_metadata(path, bytes);
        metadata.dependencies = string_list(&value, "dependencies");
        metadata.tags = string_list(&value, "tags");

        let payload = AssetPayload::Theme(ThemeData {
            name,
            colors,
            styles,
            raw_len: bytes.len() as u64,
        });
        Ok(Asset::loaded(
            path.display().to_string(),
            AssetKind::Theme,
            metadata,
            payload,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_THEME: &str = r##"{
        "name": "Midnight",
        "colors": { "background": "#101020", "accent": "#e0b040" },
        "styles": { "button": { "radius": 4 } },
        "dependencies": ["ui/icons.png"],
        "tags": ["dark"]
    }"##;

    #[test]
    fn test_theme_decode_extracts_colors_and_styles() {
        let lane = ThemeLoaderLane::new();
        let asset = lane
            .decode(Path::new("ui/midnight.json"), TEST_THEME.as_bytes())
            .expect("decoding a valid theme should not fail");

        match asset.payload() {
            Some(AssetPayload::Theme(theme)) => {
                assert_eq!(theme.name, "Midnight");
                assert_eq!(
                    theme.colors.get("background").map(String::as_str),
                    Some("#101020")
                );
                assert!(theme.styles.contains_key("button"));
                assert_eq!(theme.raw_len, TEST_THEME.len() as u64);
            }
            other => panic!("expected a theme payload, got {other:?}"),
        }
        assert_eq!(asset.metadata().dependencies, vec!["ui/icons.png"]);
        assert_eq!(asset.metadata().tags, vec!["dark"]);
    }

    #[test]
    fn test_theme_without_optional_sections_still_decodes() {
        let lane = ThemeLoaderLane::new();
        let asset = lane
            .decode(Path::new("ui/bare.json"), b"{}")
            .expect("an empty object is a valid theme");

        match asset.payload() {
            Some(AssetPayload::Theme(theme)) => {
                assert_eq!(theme.name, "unnamed");
                assert!(theme.colors.is_empty());
                assert!(theme.styles.is_empty());
            }
            other => panic!("expected a theme payload, got {other:?}"),
        }
    }

    #[test]
    fn test_yaml_theme_parses_like_json() {
        let lane = ThemeLoaderLane::new();
        let source = "name: Daylight\ncolors:\n  background: \"#fafafa\"\ndependencies:\n  - ui/cursor.png\n";
        let asset = lane
            .decode(Path::new("ui/daylight.yaml"), source.as_bytes())
            .expect("decoding a valid YAML theme should not fail");

        match asset.payload() {
            Some(AssetPayload::Theme(theme)) => {
                assert_eq!(theme.name, "Daylight");
                assert_eq!(
                    theme.colors.get("background").map(String::as_str),
                    Some("#fafafa")
                );
            }
            other => panic!("expected a theme payload, got {other:?}"),
        }
        assert_eq!(asset.metadata().dependencies, vec!["ui/cursor.png"]);
    }

    #[test]
    fn test_validate_flags_broken_json() {
        let lane = ThemeLoaderLane::new();
        let problems = lane.validate(Path::new("ui/broken.json"), b"{ not json");
        assert_eq!(problems.len(), 1, "expected exactly one problem");
    }

    #[test]
    fn test_validate_flags_non_object_documents() {
        let lane = ThemeLoaderLane::new();
        let problems = lane.validate(Path::new("ui/list.json"), b"[1, 2, 3]");
        assert_eq!(problems, vec!["top level must be an object".to_string()]);
    }
}
