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
use std::fmt;

/// The closed set of asset categories the pipeline understands.
///
/// Every loader lane declares exactly one kind, and callers can use a kind
/// hint to disambiguate extensions claimed by several lanes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    /// Raster images (PNG, JPEG, BMP, TGA, GIF, WebP).
    Image,
    /// Font binaries (TTF, OTF, WOFF, bitmap fonts).
    Font,
    /// Audio clips (WAV, OGG, MP3, FLAC, AIFF, M4A).
    Audio,
    /// UI theme documents describing colors and widget styles.
    Theme,
    /// Structured or free-form data documents (JSON, YAML, XML, CSV, text).
    Data,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetKind::Image => write!(f, "Image"),
            AssetKind::Font => write!(f, "Font"),
            AssetKind::Audio => write!(f, "Audio"),
            AssetKind::Theme => write!(f, "Theme"),
            AssetKind::Data => write!(f, "Data"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_variant_names() {
        assert_eq!(AssetKind::Image.to_string(), "Image");
        assert_eq!(AssetKind::Theme.to_string(), "Theme");
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&AssetKind::Audio).unwrap();
        assert_eq!(json, "\"audio\"");
        let kind: AssetKind = serde_json::from_str("\"data\"").unwrap();
        assert_eq!(kind, AssetKind::Data);
    }
}
