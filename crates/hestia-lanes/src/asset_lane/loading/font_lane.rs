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

//! Implements the loader lane for font files.

use super::{base_metadata, common_problems};
use crate::asset_lane::AssetLoaderLane;
use hestia_core::asset::{Asset, AssetKind, AssetPayload, FontData};
use hestia_core::AssetError;
use std::path::Path;

/// Signatures of the font containers the lane recognizes: SFNT flavors
/// (TrueType, OpenType, collections), WOFF 1/2, X11 BDF, and AngelCode
/// bitmap fonts in both their binary and text forms.
fn known_signature(bytes: &[u8]) -> bool {
    const SIGNATURES: [&[u8]; 8] = [
        &[0x00, 0x01, 0x00, 0x00],
        b"OTTO",
        b"true",
        b"typ1",
        b"ttcf",
        b"wOFF",
        b"wOF2",
        b"STARTFONT",
    ];
    SIGNATURES.iter().any(|signature| bytes.starts_with(signature))
        || bytes.starts_with(b"BMF")
        || bytes.starts_with(b"info")
}

/// An `AssetLoaderLane` that keeps font binaries opaque.
///
/// Shaping and rasterization belong to the text stack; the lane checks the
/// container signature and derives a family name from the file stem.
#[derive(Debug, Default)]
pub struct FontLoaderLane;

impl FontLoaderLane {
    /// Creates a new instance of `FontLoaderLane`.
    pub fn new() -> Self {
        Self
    }
}

impl AssetLoaderLane for FontLoaderLane {
    fn strategy_name(&self) -> &'static str {
        "font_loader"
    }

    fn kind(&self) -> AssetKind {
        AssetKind::Font
    }

    fn extensions(&self) -> &[&str] {
        &[".ttf", ".otf", ".bdf", ".fnt", ".woff", ".woff2"]
    }

    fn validate(&self, _path: &Path, bytes: &[u8]) -> Vec<String> {
        let mut problems = common_problems(bytes);
        if problems.is_empty() {
            let head = &bytes[..bytes.len().min(16)];
            if !known_signature(head) {
                problems.push("unrecognized font container signature".to_string());
            }
        }
        problems
    }

    fn decode(&self, path: &Path, bytes: &[u8]) -> Result<Asset, AssetError> {
        let family = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("unknown")
            .to_string();

        let mut metadata = base_metadata(path, bytes);
        metadata
            .properties
            .insert("family".to_string(), family.clone());

        let payload = AssetPayload::Font(FontData {
            bytes: bytes.to_vec(),
            family,
        });
        Ok(Asset::loaded(
            path.display().to_string(),
            AssetKind::Font,
            metadata,
            payload,
        ))
    }
}
