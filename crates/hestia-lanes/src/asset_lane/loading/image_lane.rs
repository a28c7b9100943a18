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

//! Implements the loader lane for raster image files.

use super::{base_metadata, common_problems, ext_lowercase, malformed};
use crate::asset_lane::AssetLoaderLane;
use hestia_core::asset::{Asset, AssetKind, AssetPayload, ImageData};
use hestia_core::AssetError;
use image::{ImageFormat, ImageReader};
use std::io::Cursor;
use std::path::Path;

/// An `AssetLoaderLane` that reads image headers for dimensions and keeps
/// the encoded bytes as the payload.
///
/// Full pixel decoding is left to the consumer; the lane only proves the
/// file is a readable image.
#[derive(Debug, Default)]
pub struct ImageLoaderLane;

impl ImageLoaderLane {
    /// Creates a new instance of `ImageLoaderLane`.
    pub fn new() -> Self {
        Self
    }
}

impl AssetLoaderLane for ImageLoaderLane {
    fn strategy_name(&self) -> &'static str {
        "image_loader"
    }

    fn kind(&self) -> AssetKind {
        AssetKind::Image
    }

    fn extensions(&self) -> &[&str] {
        &[".png", ".jpg", ".jpeg", ".bmp", ".gif", ".tga", ".webp"]
    }

    fn validate(&self, path: &Path, bytes: &[u8]) -> Vec<String> {
        let mut problems = common_problems(bytes);
        // TGA carries no magic number, so content sniffing only applies to
        // the other formats.
        if problems.is_empty() && ext_lowercase(path).as_deref() != Some("tga") {
            let head = &bytes[..bytes.len().min(32)];
            if image::guess_format(head).is_err() {
                problems.push("content does not match any known image format".to_string());
            }
        }
        problems
    }

    fn decode(&self, path: &Path, bytes: &[u8]) -> Result<Asset, AssetError> {
        let mut reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| malformed(path, "image", e.to_string()))?;
        if reader.format().is_none() {
            if let Ok(format) = ImageFormat::from_path(path) {
                reader.set_format(format);
            }
        }
        let format = reader.format().map(|f| format!("{f:?}"));
        let (width, height) = reader
            .into_dimensions()
            .map_err(|e| malformed(path, "image", e.to_string()))?;

        let payload = AssetPayload::Image(ImageData {
            bytes: bytes.to_vec(),
            width,
            height,
            format,
        });
        Ok(Asset::loaded(
            path.display().to_string(),
            AssetKind::Image,
            base_metadata(path, bytes),
            payload,
        ))
    }
}
