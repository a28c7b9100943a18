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

/// Decoded image bytes plus the dimensions read from the header.
#[derive(Debug, Clone)]
pub struct ImageData {
    /// The raw encoded file contents.
    pub bytes: Vec<u8>,
    /// Pixel width reported by the image header.
    pub width: u32,
    /// Pixel height reported by the image header.
    pub height: u32,
    /// The container format, when it could be identified (e.g. `"Png"`).
    pub format: Option<String>,
}

/// Font file contents plus the family name derived for it.
#[derive(Debug, Clone)]
pub struct FontData {
    /// The raw font file contents.
    pub bytes: Vec<u8>,
    /// The family name the font is registered under.
    pub family: String,
}

/// Audio clip contents plus the stream parameters probed from the container.
#[derive(Debug, Clone)]
pub struct AudioData {
    /// The raw encoded file contents.
    pub bytes: Vec<u8>,
    /// Samples per second, when the container reported it.
    pub sample_rate: Option<u32>,
    /// Channel count, when the container reported it.
    pub channels: Option<u16>,
    /// Clip duration in seconds, when it could be computed.
    pub duration_secs: Option<f64>,
}

/// A parsed UI theme document.
#[derive(Debug, Clone)]
pub struct ThemeData {
    /// The theme's display name.
    pub name: String,
    /// Named color values, kept as the strings the document used.
    pub colors: HashMap<String, String>,
    /// Per-widget style blocks, kept structured for consumers to interpret.
    pub styles: HashMap<String, serde_json::Value>,
    /// Size of the source document in bytes.
    pub raw_len: u64,
}

/// A generic data document, structured when the format allows it.
#[derive(Debug, Clone)]
pub struct DataDocument {
    /// The document contents.
    pub body: DocumentBody,
    /// Size of the source document in bytes.
    pub raw_len: u64,
}

/// The two representations a data document can take.
#[derive(Debug, Clone)]
pub enum DocumentBody {
    /// JSON or YAML parsed into a generic value tree.
    Structured(serde_json::Value),
    /// Anything else, kept as text.
    Text(String),
}

/// The in-memory representation of a loaded asset, one variant per
/// [`AssetKind`].
#[derive(Debug, Clone)]
pub enum AssetPayload {
    /// See [`ImageData`].
    Image(ImageData),
    /// See [`FontData`].
    Font(FontData),
    /// See [`AudioData`].
    Audio(AudioData),
    /// See [`ThemeData`].
    Theme(ThemeData),
    /// See [`DataDocument`].
    Data(DataDocument),
}

impl AssetPayload {
    /// The kind this payload belongs to.
    pub fn kind(&self) -> AssetKind {
        match self {
            AssetPayload::Image(_) => AssetKind::Image,
            AssetPayload::Font(_) => AssetKind::Font,
            AssetPayload::Audio(_) => AssetKind::Audio,
            AssetPayload::Theme(_) => AssetKind::Theme,
            AssetPayload::Data(_) => AssetKind::Data,
        }
    }

    /// An estimate of the memory this payload occupies, in bytes.
    ///
    /// The cache charges entries against its memory budget using this value,
    /// so it only needs to be proportional, not exact.
    pub fn estimated_size(&self) -> u64 {
        match self {
            AssetPayload::Image(image) => image.bytes.len() as u64,
            AssetPayload::Font(font) => font.bytes.len() as u64,
            AssetPayload::Audio(audio) => audio.bytes.len() as u64,
            AssetPayload::Theme(theme) => theme.raw_len,
            AssetPayload::Data(document) => document.raw_len,
        }
    }
}
