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

//! Implements the catch-all loader lane for data documents.

use super::{base_metadata, common_problems, ext_lowercase, malformed, parse_document, string_list};
use crate::asset_lane::AssetLoaderLane;
use hestia_core::asset::{Asset, AssetKind, AssetPayload, DataDocument, DocumentBody};
use hestia_core::AssetError;
use std::path::Path;

fn is_structured(extension: Option<&str>) -> bool {
    matches!(extension, Some("json") | Some("yaml") | Some("yml"))
}

/// An `AssetLoaderLane` for generic data files.
///
/// JSON and YAML are parsed into a structured value tree; XML, CSV, and
/// plain text are kept as text for the consumer to interpret.
#[derive(Debug, Default)]
pub struct DataLoaderLane;

impl DataLoaderLane {
    /// Creates a new instance of `DataLoaderLane`.
    pub fn new() -> Self {
        Self
    }
}

impl AssetLoaderLane for DataLoaderLane {
    fn strategy_name(&self) -> &'static str {
        "data_loader"
    }

    fn kind(&self) -> AssetKind {
        AssetKind::Data
    }

    fn extensions(&self) -> &[&str] {
        &[".json", ".yaml", ".yml", ".xml", ".csv", ".txt"]
    }

    fn validate(&self, path: &Path, bytes: &[u8]) -> Vec<String> {
        let mut problems = common_problems(bytes);
        if problems.is_empty() && is_structured(ext_lowercase(path).as_deref()) {
            if let Err(details) = parse_document(path, bytes) {
                problems.push(details);
            }
        }
        problems
    }

    fn decode(&self, path: &Path, bytes: &[u8]) -> Result<Asset, AssetError> {
        let mut metadata = base_metadata(path, bytes);
        let body = if is_structured(ext_lowercase(path).as_deref()) {
            let value =
                parse_document(path, bytes).map_err(|details| malformed(path, "data", details))?;
            metadata.dependencies = string_list(&value, "dependencies");
            metadata.tags = string_list(&value, "tags");
            DocumentBody::Structured(value)
        } else {
            DocumentBody::Text(String::from_utf8_lossy(bytes).into_owned())
        };

        let payload = AssetPayload::Data(DataDocument {
            body,
            raw_len: bytes.len() as u64,
        });
        Ok(Asset::loaded(
            path.display().to_string(),
            AssetKind::Data,
            metadata,
            payload,
        ))
    }
}
