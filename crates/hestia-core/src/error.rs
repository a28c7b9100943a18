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

//! Defines the error taxonomy for asset loading, validation, and caching.

use std::error::Error;
use std::fmt;
use std::path::PathBuf;

/// The unified error type surfaced by every pipeline operation.
///
/// Callers pattern-match on the variant instead of inspecting error text;
/// the underlying cause is preserved through [`Error::source`] where one
/// exists.
#[derive(Debug)]
pub enum AssetError {
    /// The requested path could not be resolved to an existing file.
    NotFound {
        /// The path as requested (after alias resolution).
        path: String,
        /// Every candidate location that was checked, in order.
        searched: Vec<PathBuf>,
    },
    /// A loader failed while producing an asset from a file.
    Load {
        /// The path of the asset that failed to load.
        path: String,
        /// The underlying cause.
        source_error: Box<dyn Error + Send + Sync>,
    },
    /// Pre-load validation found problems with the file.
    Validation {
        /// The path of the asset that failed validation.
        path: String,
        /// A human-readable description of each problem found.
        problems: Vec<String>,
    },
    /// A cache-internal operation failed.
    Cache {
        /// The path of the affected entry.
        path: String,
        /// The cache operation that failed (e.g. `"hot_reload"`).
        operation: &'static str,
        /// The underlying cause, when one exists.
        source_error: Option<Box<dyn Error + Send + Sync>>,
    },
    /// A declared dependency could not be loaded.
    ///
    /// Reserved for a strict dependency mode. The default pipeline logs
    /// dependency failures and continues instead of raising this.
    Dependency {
        /// The asset whose dependency failed.
        path: String,
        /// The dependency that could not be loaded.
        dependency: String,
    },
}

impl AssetError {
    /// Wraps an arbitrary cause into an [`AssetError::Load`].
    pub fn load(
        path: impl Into<String>,
        cause: impl Into<Box<dyn Error + Send + Sync>>,
    ) -> Self {
        AssetError::Load {
            path: path.into(),
            source_error: cause.into(),
        }
    }

    /// Builds the cache error raised when an in-place hot reload fails.
    pub fn hot_reload(
        path: impl Into<String>,
        cause: impl Into<Box<dyn Error + Send + Sync>>,
    ) -> Self {
        AssetError::Cache {
            path: path.into(),
            operation: "hot_reload",
            source_error: Some(cause.into()),
        }
    }

    /// The asset path this error refers to.
    pub fn path(&self) -> &str {
        match self {
            AssetError::NotFound { path, .. }
            | AssetError::Load { path, .. }
            | AssetError::Validation { path, .. }
            | AssetError::Cache { path, .. }
            | AssetError::Dependency { path, .. } => path,
        }
    }
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::NotFound { path, searched } => {
                write!(f, "Asset not found: '{path}' (searched: {searched:?})")
            }
            AssetError::Load { path, source_error } => {
                write!(f, "Failed to load asset '{path}': {source_error}")
            }
            AssetError::Validation { path, problems } => {
                write!(
                    f,
                    "Validation failed for '{path}': {}",
                    problems.join("; ")
                )
            }
            AssetError::Cache {
                path,
                operation,
                source_error,
            } => match source_error {
                Some(cause) => {
                    write!(f, "Cache operation '{operation}' failed for '{path}': {cause}")
                }
                None => write!(f, "Cache operation '{operation}' failed for '{path}'"),
            },
            AssetError::Dependency { path, dependency } => {
                write!(f, "Failed to load dependency '{dependency}' of '{path}'")
            }
        }
    }
}

impl Error for AssetError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AssetError::Load { source_error, .. } => Some(source_error.as_ref()),
            AssetError::Cache {
                source_error: Some(cause),
                ..
            } => Some(cause.as_ref()),
            _ => None,
        }
    }
}
