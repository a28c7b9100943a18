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

//! # Hestia Lanes
//!
//! Loader lanes of the Hestia asset pipeline. Each lane owns one asset
//! kind: it claims file extensions, validates raw bytes before decoding,
//! and turns files into loaded [`hestia_core::asset::Asset`]s. The
//! [`asset_lane::LoaderLaneRegistry`] dispatches paths to lanes and doubles
//! as the cache's hot-reload source.

pub mod asset_lane;

pub use asset_lane::{AssetLoaderLane, DecodeError, LoaderLaneRegistry};
