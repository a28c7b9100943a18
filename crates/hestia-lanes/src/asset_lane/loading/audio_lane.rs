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

//! Implements the loader lane for audio clips.

use super::{base_metadata, common_problems, ext_lowercase, malformed};
use crate::asset_lane::AssetLoaderLane;
use hestia_core::asset::{Asset, AssetKind, AssetPayload, AudioData};
use hestia_core::AssetError;
use std::io::Cursor;
use std::path::Path;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

fn probe_wav(path: &Path, bytes: &[u8]) -> Result<AudioData, AssetError> {
    let reader = hound::WavReader::new(Cursor::new(bytes))
        .map_err(|e| malformed(path, "wav", e.to_string()))?;
    let spec = reader.spec();
    let frames = reader.duration();
    let duration_secs = if spec.sample_rate > 0 {
        Some(f64::from(frames) / f64::from(spec.sample_rate))
    } else {
        None
    };
    Ok(AudioData {
        bytes: bytes.to_vec(),
        sample_rate: Some(spec.sample_rate),
        channels: Some(spec.channels),
        duration_secs,
    })
}

/// Probes non-WAV containers (OGG, MP3, FLAC, AIFF, M4A) for stream
/// parameters.
fn probe_container(path: &Path, bytes: &[u8], extension: &str) -> Result<AudioData, AssetError> {
    let stream = MediaSourceStream::new(Box::new(Cursor::new(bytes.to_vec())), Default::default());
    let mut hint = Hint::new();
    hint.with_extension(extension);
    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            stream,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| malformed(path, "audio", e.to_string()))?;

    let mut sample_rate = None;
    let mut channels = None;
    let mut duration_secs = None;
    if let Some(track) = probed.format.default_track() {
        let params = &track.codec_params;
        sample_rate = params.sample_rate;
        channels = params.channels.map(|c| c.count() as u16);
        if let (Some(rate), Some(frames)) = (params.sample_rate, params.n_frames) {
            if rate > 0 {
                duration_secs = Some(frames as f64 / f64::from(rate));
            }
        }
    }
    Ok(AudioData {
        bytes: bytes.to_vec(),
        sample_rate,
        channels,
        duration_secs,
    })
}

/// An `AssetLoaderLane` that probes audio containers for their stream
/// parameters and keeps the encoded bytes as the payload.
///
/// WAV goes through `hound`; everything else goes through `symphonia`'s
/// format probe. Decoding to PCM is the playback stack's job.
#[derive(Debug, Default)]
pub struct AudioLoaderLane;

impl AudioLoaderLane {
    /// Creates a new instance of `AudioLoaderLane`.
    pub fn new() -> Self {
        Self
    }
}

impl AssetLoaderLane for AudioLoaderLane {
    fn strategy_name(&self) -> &'static str {
        "audio_loader"
    }

    fn kind(&self) -> AssetKind {
        AssetKind::Audio
    }

    fn extensions(&self) -> &[&str] {
        &[".wav", ".ogg", ".mp3", ".flac", ".aiff", ".m4a"]
    }

    fn validate(&self, path: &Path, bytes: &[u8]) -> Vec<String> {
        let mut problems = common_problems(bytes);
        if !problems.is_empty() {
            return problems;
        }
        match ext_lowercase(path).as_deref() {
            Some("wav") => {
                let riff = bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WAVE";
                if !riff {
                    problems.push("missing RIFF/WAVE header".to_string());
                }
            }
            Some("ogg") => {
                if !bytes.starts_with(b"OggS") {
                    problems.push("missing OggS capture pattern".to_string());
                }
            }
            Some("flac") => {
                if !bytes.starts_with(b"fLaC") {
                    problems.push("missing fLaC stream marker".to_string());
                }
            }
            Some("aiff") => {
                if !bytes.starts_with(b"FORM") {
                    problems.push("missing FORM chunk header".to_string());
                }
            }
            Some("m4a") => {
                let ftyp = bytes.len() >= 8 && &bytes[4..8] == b"ftyp";
                if !ftyp {
                    problems.push("missing ftyp box".to_string());
                }
            }
            // MP3 files may start with an ID3 tag or directly with a frame
            // sync, so there is no single signature to check.
            _ => {}
        }
        problems
    }

    fn decode(&self, path: &Path, bytes: &[u8]) -> Result<Asset, AssetError> {
        let extension = ext_lowercase(path).unwrap_or_default();
        let audio = if extension == "wav" {
            probe_wav(path, bytes)?
        } else {
            probe_container(path, bytes, &extension)?
        };
        Ok(Asset::loaded(
            path.display().to_string(),
            AssetKind::Audio,
            base_metadata(path, bytes),
            AssetPayload::Audio(audio),
        ))
    }
}
