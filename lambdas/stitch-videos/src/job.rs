use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::assets::AssetAvailability;
use crate::event::FolderContext;

const AUTO: &str = "auto";

/// An encoding profile on the transcoder, and the suffix of its output key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPreset {
    pub label: String,
    pub preset_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid output preset list {0:?}, expected `label=presetId[,label=presetId...]`")]
pub struct PresetListError(String);

/// A parsed `OUTPUT_PRESETS` value, e.g. `720p.mp4=1351620000001-000010,720p.webm=1351620000001-100240`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetList(pub Vec<OutputPreset>);

impl FromStr for PresetList {
    type Err = PresetListError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let presets = s
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| match entry.split_once('=') {
                Some((label, id)) if !label.trim().is_empty() && !id.trim().is_empty() => Ok(OutputPreset {
                    label: label.trim().to_string(),
                    preset_id: id.trim().to_string(),
                }),
                _ => Err(PresetListError(s.to_string())),
            })
            .collect::<Result<Vec<_>, _>>()?;

        if presets.is_empty() {
            return Err(PresetListError(s.to_string()));
        }
        Ok(PresetList(presets))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct InputSpec {
    pub key: String,
    pub frame_rate: String,
    pub resolution: String,
    pub aspect_ratio: String,
    pub interlaced: String,
    pub container: String,
}

impl InputSpec {
    /// Input with every property left to the transcoder's detection.
    pub fn auto(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            frame_rate: AUTO.to_string(),
            resolution: AUTO.to_string(),
            aspect_ratio: AUTO.to_string(),
            interlaced: AUTO.to_string(),
            container: AUTO.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WatermarkSpec {
    pub input_key: String,
    pub preset_watermark_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct OutputSpec {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_pattern: Option<String>,
    pub preset_id: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub watermarks: Vec<WatermarkSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobMetadata {
    pub date: String,
    pub copyright: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct JobRequest {
    pub pipeline_id: String,
    pub inputs: Vec<InputSpec>,
    pub outputs: Vec<OutputSpec>,
    #[serde(rename = "UserMetadata")]
    pub metadata: JobMetadata,
}

/// Fixed parts of every job, taken from configuration.
#[derive(Debug, Clone)]
pub struct JobTemplate {
    pub pipeline_id: String,
    pub copyright: String,
    pub presets: Vec<OutputPreset>,
    pub thumbnails: bool,
    pub watermark_position: String,
}

impl JobTemplate {
    /// Builds the job for `ctx`, stitching in whichever assets were found.
    pub fn build(&self, ctx: &FolderContext, assets: &AssetAvailability, now: DateTime<Utc>) -> JobRequest {
        let mut inputs = vec![InputSpec::auto(&ctx.file_path)];
        if let Some(intro) = &assets.intro {
            inputs.insert(0, InputSpec::auto(intro));
        }
        if let Some(outro) = &assets.outro {
            inputs.push(InputSpec::auto(outro));
        }

        let watermarks: Vec<WatermarkSpec> = assets
            .watermark
            .iter()
            .map(|key| WatermarkSpec {
                input_key: key.clone(),
                preset_watermark_id: self.watermark_position.clone(),
            })
            .collect();

        let outputs = self
            .presets
            .iter()
            .enumerate()
            .map(|(i, preset)| OutputSpec {
                key: format!("{}.output.{}", ctx.file_path, preset.label),
                thumbnail_pattern: (self.thumbnails && i == 0).then(|| format!("{}-{{count}}", ctx.file_path)),
                preset_id: preset.preset_id.clone(),
                watermarks: watermarks.clone(),
            })
            .collect();

        JobRequest {
            pipeline_id: self.pipeline_id.clone(),
            inputs,
            outputs,
            metadata: JobMetadata {
                date: now.to_rfc3339_opts(SecondsFormat::Millis, true),
                copyright: self.copyright.clone(),
            },
        }
    }
}
