use figment::{providers::Env, Figment};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::job::{JobTemplate, PresetList};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_pipeline_id", deserialize_with = "scalar_string")]
    pub pipeline_id: String,
    // Elastic Transcoder is not offered everywhere, so it gets its own region
    #[serde(default = "default_transcoder_region", deserialize_with = "scalar_string")]
    pub transcoder_region: String,
    #[serde(default = "default_copyright", deserialize_with = "scalar_string")]
    pub copyright: String,
    #[serde(default = "default_output_presets", deserialize_with = "scalar_string")]
    pub output_presets: String,
    #[serde(default = "default_thumbnails")]
    pub thumbnails: bool,
    #[serde(default = "default_watermark_position", deserialize_with = "scalar_string")]
    pub watermark_position: String,
}

// Env values are parsed as typed data, so `PIPELINE_ID=1527276506567` arrives as a number.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Str(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
}

fn scalar_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Scalar::deserialize(deserializer)? {
        Scalar::Str(s) => s,
        Scalar::Int(n) => n.to_string(),
        Scalar::UInt(n) => n.to_string(),
        Scalar::Float(n) => n.to_string(),
        Scalar::Bool(b) => b.to_string(),
    })
}

fn default_pipeline_id() -> String {
    "1527276506567-bso5vf".to_string()
}

fn default_transcoder_region() -> String {
    "eu-west-1".to_string()
}

fn default_copyright() -> String {
    "App-Arena.com".to_string()
}

fn default_output_presets() -> String {
    // Generic 720p
    "720p.mp4=1351620000001-000010".to_string()
}

fn default_thumbnails() -> bool {
    true
}

fn default_watermark_position() -> String {
    "BottomRight".to_string()
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Figment(#[from] figment::Error),
    #[error(transparent)]
    Presets(#[from] crate::job::PresetListError),
}

impl Config {
    pub fn from_figment(figment: Figment) -> Result<Self, figment::Error> {
        figment.extract()
    }

    /// The fixed part of every job, with the preset list validated.
    pub fn job_template(&self) -> Result<JobTemplate, ConfigError> {
        let PresetList(presets) = self.output_presets.parse()?;
        Ok(JobTemplate {
            pipeline_id: self.pipeline_id.clone(),
            copyright: self.copyright.clone(),
            presets,
            thumbnails: self.thumbnails,
            watermark_position: self.watermark_position.clone(),
        })
    }
}

pub fn load_config() -> Result<Config, figment::Error> {
    Config::from_figment(Figment::new().merge(Env::raw()))
}
