//! Compression configuration.
//!
//! [`CompressionConfig::DEFAULT`] is the process-wide default table. Callers
//! supply a [`CompressionOptions`] with only the fields they care about and
//! [`CompressionOptions::resolve`] merges it over the defaults and validates
//! the result. Options deserialize from camelCase keys so a JavaScript
//! options object maps onto them directly.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::FilterType;
use crate::format::OutputFormat;

/// Which attempt an exhausted search hands back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExhaustionPolicy {
    /// The final attempt, even if an earlier one was smaller.
    #[default]
    LastAttempt,
    /// The smallest attempt seen; ties go to the earlier attempt.
    SmallestAttempt,
}

/// Fully-resolved settings for one compression run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressionConfig {
    /// Starting encode quality, in (0, 1].
    pub initial_quality: f32,
    pub output_format: OutputFormat,
    /// Byte budget the search tries to meet.
    pub target_size_bytes: u64,
    /// Quality floor, in (0, initial_quality].
    pub min_quality: f32,
    /// Cap on failed attempts. At least one attempt is always made.
    pub max_iterations: u32,
    /// Shrink factor for both dimensions once quality is at the floor, in (0, 1).
    pub scale_ratio: f32,
    /// Quality decrement per failed attempt, in (0, 1].
    pub quality_step: f32,
    pub resample_filter: FilterType,
    pub exhaustion_policy: ExhaustionPolicy,
}

impl CompressionConfig {
    pub const DEFAULT: CompressionConfig = CompressionConfig {
        initial_quality: 0.8,
        output_format: OutputFormat::WebP,
        target_size_bytes: 128 * 1024,
        min_quality: 0.1,
        max_iterations: 10,
        scale_ratio: 0.8,
        quality_step: 0.1,
        resample_filter: FilterType::Bilinear,
        exhaustion_policy: ExhaustionPolicy::LastAttempt,
    };

    /// Check every field against its documented range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !in_unit_interval(self.initial_quality) {
            return Err(ConfigError::InitialQuality(self.initial_quality));
        }
        if !(self.min_quality > 0.0 && self.min_quality <= self.initial_quality) {
            return Err(ConfigError::MinQuality {
                min_quality: self.min_quality,
                initial_quality: self.initial_quality,
            });
        }
        if self.target_size_bytes == 0 {
            return Err(ConfigError::TargetSize);
        }
        if !(self.scale_ratio > 0.0 && self.scale_ratio < 1.0) {
            return Err(ConfigError::ScaleRatio(self.scale_ratio));
        }
        if !in_unit_interval(self.quality_step) {
            return Err(ConfigError::QualityStep(self.quality_step));
        }
        Ok(())
    }
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

fn in_unit_interval(value: f32) -> bool {
    value > 0.0 && value <= 1.0
}

/// Rejected configuration values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("initialQuality must be in (0, 1], got {0}")]
    InitialQuality(f32),

    #[error("minQuality must be in (0, initialQuality = {initial_quality}], got {min_quality}")]
    MinQuality {
        min_quality: f32,
        initial_quality: f32,
    },

    #[error("targetSizeBytes must be positive")]
    TargetSize,

    #[error("scaleRatio must be in (0, 1), got {0}")]
    ScaleRatio(f32),

    #[error("qualityStep must be in (0, 1], got {0}")]
    QualityStep(f32),
}

/// Caller overrides; `None` keeps the default.
///
/// `targetSize`, `outputType` and `maxLoop` are accepted as aliases so option
/// objects written for the older upload helper keep working.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct CompressionOptions {
    pub initial_quality: Option<f32>,
    #[serde(alias = "outputType")]
    pub output_format: Option<OutputFormat>,
    #[serde(alias = "targetSize")]
    pub target_size_bytes: Option<u64>,
    pub min_quality: Option<f32>,
    #[serde(alias = "maxLoop")]
    pub max_iterations: Option<u32>,
    pub scale_ratio: Option<f32>,
    pub quality_step: Option<f32>,
    pub resample_filter: Option<FilterType>,
    pub exhaustion_policy: Option<ExhaustionPolicy>,
}

impl CompressionOptions {
    /// Overlay these options on `base` without validating.
    pub fn merge_onto(&self, base: &CompressionConfig) -> CompressionConfig {
        CompressionConfig {
            initial_quality: self.initial_quality.unwrap_or(base.initial_quality),
            output_format: self.output_format.unwrap_or(base.output_format),
            target_size_bytes: self.target_size_bytes.unwrap_or(base.target_size_bytes),
            min_quality: self.min_quality.unwrap_or(base.min_quality),
            max_iterations: self.max_iterations.unwrap_or(base.max_iterations),
            scale_ratio: self.scale_ratio.unwrap_or(base.scale_ratio),
            quality_step: self.quality_step.unwrap_or(base.quality_step),
            resample_filter: self.resample_filter.unwrap_or(base.resample_filter),
            exhaustion_policy: self.exhaustion_policy.unwrap_or(base.exhaustion_policy),
        }
    }

    /// Merge over [`CompressionConfig::DEFAULT`] and validate.
    pub fn resolve(&self) -> Result<CompressionConfig, ConfigError> {
        let config = self.merge_onto(&CompressionConfig::DEFAULT);
        config.validate()?;
        Ok(config)
    }
}
