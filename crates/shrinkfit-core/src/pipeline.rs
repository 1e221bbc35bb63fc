//! Pipeline orchestrator: validate, decode once, search, report.

use serde::Serialize;
use thiserror::Error;

use crate::config::{CompressionConfig, ConfigError};
use crate::decode::{decode, DecodeError, RawInput};
use crate::encode::{EncodeError, Encoder, RasterEncoder};
use crate::format::OutputFormat;
use crate::search::{Attempt, CancellationToken, SearchController, SearchError, SearchState};

/// Everything that can stop a compression run.
///
/// An exhausted search is *not* an error; it comes back as a
/// [`CompressionResult`] with `met_target == false`.
#[derive(Debug, Error)]
pub enum CompressError {
    #[error("Invalid compression config: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("Not a usable image: {0}")]
    Decode(#[from] DecodeError),

    #[error("Compression failed: {0}")]
    Encode(#[from] EncodeError),

    #[error("Compression cancelled after {attempts} attempt(s)")]
    Cancelled { attempts: usize },
}

impl From<SearchError> for CompressError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::Encode(e) => CompressError::Encode(e),
            SearchError::Cancelled { attempts } => CompressError::Cancelled { attempts },
        }
    }
}

/// Output of a successful run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressionResult {
    #[serde(skip)]
    pub bytes: Vec<u8>,
    pub format: OutputFormat,
    pub size: u64,
    /// False when the iteration cap was hit first; `bytes` is then a best
    /// effort and may still exceed the budget.
    pub met_target: bool,
    pub quality: f32,
    pub width: u32,
    pub height: u32,
    pub attempts: Vec<Attempt>,
}

impl CompressionResult {
    pub fn media_type(&self) -> &'static str {
        self.format.media_type()
    }

    pub fn state(&self) -> SearchState {
        if self.met_target {
            SearchState::MetTarget
        } else {
            SearchState::Exhausted
        }
    }
}

/// Compress `input` to fit `config.target_size_bytes`.
///
/// # Errors
///
/// * `CompressError::InvalidConfig` before anything is decoded.
/// * `CompressError::Decode` for non-image or unreadable input (no encode is attempted).
/// * `CompressError::Encode` if the codec fails on any attempt.
pub fn compress(
    input: &RawInput,
    config: &CompressionConfig,
) -> Result<CompressionResult, CompressError> {
    run(input, config, RasterEncoder::new(config.resample_filter), None)
}

/// [`compress`], stopping between attempts once `token` is cancelled.
pub fn compress_with_cancel(
    input: &RawInput,
    config: &CompressionConfig,
    token: &CancellationToken,
) -> Result<CompressionResult, CompressError> {
    run(
        input,
        config,
        RasterEncoder::new(config.resample_filter),
        Some(token),
    )
}

/// [`compress`] with a caller-provided encoder.
pub fn compress_with_encoder<E: Encoder>(
    input: &RawInput,
    config: &CompressionConfig,
    encoder: E,
) -> Result<CompressionResult, CompressError> {
    run(input, config, encoder, None)
}

fn run<E: Encoder>(
    input: &RawInput,
    config: &CompressionConfig,
    encoder: E,
    token: Option<&CancellationToken>,
) -> Result<CompressionResult, CompressError> {
    config.validate()?;

    let raster = decode(input)?;

    let mut controller = SearchController::new(encoder, config);
    if let Some(token) = token {
        controller = controller.with_cancellation(token);
    }
    let outcome = controller.run(&raster)?;

    let result = CompressionResult {
        size: outcome.bytes.len() as u64,
        bytes: outcome.bytes,
        format: config.output_format,
        met_target: outcome.state == SearchState::MetTarget,
        quality: outcome.chosen.quality,
        width: outcome.chosen.width,
        height: outcome.chosen.height,
        attempts: outcome.attempts,
    };

    if result.met_target {
        tracing::info!(
            size = result.size,
            target = config.target_size_bytes,
            attempts = result.attempts.len(),
            format = %result.format,
            "compressed within target"
        );
    } else {
        tracing::warn!(
            size = result.size,
            target = config.target_size_bytes,
            attempts = result.attempts.len(),
            "iteration cap reached; result may still exceed the target size"
        );
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CompressionOptions;
    use crate::test_support::{gradient_png, solid_jpeg, MockEncoder};

    fn png_input(width: u32, height: u32) -> RawInput {
        RawInput::new(gradient_png(width, height), "image/png")
    }

    #[test]
    fn test_compress_meets_generous_target() {
        let input = png_input(64, 64);
        let config = CompressionOptions {
            output_format: Some(OutputFormat::Jpeg),
            target_size_bytes: Some(1024 * 1024),
            ..Default::default()
        }
        .resolve()
        .unwrap();

        let result = compress(&input, &config).unwrap();

        assert!(result.met_target);
        assert_eq!(result.attempts.len(), 1);
        assert_eq!(result.size, result.bytes.len() as u64);
        assert_eq!(result.media_type(), "image/jpeg");
        assert_eq!((result.width, result.height), (64, 64));
        assert_eq!(&result.bytes[0..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_compress_tight_target_reduces_quality_and_size() {
        let input = png_input(256, 256);
        let mut config = CompressionConfig::DEFAULT;
        config.output_format = OutputFormat::Jpeg;
        config.max_iterations = 30;

        let first = compress(&input, &{
            let mut generous = config;
            generous.target_size_bytes = u64::MAX;
            generous
        })
        .unwrap();
        config.target_size_bytes = first.size / 2;

        let result = compress(&input, &config).unwrap();

        assert!(result.attempts.len() > 1);
        assert!(result.quality < 0.8);
        if result.met_target {
            assert!(result.size <= config.target_size_bytes);
        }
    }

    #[test]
    fn test_compress_exhausts_on_impossible_target() {
        let input = png_input(32, 32);
        let mut config = CompressionConfig::DEFAULT;
        config.target_size_bytes = 1;
        config.max_iterations = 4;

        let result = compress(&input, &config).unwrap();

        assert!(!result.met_target);
        assert_eq!(result.state(), SearchState::Exhausted);
        assert_eq!(result.attempts.len(), 4);
        assert!(!result.bytes.is_empty());
    }

    #[test]
    fn test_compress_is_idempotent() {
        let input = RawInput::new(solid_jpeg(120, 80), "image/jpeg");
        let mut config = CompressionConfig::DEFAULT;
        config.target_size_bytes = 600;

        let a = compress(&input, &config).unwrap();
        let b = compress(&input, &config).unwrap();

        assert_eq!(a.size, b.size);
        assert_eq!(a.met_target, b.met_target);
        assert_eq!(a.attempts, b.attempts);
    }

    #[test]
    fn test_non_image_input_never_encodes() {
        let input = RawInput::new(b"hello world".to_vec(), "text/plain");
        let encoder = MockEncoder::fixed(10);

        let result = compress_with_encoder(&input, &CompressionConfig::DEFAULT, &encoder);

        assert!(matches!(
            result,
            Err(CompressError::Decode(DecodeError::NotAnImage(_)))
        ));
        assert!(encoder.calls().is_empty());
    }

    #[test]
    fn test_invalid_config_checked_before_decode() {
        let input = RawInput::new(b"junk".to_vec(), "text/plain");
        let mut config = CompressionConfig::DEFAULT;
        config.scale_ratio = 1.5;

        let result = compress(&input, &config);
        assert!(matches!(result, Err(CompressError::InvalidConfig(_))));
    }

    #[test]
    fn test_encoder_failure_is_fatal() {
        let input = png_input(16, 16);
        let encoder = MockEncoder::failing_after(1, 1_000_000);

        let result = compress_with_encoder(&input, &CompressionConfig::DEFAULT, &encoder);

        assert!(matches!(result, Err(CompressError::Encode(_))));
        assert_eq!(encoder.calls().len(), 2);
    }

    #[test]
    fn test_natural_dimensions_come_from_decoded_raster() {
        let input = png_input(300, 200);
        let encoder = MockEncoder::fixed(1_000_000);
        let mut config = CompressionConfig::DEFAULT;
        config.initial_quality = 0.1;
        config.max_iterations = 2;

        let result = compress_with_encoder(&input, &config, &encoder).unwrap();

        assert_eq!(encoder.calls()[0].0, 300);
        assert_eq!(encoder.calls()[0].1, 200);
        assert_eq!((result.width, result.height), (240, 160));
    }

    #[test]
    fn test_cancelled_before_start_still_returns_first_attempt() {
        let input = png_input(16, 16);
        let token = CancellationToken::new();
        token.cancel();
        let mut config = CompressionConfig::DEFAULT;
        config.target_size_bytes = 1;

        let result = compress_with_cancel(&input, &config, &token);
        assert!(matches!(result, Err(CompressError::Cancelled { attempts: 1 })));
    }

    #[test]
    fn test_result_serializes_without_bytes() {
        let input = png_input(8, 8);
        let result = compress(&input, &CompressionConfig::DEFAULT).unwrap();

        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("bytes").is_none());
        assert_eq!(json["format"], "image/webp");
        assert_eq!(json["metTarget"], true);
    }

    #[test]
    fn test_error_messages_are_actionable() {
        let err = CompressError::from(DecodeError::NotAnImage("text/plain".into()));
        assert!(err.to_string().starts_with("Not a usable image"));

        let err = CompressError::from(SearchError::Cancelled { attempts: 3 });
        assert_eq!(err.to_string(), "Compression cancelled after 3 attempt(s)");
    }
}
