//! Per-format encoders for RGBA pixel data.
//!
//! JPEG and PNG go through the `image` crate. WebP is lossy through libwebp
//! when the `lossy-webp` feature is enabled, and falls back to the `image`
//! crate's lossless encoder otherwise.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use thiserror::Error;

use crate::format::OutputFormat;

/// Errors that can occur while encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// Quality outside (0, 1]
    #[error("Invalid quality {0}: must be in (0, 1]")]
    InvalidQuality(f32),

    /// The codec itself failed
    #[error("{format} encoding failed: {message}")]
    EncodingFailed {
        format: OutputFormat,
        message: String,
    },
}

impl EncodeError {
    fn failed(format: OutputFormat, message: impl ToString) -> Self {
        EncodeError::EncodingFailed {
            format,
            message: message.to_string(),
        }
    }
}

/// Encode RGBA pixel data to `format` at the given quality.
///
/// `quality` is the normalized encoder fidelity in (0, 1]. Lossless formats
/// accept and ignore it.
pub fn encode_pixels(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: f32,
    format: OutputFormat,
) -> Result<Vec<u8>, EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }
    if !(quality > 0.0 && quality <= 1.0) {
        return Err(EncodeError::InvalidQuality(quality));
    }

    let expected_len = (width as usize) * (height as usize) * 4;
    if pixels.len() != expected_len {
        return Err(EncodeError::InvalidPixelData {
            expected: expected_len,
            actual: pixels.len(),
        });
    }

    match format {
        OutputFormat::Jpeg => encode_jpeg(pixels, width, height, quality),
        OutputFormat::Png => encode_png(pixels, width, height),
        OutputFormat::WebP => encode_webp(pixels, width, height, quality),
    }
}

/// Map normalized quality onto the 1-100 scale JPEG encoders use.
pub(crate) fn percent_quality(quality: f32) -> u8 {
    (quality * 100.0).round().clamp(1.0, 100.0) as u8
}

/// Composite one channel onto black, as a canvas does when exporting JPEG.
fn flatten_channel(value: u8, alpha: u8) -> u8 {
    ((value as u16 * alpha as u16 + 127) / 255) as u8
}

fn encode_jpeg(pixels: &[u8], width: u32, height: u32, quality: f32) -> Result<Vec<u8>, EncodeError> {
    let rgb: Vec<u8> = pixels
        .chunks_exact(4)
        .flat_map(|px| {
            let a = px[3];
            [
                flatten_channel(px[0], a),
                flatten_channel(px[1], a),
                flatten_channel(px[2], a),
            ]
        })
        .collect();

    let mut buffer = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut buffer, percent_quality(quality))
        .write_image(&rgb, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::failed(OutputFormat::Jpeg, e))?;

    Ok(buffer.into_inner())
}

fn encode_png(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, EncodeError> {
    let mut buffer = Cursor::new(Vec::new());
    PngEncoder::new(&mut buffer)
        .write_image(pixels, width, height, ExtendedColorType::Rgba8)
        .map_err(|e| EncodeError::failed(OutputFormat::Png, e))?;

    Ok(buffer.into_inner())
}

#[cfg(feature = "lossy-webp")]
fn encode_webp(pixels: &[u8], width: u32, height: u32, quality: f32) -> Result<Vec<u8>, EncodeError> {
    let memory = webp::Encoder::from_rgba(pixels, width, height)
        .encode_simple(false, quality * 100.0)
        .map_err(|e| EncodeError::failed(OutputFormat::WebP, format!("{e:?}")))?;

    Ok(memory.to_vec())
}

#[cfg(not(feature = "lossy-webp"))]
fn encode_webp(pixels: &[u8], width: u32, height: u32, _quality: f32) -> Result<Vec<u8>, EncodeError> {
    use image::codecs::webp::WebPEncoder;

    let mut buffer = Cursor::new(Vec::new());
    WebPEncoder::new_lossless(&mut buffer)
        .write_image(pixels, width, height, ExtendedColorType::Rgba8)
        .map_err(|e| EncodeError::failed(OutputFormat::WebP, e))?;

    Ok(buffer.into_inner())
}


// ============================================================================
// Property-Based Tests
// ============================================================================
