//! Compression WASM bindings.
//!
//! # Functions
//!
//! - [`compress`] - Recompress an uploaded image to fit a byte budget
//! - [`rename_to_match`] - Rewrite a file name's extension for the encoded format
//!
//! # Example
//!
//! ```typescript
//! import { compress, rename_to_match } from '@shrinkfit/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const result = compress(bytes, file.type, { targetSizeBytes: 128 * 1024 });
//! if (!result.metTarget) {
//!   console.warn(`Still ${result.size} bytes after ${result.attempts} attempts`);
//! }
//! const upload = new File([result.bytes()], rename_to_match(file.name, result.mediaType), {
//!   type: result.mediaType,
//! });
//! ```

use crate::types::JsCompressionResult;
use shrinkfit_core::{CompressionOptions, OutputFormat, RawInput};
use wasm_bindgen::prelude::*;

/// Compress image bytes to fit a target size.
///
/// # Arguments
///
/// * `bytes` - The uploaded file bytes as a `Uint8Array`
/// * `media_type` - The file's declared type (`file.type`); must be `image/*`
/// * `options` - Optional object with any of `initialQuality`, `outputFormat`
///   (e.g. `"image/webp"`), `targetSizeBytes`, `minQuality`, `maxIterations`,
///   `scaleRatio`, `qualityStep`, `resampleFilter`, `exhaustionPolicy`
///
/// # Errors
///
/// Returns an error if:
/// - The options object has unknown keys or out-of-range values
/// - The input is not an image or cannot be decoded
/// - The encoder fails
///
/// A result with `metTarget === false` is not an error: the budget could not
/// be met within `maxIterations` attempts and the last attempt is returned.
#[wasm_bindgen]
pub fn compress(
    bytes: &[u8],
    media_type: &str,
    options: JsValue,
) -> Result<JsCompressionResult, JsValue> {
    let options = parse_options(options)?;
    let result = compress_bytes(bytes, media_type, &options).map_err(|e| JsValue::from_str(&e))?;

    // console bindings only exist inside a JS host
    if cfg!(target_arch = "wasm32") && !result.met_target() {
        web_sys::console::warn_1(&JsValue::from_str(&format!(
            "Reached the maximum number of compression attempts; the file ({} bytes) may still exceed the target size",
            result.size()
        )));
    }

    Ok(result)
}

/// Rename `name` so its extension matches `media_type`.
///
/// `photo.JPG` with `image/webp` becomes `photo.webp`. Names whose extension
/// is not jpg/jpeg/png/webp are returned unchanged.
#[wasm_bindgen]
pub fn rename_to_match(name: &str, media_type: &str) -> Result<String, JsValue> {
    rename_for_media_type(name, media_type).map_err(|e| JsValue::from_str(&e))
}

fn parse_options(options: JsValue) -> Result<CompressionOptions, JsValue> {
    if options.is_undefined() || options.is_null() {
        return Ok(CompressionOptions::default());
    }
    serde_wasm_bindgen::from_value(options)
        .map_err(|e| JsValue::from_str(&format!("Invalid compression options: {}", e)))
}

/// Target-independent core of [`compress`], so it can be tested natively.
pub(crate) fn compress_bytes(
    bytes: &[u8],
    media_type: &str,
    options: &CompressionOptions,
) -> Result<JsCompressionResult, String> {
    let config = options.resolve().map_err(|e| e.to_string())?;
    let input = RawInput::new(bytes, media_type);

    shrinkfit_core::compress(&input, &config)
        .map(JsCompressionResult::from_result)
        .map_err(|e| e.to_string())
}

pub(crate) fn rename_for_media_type(name: &str, media_type: &str) -> Result<String, String> {
    let format = media_type
        .parse::<OutputFormat>()
        .map_err(|e| e.to_string())?;
    Ok(shrinkfit_core::rename_to_match(name, format))
}


/// WASM-specific tests that require JsValue.
///
/// Run with `wasm-pack test`.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn one_pixel_png() -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(1, 1, image::Rgba([10, 20, 30, 255]));
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[wasm_bindgen_test]
    fn test_compress_without_options() {
        let result = compress(&one_pixel_png(), "image/png", JsValue::UNDEFINED).unwrap();
        assert!(result.met_target());
        assert_eq!(result.width(), 1);
    }

    #[wasm_bindgen_test]
    fn test_compress_with_options_object() {
        let options = serde_wasm_bindgen::to_value(&CompressionOptions {
            output_format: Some(OutputFormat::Png),
            ..Default::default()
        })
        .unwrap();
        let result = compress(&one_pixel_png(), "image/png", options).unwrap();
        assert_eq!(result.media_type(), "image/png");
    }

    #[wasm_bindgen_test]
    fn test_compress_rejects_non_image() {
        assert!(compress(b"text", "text/plain", JsValue::NULL).is_err());
    }

    #[wasm_bindgen_test]
    fn test_rename_to_match() {
        assert_eq!(rename_to_match("cat.jpeg", "image/png").unwrap(), "cat.png");
        assert!(rename_to_match("cat.jpeg", "image/heic").is_err());
    }
}
