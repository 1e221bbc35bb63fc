//! WASM-compatible wrapper types for compression results.

use shrinkfit_core::{Attempt, CompressionResult};
use wasm_bindgen::prelude::*;

/// A compression result wrapper for JavaScript.
///
/// # Memory Management
///
/// The encoded bytes live in WASM memory. `bytes()` copies them into a
/// `Uint8Array`, typically once, right before building the upload `Blob`.
#[wasm_bindgen]
pub struct JsCompressionResult {
    bytes: Vec<u8>,
    media_type: &'static str,
    extension: &'static str,
    met_target: bool,
    quality: f32,
    width: u32,
    height: u32,
    attempts: Vec<Attempt>,
}

#[wasm_bindgen]
impl JsCompressionResult {
    /// Encoded bytes as a Uint8Array (copied out of WASM memory).
    pub fn bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    /// Media type of the encoded bytes, e.g. `image/webp`.
    #[wasm_bindgen(getter, js_name = mediaType)]
    pub fn media_type(&self) -> String {
        self.media_type.to_string()
    }

    /// File extension (without dot) matching the encoded format.
    #[wasm_bindgen(getter)]
    pub fn extension(&self) -> String {
        self.extension.to_string()
    }

    /// Encoded size in bytes.
    #[wasm_bindgen(getter)]
    pub fn size(&self) -> f64 {
        self.bytes.len() as f64
    }

    /// False when the attempt budget ran out before the target was met.
    /// The bytes are still usable but may exceed the size limit.
    #[wasm_bindgen(getter, js_name = metTarget)]
    pub fn met_target(&self) -> bool {
        self.met_target
    }

    #[wasm_bindgen(getter)]
    pub fn quality(&self) -> f32 {
        self.quality
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of encode attempts the search made.
    #[wasm_bindgen(getter)]
    pub fn attempts(&self) -> u32 {
        self.attempts.len() as u32
    }

    /// Every attempt as `{quality, width, height, size}` objects.
    #[wasm_bindgen(js_name = attemptLog)]
    pub fn attempt_log(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.attempts)
            .map_err(|e| JsValue::from_str(&format!("Failed to serialize attempts: {}", e)))
    }
}

impl JsCompressionResult {
    pub(crate) fn from_result(result: CompressionResult) -> Self {
        Self {
            media_type: result.format.media_type(),
            extension: result.format.extension(),
            met_target: result.met_target,
            quality: result.quality,
            width: result.width,
            height: result.height,
            attempts: result.attempts,
            bytes: result.bytes,
        }
    }
}
