//! Shrinkfit WASM - WebAssembly bindings for Shrinkfit
//!
//! This crate exposes the shrinkfit-core compression pipeline to
//! JavaScript/TypeScript, typically an upload form that must keep files
//! under a server-side size limit.
//!
//! # Module Structure
//!
//! - `compress` - `compress` and `rename_to_match` bindings
//! - `types` - WASM-compatible wrapper for compression results
//!
//! # Usage
//!
//! ```typescript
//! import init, { compress } from '@shrinkfit/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const result = compress(bytes, file.type, { outputFormat: 'image/webp' });
//! console.log(`${result.size} bytes, target met: ${result.metTarget}`);
//! ```
//!
//! `compress` blocks the calling thread for the whole search; run it inside a
//! Web Worker to keep the page responsive.

use wasm_bindgen::prelude::*;

mod compress;
mod types;

// Re-export public types
pub use compress::{compress, rename_to_match};
pub use types::JsCompressionResult;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
