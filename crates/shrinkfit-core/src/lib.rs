//! Shrinkfit Core - size-constrained image recompression
//!
//! Given an input image and a byte budget, produce an encoded image under that
//! budget with as much quality as a bounded search allows.
//!
//! ```text
//! RawInput ──▶ decode (once) ──▶ Raster ──▶ SearchController ──▶ CompressionResult
//!                                              │      ▲
//!                                    quality,  │      │ encoded size
//!                                    w x h     ▼      │
//!                                           RasterEncoder
//! ```
//!
//! | Module | Role |
//! |--------|------|
//! | [`decode`] | Raster source: bytes + media type to an RGBA raster |
//! | [`encode`] | Resample from the natural raster and encode (JPEG/PNG/WebP) |
//! | [`search`] | Quality-first, then scale, bounded search loop |
//! | [`pipeline`] | `compress` entry points and the result/error types |
//! | [`config`] | Default table, caller overrides and validation |
//! | [`naming`] | Rename an upload to match the encoded format |
//!
//! Each `compress` call owns its raster and search state, so independent
//! calls can run in parallel without synchronization. Runs are blocking;
//! callers needing a wall-clock bound should combine a timeout with a
//! [`CancellationToken`].

pub mod config;
pub mod decode;
pub mod encode;
pub mod format;
pub mod naming;
pub mod pipeline;
pub mod search;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::{CompressionConfig, CompressionOptions, ConfigError, ExhaustionPolicy};
pub use decode::{DecodeError, FilterType, Raster, RawInput};
pub use encode::EncodeError;
pub use format::{OutputFormat, UnknownFormat};
pub use naming::rename_to_match;
pub use pipeline::{
    compress, compress_with_cancel, compress_with_encoder, CompressError, CompressionResult,
};
pub use search::{Attempt, CancellationToken, SearchState};
