//! Encoder: resample the natural raster and encode it to bytes.
//!
//! This module provides functionality for:
//! - Resampling a raster to a target size (always from the natural pixels)
//! - Encoding RGBA pixels to JPEG, PNG or WebP at a normalized quality
//! - The [`Encoder`] trait the search controller drives
//!
//! # Examples
//!
//! ```ignore
//! use shrinkfit_core::encode::{Encoder, RasterEncoder};
//! use shrinkfit_core::OutputFormat;
//!
//! let bytes = RasterEncoder::default().encode(&raster, 800, 600, 0.8, OutputFormat::WebP)?;
//! println!("Encoded {} bytes", bytes.len());
//! ```

mod codec;
mod encoder;
mod resample;

pub use codec::{encode_pixels, EncodeError};
pub use encoder::{Encoder, RasterEncoder};
pub use resample::resample;
