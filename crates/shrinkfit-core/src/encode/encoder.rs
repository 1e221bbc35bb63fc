//! The encoder seam used by the search controller.

use super::{encode_pixels, resample, EncodeError};
use crate::decode::{FilterType, Raster};
use crate::format::OutputFormat;

/// Encodes the natural raster at a target size and quality.
///
/// The search controller only talks to this trait, so tests can drive it
/// with doubles that report synthetic sizes.
pub trait Encoder {
    /// Encode `raster` resized to `width` x `height`.
    ///
    /// Implementations must resample from the natural raster on every call.
    fn encode(
        &self,
        raster: &Raster,
        width: u32,
        height: u32,
        quality: f32,
        format: OutputFormat,
    ) -> Result<Vec<u8>, EncodeError>;
}

impl<E: Encoder + ?Sized> Encoder for &E {
    fn encode(
        &self,
        raster: &Raster,
        width: u32,
        height: u32,
        quality: f32,
        format: OutputFormat,
    ) -> Result<Vec<u8>, EncodeError> {
        (**self).encode(raster, width, height, quality, format)
    }
}

/// Production encoder: resample with the `image` crate, then hand off to the
/// per-format codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterEncoder {
    filter: FilterType,
}

impl RasterEncoder {
    pub fn new(filter: FilterType) -> Self {
        Self { filter }
    }

    pub fn filter(&self) -> FilterType {
        self.filter
    }
}

impl Encoder for RasterEncoder {
    fn encode(
        &self,
        raster: &Raster,
        width: u32,
        height: u32,
        quality: f32,
        format: OutputFormat,
    ) -> Result<Vec<u8>, EncodeError> {
        let pixels = resample(raster, width, height, self.filter)?;
        encode_pixels(&pixels, width, height, quality, format)
    }
}
