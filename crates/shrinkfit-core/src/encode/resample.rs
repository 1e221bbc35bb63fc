//! Resampling a raster to an encode target size.

use std::borrow::Cow;

use super::EncodeError;
use crate::decode::{FilterType, Raster};

/// Resample the natural raster to `width` x `height`.
///
/// When the target matches the raster's natural size the pixels are borrowed
/// as-is. Otherwise a new buffer is produced from the natural pixels; the
/// raster itself is never modified.
pub fn resample(
    raster: &Raster,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<Cow<'_, [u8]>, EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    if raster.dimensions() == (width, height) {
        return Ok(Cow::Borrowed(raster.pixels()));
    }

    let view = raster.as_rgba_view().ok_or(EncodeError::InvalidPixelData {
        expected: raster.pixel_count() as usize * 4,
        actual: raster.pixels().len(),
    })?;

    let resized = image::imageops::resize(&view, width, height, filter.to_image_filter());
    Ok(Cow::Owned(resized.into_raw()))
}
