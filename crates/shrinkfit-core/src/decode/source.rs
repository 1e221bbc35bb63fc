//! Raster source: turns caller bytes into a [`Raster`], with EXIF orientation applied.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageReader};

use super::{DecodeError, Orientation, Raster, RawInput};

/// Decode an input into an RGBA raster at its natural size.
///
/// The declared media type only gates whether decoding is attempted; the
/// container format itself is sniffed from the bytes.
///
/// # Errors
///
/// * `DecodeError::NotAnImage` if the media type is not `image/*`.
/// * `DecodeError::InvalidFormat` if the format cannot be recognized.
/// * `DecodeError::CorruptedFile` if the bytes fail to decode.
/// * `DecodeError::EmptyImage` if the image has a zero dimension.
pub fn decode(input: &RawInput) -> Result<Raster, DecodeError> {
    if !input.declares_image() {
        return Err(DecodeError::NotAnImage(input.media_type().to_string()));
    }

    let bytes = input.bytes();
    let orientation = extract_orientation(bytes);

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;
    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if img.width() == 0 || img.height() == 0 {
        return Err(DecodeError::EmptyImage {
            width: img.width(),
            height: img.height(),
        });
    }

    let raster = Raster::from_rgba_image(apply_orientation(img, orientation).into_rgba8());
    tracing::debug!(
        width = raster.width(),
        height = raster.height(),
        ?orientation,
        "decoded raster"
    );
    Ok(raster)
}

/// Extract EXIF orientation from container bytes.
///
/// Returns `Orientation::Normal` if no EXIF data is found or orientation
/// cannot be determined.
fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);
    Reader::new()
        .read_from_container(&mut cursor)
        .ok()
        .and_then(|exif| {
            exif.get_field(Tag::Orientation, In::PRIMARY)
                .and_then(|field| field.value.get_uint(0))
        })
        .map(Orientation::from)
        .unwrap_or_default()
}

fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}
