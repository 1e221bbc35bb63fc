//! Output file naming.
//!
//! The output format can differ from the upload's, so the file name sent
//! along with the bytes should carry the extension of what was actually
//! encoded: `holiday.JPG` compressed to WebP becomes `holiday.webp`.

use crate::format::OutputFormat;

/// Extensions that get rewritten. Anything else is left alone.
const RASTER_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

/// Replace a trailing raster extension with the one for `format`.
///
/// Only `.jpg`, `.jpeg`, `.png` and `.webp` (any case) are replaced; names
/// without one of those extensions are returned unchanged.
pub fn rename_to_match(original_name: &str, format: OutputFormat) -> String {
    match original_name.rsplit_once('.') {
        Some((stem, ext))
            if RASTER_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known)) =>
        {
            format!("{stem}.{}", format.extension())
        }
        _ => original_name.to_string(),
    }
}
