//! Raster source: decode caller bytes into an in-memory raster.
//!
//! The whole image is materialized once per pipeline run and is read-only
//! afterwards. Any format the `image` crate can sniff (JPEG, PNG, WebP, GIF,
//! BMP) is accepted, with EXIF orientation applied so the raster matches what
//! a browser would draw.
//!
//! # Examples
//!
//! ```ignore
//! use shrinkfit_core::decode::{decode, RawInput};
//!
//! let input = RawInput::new(std::fs::read("photo.jpg")?, "image/jpeg");
//! let raster = decode(&input)?;
//! println!("Decoded {}x{} raster", raster.width(), raster.height());
//! ```

mod source;
mod types;

pub use source::decode;
pub use types::{DecodeError, FilterType, Orientation, Raster, RawInput};
