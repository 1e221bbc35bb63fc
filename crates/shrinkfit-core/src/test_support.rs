//! Shared test utilities: synthetic images and a recording encoder double.

use std::io::Cursor;
use std::sync::Mutex;

use crate::decode::Raster;
use crate::encode::{EncodeError, Encoder};
use crate::format::OutputFormat;

// =========================================================================
// Synthetic images
// =========================================================================

/// RGBA gradient with enough structure that lossy codecs respond to quality.
pub fn gradient_rgba(width: u32, height: u32) -> Vec<u8> {
    let mut pixels = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            pixels.push(((x * 255) / width.max(1)) as u8);
            pixels.push(((y * 255) / height.max(1)) as u8);
            pixels.push(((x ^ y) % 256) as u8);
            pixels.push(255);
        }
    }
    pixels
}

pub fn gradient_raster(width: u32, height: u32) -> Raster {
    Raster::new(width, height, gradient_rgba(width, height)).unwrap()
}

/// Zero-filled raster, for tests that never look at pixels.
pub fn blank_raster(width: u32, height: u32) -> Raster {
    Raster::new(width, height, vec![0u8; (width as usize) * (height as usize) * 4]).unwrap()
}

pub fn gradient_png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_raw(width, height, gradient_rgba(width, height)).unwrap();
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

pub fn solid_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([200, 40, 40]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Jpeg).unwrap();
    out.into_inner()
}

/// JPEG whose left half is red and right half blue, carrying an APP1 Exif
/// segment with the given Orientation tag.
pub fn oriented_jpeg(width: u32, height: u32, orientation: u16) -> Vec<u8> {
    let img = image::RgbImage::from_fn(width, height, |x, _| {
        if x < width / 2 {
            image::Rgb([255, 0, 0])
        } else {
            image::Rgb([0, 0, 255])
        }
    });
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Jpeg).unwrap();
    let jpeg = out.into_inner();

    // Big-endian TIFF header, one IFD0 entry: Orientation (0x0112), SHORT, count 1
    let mut payload = b"Exif\0\0MM\0\x2A\0\0\0\x08".to_vec();
    payload.extend_from_slice(&[0x00, 0x01]);
    payload.extend_from_slice(&[0x01, 0x12, 0x00, 0x03, 0x00, 0x00, 0x00, 0x01]);
    payload.extend_from_slice(&orientation.to_be_bytes());
    payload.extend_from_slice(&[0x00, 0x00]);
    payload.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);

    let segment_len = (payload.len() + 2) as u16;
    let mut with_exif = jpeg[..2].to_vec();
    with_exif.extend_from_slice(&[0xFF, 0xE1]);
    with_exif.extend_from_slice(&segment_len.to_be_bytes());
    with_exif.extend_from_slice(&payload);
    with_exif.extend_from_slice(&jpeg[2..]);
    with_exif
}

// =========================================================================
// Recording encoder
// =========================================================================

type SizeFn = Box<dyn Fn(u32, u32, f32) -> usize + Send + Sync>;
type CallHook = Box<dyn Fn(usize) + Send + Sync>;

/// Encoder double that returns zero-filled buffers of a computed length and
/// records every call as `(width, height, quality)`.
/// Uses Mutex (not RefCell) so it stays Sync.
pub struct MockEncoder {
    size: SizeFn,
    fail_after: Option<usize>,
    hook: Option<CallHook>,
    calls: Mutex<Vec<(u32, u32, f32)>>,
}

impl MockEncoder {
    pub fn new(size: impl Fn(u32, u32, f32) -> usize + Send + Sync + 'static) -> Self {
        Self {
            size: Box::new(size),
            fail_after: None,
            hook: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every attempt produces `size` bytes.
    pub fn fixed(size: usize) -> Self {
        Self::new(move |_, _, _| size)
    }

    /// Succeeds `successes` times with `size` bytes, then fails.
    pub fn failing_after(successes: usize, size: usize) -> Self {
        Self {
            fail_after: Some(successes),
            ..Self::fixed(size)
        }
    }

    /// Run `hook` with the 1-based call number after each successful call.
    pub fn on_call(mut self, hook: impl Fn(usize) + Send + Sync + 'static) -> Self {
        self.hook = Some(Box::new(hook));
        self
    }

    pub fn calls(&self) -> Vec<(u32, u32, f32)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Encoder for MockEncoder {
    fn encode(
        &self,
        _raster: &Raster,
        width: u32,
        height: u32,
        quality: f32,
        format: OutputFormat,
    ) -> Result<Vec<u8>, EncodeError> {
        let call = {
            let mut calls = self.calls.lock().unwrap();
            calls.push((width, height, quality));
            calls.len()
        };

        if self.fail_after.is_some_and(|n| call > n) {
            return Err(EncodeError::EncodingFailed {
                format,
                message: "mock failure".to_string(),
            });
        }

        if let Some(hook) = &self.hook {
            hook(call);
        }
        Ok(vec![0u8; (self.size)(width, height, quality)])
    }
}
