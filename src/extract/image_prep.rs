//! Shrink a menu photo before handing it to an extractor.
//!
//! Phone photos are far larger than any OCR pass needs. The image is scaled
//! so its longest side is at most [`MAX_DIMENSION`] pixels, keeping the aspect
//! ratio, and re-encoded as JPEG.

use std::path::Path;

use anyhow::{Context, Result};
use base64::Engine as _;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use log::debug;

/// Longest side after downscaling
pub const MAX_DIMENSION: u32 = 1280;

/// JPEG quality for the re-encoded payload
pub const JPEG_QUALITY: u8 = 80;

/// Prepared image ready for an extractor
#[derive(Clone, Debug)]
pub struct ImagePayload {
    pub jpeg: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl ImagePayload {
    pub const MIME: &'static str = "image/jpeg";

    /// Standard base64 of the JPEG bytes (no data-URL prefix)
    pub fn base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.jpeg)
    }

    /// `data:image/jpeg;base64,...`
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", Self::MIME, self.base64())
    }
}

/// Target size fitting `(width, height)` inside `max` on the longest side.
pub fn fit_within(width: u32, height: u32, max: u32) -> (u32, u32) {
    if width <= max && height <= max {
        return (width, height);
    }
    let (w, h) = (width as f64, height as f64);
    let (nw, nh) = if width > height {
        (max as f64, h * max as f64 / w)
    } else {
        (w * max as f64 / h, max as f64)
    };
    ((nw.round() as u32).max(1), (nh.round() as u32).max(1))
}

/// Decode any supported image, downscale and re-encode as JPEG.
pub fn prepare_image(bytes: &[u8]) -> Result<ImagePayload> {
    let img = image::load_from_memory(bytes).context("Unsupported or corrupt image")?;
    let (width, height) = fit_within(img.width(), img.height(), MAX_DIMENSION);
    let img = if (width, height) != (img.width(), img.height()) {
        debug!("Resizing {}x{} -> {}x{}", img.width(), img.height(), width, height);
        img.resize_exact(width, height, FilterType::Triangle)
    } else {
        img
    };

    let rgb = img.to_rgb8();
    let mut jpeg = Vec::new();
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY))
        .context("Failed to encode JPEG")?;
    Ok(ImagePayload { jpeg, width, height })
}

pub fn prepare_image_file(path: &Path) -> Result<ImagePayload> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    prepare_image(&bytes).with_context(|| format!("Failed to prepare {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img: ImageBuffer<Rgb<u8>, Vec<u8>> =
            ImageBuffer::from_fn(width, height, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 128]));
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_fit_within() {
        assert_eq!(fit_within(800, 600, 1280), (800, 600));
        assert_eq!(fit_within(2560, 1920, 1280), (1280, 960));
        assert_eq!(fit_within(1000, 4000, 1280), (320, 1280));
        assert_eq!(fit_within(1280, 1280, 1280), (1280, 1280));
        assert_eq!(fit_within(5000, 1, 1280), (1280, 1));
    }

    #[test]
    fn test_prepare_downscales_large_image() {
        let payload = prepare_image(&png(2000, 1000)).unwrap();
        assert_eq!((payload.width, payload.height), (1280, 640));
        assert_eq!(&payload.jpeg[..2], &[0xFF, 0xD8]);

        let decoded = image::load_from_memory(&payload.jpeg).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (1280, 640));
    }

    #[test]
    fn test_prepare_keeps_small_image_size() {
        let payload = prepare_image(&png(64, 48)).unwrap();
        assert_eq!((payload.width, payload.height), (64, 48));
        assert!(payload.data_url().starts_with("data:image/jpeg;base64,/9j/"));
    }

    #[test]
    fn test_prepare_rejects_garbage() {
        assert!(prepare_image(b"definitely not an image").is_err());
    }
}
