// SPDX-License-Identifier: GPL-3.0-only

//! Small RGBA previews for the upload zone and the result modal

use crate::backends::camera::CameraFrame;
use image::GenericImageView;
use std::sync::Arc;
use tracing::debug;

/// Decoded preview image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA
    pub rgba: Arc<Vec<u8>>,
}

impl Thumbnail {
    /// Decode encoded image bytes and shrink to fit `max_width` x `max_height`
    ///
    /// Returns `None` when the bytes are not a decodable image; the preview is
    /// then shown without a picture.
    pub fn from_bytes(bytes: &[u8], max_width: u32, max_height: u32) -> Option<Self> {
        let img = match image::load_from_memory(bytes) {
            Ok(img) => img,
            Err(e) => {
                debug!(error = %e, "Preview decode failed");
                return None;
            }
        };
        let (w, h) = img.dimensions();
        let img = if w > max_width || h > max_height {
            img.thumbnail(max_width.max(1), max_height.max(1))
        } else {
            img
        };
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Some(Self {
            width,
            height,
            rgba: Arc::new(rgba.into_raw()),
        })
    }

    /// RGB value at (x, y), clamped to the image
    pub fn rgb_at(&self, x: u32, y: u32) -> (u8, u8, u8) {
        if self.width == 0 || self.height == 0 {
            return (0, 0, 0);
        }
        let x = x.min(self.width - 1);
        let y = y.min(self.height - 1);
        let idx = ((y * self.width + x) * 4) as usize;
        match self.rgba.get(idx..idx + 3) {
            Some(px) => (px[0], px[1], px[2]),
            None => (0, 0, 0),
        }
    }
}

/// Anything that can be sampled per pixel for half-block rendering
pub trait PixelSource {
    fn dimensions(&self) -> (u32, u32);
    fn sample(&self, x: u32, y: u32) -> (u8, u8, u8);
}

impl PixelSource for Thumbnail {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn sample(&self, x: u32, y: u32) -> (u8, u8, u8) {
        self.rgb_at(x, y)
    }
}

impl PixelSource for CameraFrame {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn sample(&self, x: u32, y: u32) -> (u8, u8, u8) {
        self.rgb_at(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 10, 10, 255]));
        let mut buffer = Vec::new();
        img.write_to(
            &mut std::io::Cursor::new(&mut buffer),
            image::ImageFormat::Png,
        )
        .unwrap();
        buffer
    }

    #[test]
    fn test_thumbnail_fits_bounds() {
        let thumb = Thumbnail::from_bytes(&png_bytes(400, 200), 40, 40).unwrap();
        assert!(thumb.width <= 40 && thumb.height <= 40);
        assert_eq!(thumb.rgb_at(0, 0), (200, 10, 10));
    }

    #[test]
    fn test_small_image_kept_at_native_size() {
        let thumb = Thumbnail::from_bytes(&png_bytes(3, 2), 40, 40).unwrap();
        assert_eq!((thumb.width, thumb.height), (3, 2));
    }

    #[test]
    fn test_garbage_bytes_have_no_thumbnail() {
        assert!(Thumbnail::from_bytes(b"not an image", 40, 40).is_none());
    }
}
