// SPDX-License-Identifier: GPL-3.0-only

//! Image encoding and preview utilities
//!
//! - [`encoding`]: camera frame to JPEG data URI, data URI decoding
//! - [`thumbnail`]: decoded previews for the terminal front end

pub mod encoding;
pub mod thumbnail;

pub use encoding::{CapturedFrame, decode_data_uri, encode_frame, to_data_uri};
pub use thumbnail::{PixelSource, Thumbnail};

use crate::constants::limits;
use std::path::Path;

/// Media type declared for a file, derived from its extension
///
/// Unknown extensions map to `application/octet-stream`, which the upload
/// zone rejects as not an image.
pub fn media_type_for_path(path: &Path) -> &'static str {
    image::ImageFormat::from_path(path)
        .map(|format| format.to_mime_type())
        .unwrap_or("application/octet-stream")
}

/// Extensions offered by the file picker
///
/// Exactly the extensions [`media_type_for_path`] maps to an `image/` type,
/// so the picker and drops accept the same files.
pub fn picker_extensions() -> Vec<&'static str> {
    let mut extensions: Vec<&'static str> = image::ImageFormat::all()
        .flat_map(|format| format.extensions_str().iter().copied())
        .filter(|ext| {
            image::ImageFormat::from_extension(ext)
                .is_some_and(|format| format.to_mime_type().starts_with(limits::IMAGE_MEDIA_PREFIX))
        })
        .collect();
    extensions.sort_unstable();
    extensions.dedup();
    extensions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_picker_matches_drop_acceptance() {
        let extensions = picker_extensions();
        for ext in ["png", "jpg", "jpeg", "bmp", "gif", "webp", "tiff"] {
            assert!(extensions.contains(&ext), "missing {}", ext);
        }
        for ext in &extensions {
            let path = format!("bunga.{}", ext);
            assert!(media_type_for_path(Path::new(&path)).starts_with("image/"));
        }
    }

    #[test]
    fn test_media_type_from_extension() {
        assert_eq!(media_type_for_path(Path::new("mawar.JPG")), "image/jpeg");
        assert_eq!(media_type_for_path(Path::new("a/b/tulip.png")), "image/png");
        assert_eq!(
            media_type_for_path(Path::new("notes.txt")),
            "application/octet-stream"
        );
    }
}
