// SPDX-License-Identifier: GPL-3.0-only

//! Frame encoding for submission
//!
//! Captured frames travel to the classifier as `data:image/jpeg;base64,...`
//! URIs, and the classifier echoes the classified image back the same way.

use crate::backends::camera::CameraFrame;
use crate::constants::capture;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::RgbImage;
use tracing::debug;

/// A frame encoded for the capture endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedFrame {
    /// `data:image/jpeg;base64,...`
    pub data_uri: String,
    pub width: u32,
    pub height: u32,
}

/// Copy a frame into a tightly packed RGB raster at native resolution
///
/// Row padding (stride) and the alpha channel are dropped. Returns `None`
/// for zero-sized frames or buffers shorter than the frame claims.
pub fn frame_to_rgb(frame: &CameraFrame) -> Option<RgbImage> {
    if !frame.has_dimensions() {
        return None;
    }
    let bpp = frame.format.bytes_per_pixel() as usize;
    let row_len = frame.width as usize * bpp;
    let stride = frame.stride as usize;
    let mut rgb = Vec::with_capacity(frame.width as usize * frame.height as usize * 3);

    for y in 0..frame.height as usize {
        let start = y * stride;
        let row = frame.data.get(start..start + row_len)?;
        for px in row.chunks_exact(bpp) {
            rgb.extend_from_slice(&px[..3]);
        }
    }

    RgbImage::from_raw(frame.width, frame.height, rgb)
}

/// Encode an RGB raster as JPEG
pub fn encode_jpeg(image: &RgbImage, quality: u8) -> Result<Vec<u8>, String> {
    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);

    let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, quality);
    encoder
        .encode(
            image.as_raw(),
            image.width(),
            image.height(),
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| format!("JPEG encoding failed: {}", e))?;

    Ok(buffer)
}

/// Encode a camera frame as a JPEG data URI
pub fn encode_frame(frame: &CameraFrame, quality: u8) -> Result<CapturedFrame, String> {
    let rgb = frame_to_rgb(frame).ok_or_else(|| "Frame buffer is incomplete".to_string())?;
    let jpeg = encode_jpeg(&rgb, quality)?;
    debug!(
        width = frame.width,
        height = frame.height,
        size = jpeg.len(),
        quality,
        "Encoded capture"
    );
    Ok(CapturedFrame {
        data_uri: to_data_uri(capture::MEDIA_TYPE, &jpeg),
        width: frame.width,
        height: frame.height,
    })
}

/// Build a base64 data URI
pub fn to_data_uri(media_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", media_type, STANDARD.encode(bytes))
}

/// Split a base64 data URI into its media type and decoded bytes
pub fn decode_data_uri(uri: &str) -> Option<(String, Vec<u8>)> {
    let rest = uri.strip_prefix("data:")?;
    let (header, payload) = rest.split_once(',')?;
    let media_type = header.strip_suffix(";base64")?;
    let bytes = STANDARD.decode(payload.trim()).ok()?;
    Some((media_type.to_string(), bytes))
}
