// SPDX-License-Identifier: GPL-3.0-only
// Shared types for camera backend abstraction

//! Shared types for camera backends

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// Which physical camera a session uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    /// Front-facing ("user") camera
    Front,
    /// Rear-facing ("environment") camera
    #[default]
    Back,
}

impl FacingMode {
    /// The other camera
    pub fn toggled(self) -> Self {
        match self {
            FacingMode::Front => FacingMode::Back,
            FacingMode::Back => FacingMode::Front,
        }
    }

    /// Location string as reported by libcamera/PipeWire device properties
    pub fn location(&self) -> &'static str {
        match self {
            FacingMode::Front => "front",
            FacingMode::Back => "back",
        }
    }
}

impl std::fmt::Display for FacingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.location())
    }
}

impl std::str::FromStr for FacingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "front" | "user" => Ok(FacingMode::Front),
            "back" | "rear" | "environment" => Ok(FacingMode::Back),
            other => Err(format!("unknown facing mode: {}", other)),
        }
    }
}

/// Represents a camera device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraDevice {
    pub name: String,
    /// Backend-specific identifier (device path or index)
    pub path: String,
    /// Camera location: "front", "back", or "external"
    pub camera_location: Option<String>,
}

impl CameraDevice {
    /// Whether this device is known to face the given direction
    pub fn faces(&self, facing: FacingMode) -> bool {
        self.camera_location.as_deref() == Some(facing.location())
    }
}

/// Pixel format for camera frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// RGBA - 32-bit with alpha (4 bytes per pixel)
    /// The format the capture pipeline negotiates
    RGBA,
}

impl PixelFormat {
    pub fn bytes_per_pixel(&self) -> u32 {
        match self {
            Self::RGBA => 4,
        }
    }
}

/// A single frame from the camera
#[derive(Debug, Clone)]
pub struct CameraFrame {
    pub width: u32,
    pub height: u32,
    pub data: Arc<[u8]>,
    pub format: PixelFormat,
    /// Row stride in bytes (may include padding)
    pub stride: u32,
    /// Timestamp when frame was captured
    pub captured_at: Instant,
}

impl CameraFrame {
    /// Build a tightly packed RGBA frame
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data: Arc::from(data),
            format: PixelFormat::RGBA,
            stride: width * 4,
            captured_at: Instant::now(),
        }
    }

    /// Whether the frame has usable dimensions
    pub fn has_dimensions(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// RGB value at (x, y), clamped to the frame
    pub fn rgb_at(&self, x: u32, y: u32) -> (u8, u8, u8) {
        if !self.has_dimensions() {
            return (0, 0, 0);
        }
        let x = x.min(self.width - 1);
        let y = y.min(self.height - 1);
        let bpp = self.format.bytes_per_pixel();
        let idx = (y * self.stride + x * bpp) as usize;
        match self.data.get(idx..idx + 3) {
            Some(px) => (px[0], px[1], px[2]),
            None => (0, 0, 0),
        }
    }
}

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Error types for backend operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Backend is not available on this system
    NotAvailable(String),
    /// Failed to initialize backend
    InitializationFailed(String),
    /// Camera device not found
    DeviceNotFound(String),
    /// Access to the device was refused
    PermissionDenied(String),
    /// Other errors
    Other(String),
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::NotAvailable(msg) => write!(f, "Backend not available: {}", msg),
            BackendError::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            BackendError::DeviceNotFound(msg) => write!(f, "Device not found: {}", msg),
            BackendError::PermissionDenied(msg) => write!(f, "Permission denied: {}", msg),
            BackendError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for BackendError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facing_toggle() {
        assert_eq!(FacingMode::Back.toggled(), FacingMode::Front);
        assert_eq!(FacingMode::Front.toggled().toggled(), FacingMode::Front);
    }

    #[test]
    fn test_facing_parse_accepts_web_names() {
        assert_eq!("environment".parse::<FacingMode>(), Ok(FacingMode::Back));
        assert_eq!("user".parse::<FacingMode>(), Ok(FacingMode::Front));
        assert!("sideways".parse::<FacingMode>().is_err());
    }

    #[test]
    fn test_rgb_at_respects_stride() {
        // 2x1 RGBA with 4 bytes of row padding
        let frame = CameraFrame {
            width: 2,
            height: 1,
            data: Arc::from(vec![1, 2, 3, 255, 4, 5, 6, 255, 0, 0, 0, 0]),
            format: PixelFormat::RGBA,
            stride: 12,
            captured_at: Instant::now(),
        };
        assert_eq!(frame.rgb_at(1, 0), (4, 5, 6));
        assert_eq!(frame.rgb_at(9, 9), (4, 5, 6));
    }

    #[test]
    fn test_zero_sized_frame() {
        let frame = CameraFrame::from_rgba(0, 0, Vec::new());
        assert!(!frame.has_dimensions());
        assert_eq!(frame.rgb_at(0, 0), (0, 0, 0));
    }
}
