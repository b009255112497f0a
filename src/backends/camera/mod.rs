// SPDX-License-Identifier: GPL-3.0-only

//! Camera backend abstraction
//!
//! ```text
//! ┌─────────────────────┐
//! │  CameraController   │  ← session lifecycle, capture, navigation rules
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │  CameraBackend Trait│  ← enumerate + open a video-only stream
//! └──────────┬──────────┘
//!            │
//!     ┌──────┴───────┐
//!     ▼              ▼
//! ┌─────────┐  ┌───────────┐
//! │GStreamer│  │  Virtual  │  ← still image served as a live feed
//! └─────────┘  └───────────┘
//! ```

pub mod gst_backend;
pub mod types;
pub mod virtual_camera;

pub use types::*;

use std::sync::Arc;

/// A hardware camera provider
///
/// `open` may block (device negotiation, permission prompts) and is always
/// called from the blocking pool.
pub trait CameraBackend: Send + Sync {
    /// Enumerate available cameras on this backend
    fn enumerate_cameras(&self) -> Vec<CameraDevice>;

    /// Open a video-only stream on the camera facing `facing`
    fn open(&self, facing: FacingMode) -> BackendResult<Box<dyn CameraStream>>;

    /// Short name for logs
    fn name(&self) -> &'static str;
}

/// A live video stream
///
/// Dropping a stream without calling `stop` must still release the device.
pub trait CameraStream: Send {
    /// Most recent frame, if the device has produced one
    fn latest_frame(&self) -> Option<CameraFrame>;

    /// Halt all video tracks
    fn stop(&mut self);

    /// Device the stream is bound to
    fn device(&self) -> &CameraDevice;
}

/// Get the default system backend (GStreamer device discovery)
pub fn get_backend() -> Arc<dyn CameraBackend> {
    Arc::new(gst_backend::GstBackend::new())
}
