// SPDX-License-Identifier: GPL-3.0-only

//! Virtual camera backend
//!
//! Serves a still image as a live feed. Used by the headless `capture`
//! command when `--image` is given, and by tests that need a camera without
//! hardware. Open and stop calls are counted so callers can assert that a
//! code path never touched the device.

use super::types::*;
use super::{CameraBackend, CameraStream};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info};

/// Counters shared between the backend and every stream it opened
#[derive(Debug, Default)]
struct Counters {
    opens: AtomicUsize,
    stops: AtomicUsize,
}

/// A camera backed by a fixed frame
#[derive(Clone)]
pub struct VirtualCameraBackend {
    frame: Option<CameraFrame>,
    /// When set, `open` fails with this message (permission denial, busy device)
    refusal: Option<String>,
    counters: Arc<Counters>,
}

impl VirtualCameraBackend {
    /// Camera that always shows `frame`
    pub fn with_frame(frame: CameraFrame) -> Self {
        Self {
            frame: Some(frame),
            refusal: None,
            counters: Arc::default(),
        }
    }

    /// Camera that shows a solid colour
    pub fn solid(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let data = (0..width * height)
            .flat_map(|_| [rgb[0], rgb[1], rgb[2], 255])
            .collect();
        Self::with_frame(CameraFrame::from_rgba(width, height, data))
    }

    /// Camera that opens but never produces a sized frame
    pub fn blank() -> Self {
        Self {
            frame: None,
            refusal: None,
            counters: Arc::default(),
        }
    }

    /// Camera whose access is always refused
    pub fn refusing(message: impl Into<String>) -> Self {
        Self {
            frame: None,
            refusal: Some(message.into()),
            counters: Arc::default(),
        }
    }

    /// Camera that replays an image file
    pub fn from_image_file(path: &Path) -> BackendResult<Self> {
        let img = image::open(path)
            .map_err(|e| BackendError::InitializationFailed(format!("{}: {}", path.display(), e)))?
            .to_rgba8();
        let (width, height) = img.dimensions();
        info!(path = %path.display(), width, height, "Virtual camera loaded image");
        Ok(Self::with_frame(CameraFrame::from_rgba(
            width,
            height,
            img.into_raw(),
        )))
    }

    /// Number of successful and failed `open` calls
    pub fn opens(&self) -> usize {
        self.counters.opens.load(Ordering::SeqCst)
    }

    /// Number of streams stopped
    pub fn stops(&self) -> usize {
        self.counters.stops.load(Ordering::SeqCst)
    }
}

impl CameraBackend for VirtualCameraBackend {
    fn enumerate_cameras(&self) -> Vec<CameraDevice> {
        [FacingMode::Front, FacingMode::Back]
            .into_iter()
            .map(virtual_device)
            .collect()
    }

    fn open(&self, facing: FacingMode) -> BackendResult<Box<dyn CameraStream>> {
        self.counters.opens.fetch_add(1, Ordering::SeqCst);
        if let Some(reason) = &self.refusal {
            return Err(BackendError::PermissionDenied(reason.clone()));
        }
        debug!(%facing, "Opening virtual camera");
        Ok(Box::new(VirtualStream {
            frame: self.frame.clone(),
            device: virtual_device(facing),
            counters: Arc::clone(&self.counters),
            stopped: false,
        }))
    }

    fn name(&self) -> &'static str {
        "virtual"
    }
}

fn virtual_device(facing: FacingMode) -> CameraDevice {
    CameraDevice {
        name: format!("Virtual Camera ({})", facing),
        path: format!("virtual:{}", facing),
        camera_location: Some(facing.location().to_string()),
    }
}

struct VirtualStream {
    frame: Option<CameraFrame>,
    device: CameraDevice,
    counters: Arc<Counters>,
    stopped: bool,
}

impl CameraStream for VirtualStream {
    fn latest_frame(&self) -> Option<CameraFrame> {
        if self.stopped {
            return None;
        }
        self.frame.clone()
    }

    fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        self.counters.stops.fetch_add(1, Ordering::SeqCst);
    }

    fn device(&self) -> &CameraDevice {
        &self.device
    }
}

impl Drop for VirtualStream {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refusing_backend_counts_open() {
        let backend = VirtualCameraBackend::refusing("Permission denied");
        assert!(matches!(
            backend.open(FacingMode::Back),
            Err(BackendError::PermissionDenied(_))
        ));
        assert_eq!(backend.opens(), 1);
    }

    #[test]
    fn test_stream_stop_counted_once() {
        let backend = VirtualCameraBackend::solid(4, 4, [10, 20, 30]);
        let mut stream = backend.open(FacingMode::Front).unwrap();
        assert_eq!(stream.device().camera_location.as_deref(), Some("front"));
        assert_eq!(stream.latest_frame().unwrap().rgb_at(0, 0), (10, 20, 30));
        stream.stop();
        stream.stop();
        drop(stream);
        assert_eq!(backend.stops(), 1);
    }
}
