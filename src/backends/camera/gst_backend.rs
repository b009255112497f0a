// SPDX-License-Identifier: GPL-3.0-only

//! GStreamer camera backend
//!
//! Devices are discovered with a `DeviceMonitor` (PipeWire, libcamera and V4L2
//! providers all register there). A stream is the device source element
//! followed by `videoconvert ! video/x-raw,format=RGBA ! appsink`; the appsink
//! callback keeps only the most recent frame.

use super::types::*;
use super::{CameraBackend, CameraStream};
use crate::constants::timing;
use gstreamer::prelude::*;
use gstreamer_app::AppSink;
use gstreamer_video::VideoInfo;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::{debug, error, info, warn};

static FRAME_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Properties that carry the physical mounting of a camera
const LOCATION_PROPERTIES: &[&str] = &["api.libcamera.location", "camera.location"];

/// Conversion chain appended to every device source
const SINK_CHAIN: &str = "videoconvert ! video/x-raw,format=RGBA ! appsink name=sink";

/// Maximum buffers queued in the appsink (keep small for low latency)
const MAX_BUFFERS: u32 = 2;

pub struct GstBackend;

impl GstBackend {
    pub fn new() -> Self {
        Self
    }

    fn discover() -> BackendResult<Vec<(CameraDevice, gstreamer::Device)>> {
        gstreamer::init().map_err(|e| BackendError::NotAvailable(e.to_string()))?;

        let monitor = gstreamer::DeviceMonitor::new();
        monitor.add_filter(Some("Video/Source"), None);
        monitor
            .start()
            .map_err(|e| BackendError::NotAvailable(format!("Device monitor failed: {}", e)))?;
        let devices = monitor.devices();
        monitor.stop();

        let found = devices
            .into_iter()
            .enumerate()
            .map(|(index, device)| {
                let camera_location = device.properties().and_then(|props| {
                    LOCATION_PROPERTIES
                        .iter()
                        .find_map(|key| props.get::<String>(*key).ok())
                });
                let camera = CameraDevice {
                    name: device.display_name().to_string(),
                    path: index.to_string(),
                    camera_location,
                };
                (camera, device)
            })
            .collect::<Vec<_>>();

        debug!(count = found.len(), "GStreamer device discovery complete");
        Ok(found)
    }

    /// Pick the device for a facing mode
    ///
    /// A device whose reported location matches wins. Without location data,
    /// front maps to the first device and back to the last one (laptops list
    /// the built-in webcam first).
    fn select(
        devices: Vec<(CameraDevice, gstreamer::Device)>,
        facing: FacingMode,
    ) -> Option<(CameraDevice, gstreamer::Device)> {
        let position = devices
            .iter()
            .position(|(camera, _)| camera.faces(facing))
            .or(match facing {
                FacingMode::Front if !devices.is_empty() => Some(0),
                FacingMode::Back => devices.len().checked_sub(1),
                _ => None,
            })?;
        devices.into_iter().nth(position)
    }
}

impl Default for GstBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraBackend for GstBackend {
    fn enumerate_cameras(&self) -> Vec<CameraDevice> {
        match Self::discover() {
            Ok(devices) => devices.into_iter().map(|(camera, _)| camera).collect(),
            Err(e) => {
                warn!(error = %e, "Camera enumeration failed");
                Vec::new()
            }
        }
    }

    fn open(&self, facing: FacingMode) -> BackendResult<Box<dyn CameraStream>> {
        let devices = Self::discover()?;
        let (camera, source) = match Self::select(devices, facing) {
            Some((camera, device)) => {
                let element = device.create_element(None).map_err(|e| {
                    BackendError::InitializationFailed(format!("Cannot create source: {}", e))
                })?;
                (camera, element)
            }
            None => {
                info!("No camera discovered, falling back to autovideosrc");
                let element = gstreamer::ElementFactory::make("autovideosrc")
                    .build()
                    .map_err(|_| BackendError::DeviceNotFound("No camera found".to_string()))?;
                let camera = CameraDevice {
                    name: "Default Camera".to_string(),
                    path: String::new(),
                    camera_location: None,
                };
                (camera, element)
            }
        };

        info!(device = %camera.name, %facing, "Opening camera");
        let stream = GstStream::new(camera, source)?;
        Ok(Box::new(stream))
    }

    fn name(&self) -> &'static str {
        "gstreamer"
    }
}

/// Live stream backed by a GStreamer pipeline
pub struct GstStream {
    pipeline: gstreamer::Pipeline,
    appsink: AppSink,
    latest: Arc<Mutex<Option<CameraFrame>>>,
    device: CameraDevice,
    stopped: bool,
}

impl GstStream {
    fn new(device: CameraDevice, source: gstreamer::Element) -> BackendResult<Self> {
        let convert = gstreamer::parse::bin_from_description(SINK_CHAIN, true)
            .map_err(|e| BackendError::InitializationFailed(e.to_string()))?;

        let appsink = convert
            .by_name("sink")
            .ok_or_else(|| BackendError::InitializationFailed("Failed to get appsink".to_string()))?
            .dynamic_cast::<AppSink>()
            .map_err(|_| {
                BackendError::InitializationFailed("Failed to cast appsink".to_string())
            })?;
        appsink.set_property("sync", false);
        appsink.set_property("max-buffers", MAX_BUFFERS);
        appsink.set_property("drop", true);

        let pipeline = gstreamer::Pipeline::new();
        pipeline
            .add_many([&source, convert.upcast_ref::<gstreamer::Element>()])
            .map_err(|e| BackendError::InitializationFailed(e.to_string()))?;
        source
            .link(&convert)
            .map_err(|e| BackendError::InitializationFailed(e.to_string()))?;

        let latest: Arc<Mutex<Option<CameraFrame>>> = Arc::new(Mutex::new(None));
        let slot = Arc::clone(&latest);
        appsink.set_callbacks(
            gstreamer_app::AppSinkCallbacks::builder()
                .new_sample(move |appsink| {
                    let frame_num = FRAME_COUNTER.fetch_add(1, Ordering::Relaxed);
                    let sample = appsink.pull_sample().map_err(|_| gstreamer::FlowError::Eos)?;
                    let buffer = sample.buffer().ok_or(gstreamer::FlowError::Error)?;
                    let caps = sample.caps().ok_or(gstreamer::FlowError::Error)?;
                    let info =
                        VideoInfo::from_caps(caps).map_err(|_| gstreamer::FlowError::Error)?;
                    let map = buffer
                        .map_readable()
                        .map_err(|_| gstreamer::FlowError::Error)?;

                    let frame = CameraFrame {
                        width: info.width(),
                        height: info.height(),
                        data: Arc::from(map.as_slice()),
                        format: PixelFormat::RGBA,
                        stride: info.stride()[0] as u32,
                        captured_at: Instant::now(),
                    };
                    if frame_num % 60 == 0 {
                        debug!(
                            frame = frame_num,
                            width = frame.width,
                            height = frame.height,
                            "Camera frame"
                        );
                    }
                    if let Ok(mut guard) = slot.lock() {
                        *guard = Some(frame);
                    }
                    Ok(gstreamer::FlowSuccess::Ok)
                })
                .build(),
        );

        if let Err(e) = pipeline.set_state(gstreamer::State::Playing) {
            let reason = bus_error(&pipeline).unwrap_or_else(|| e.to_string());
            let _ = pipeline.set_state(gstreamer::State::Null);
            return Err(classify_start_error(reason));
        }

        let (result, state, _) = pipeline.state(gstreamer::ClockTime::from_seconds(
            timing::START_TIMEOUT_SECS,
        ));
        if result.is_err() {
            let reason = bus_error(&pipeline)
                .unwrap_or_else(|| format!("Pipeline failed to start (state: {:?})", state));
            let _ = pipeline.set_state(gstreamer::State::Null);
            return Err(classify_start_error(reason));
        }

        info!(device = %device.name, ?state, "Camera pipeline running");
        Ok(Self {
            pipeline,
            appsink,
            latest,
            device,
            stopped: false,
        })
    }
}

impl CameraStream for GstStream {
    fn latest_frame(&self) -> Option<CameraFrame> {
        self.latest.lock().ok().and_then(|guard| guard.clone())
    }

    fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;

        // Clear appsink callbacks to release all references
        self.appsink
            .set_callbacks(gstreamer_app::AppSinkCallbacks::builder().build());

        if let Err(e) = self.pipeline.set_state(gstreamer::State::Null) {
            error!(error = %e, "Failed to stop camera pipeline");
            return;
        }
        let (result, state, _) = self.pipeline.state(gstreamer::ClockTime::from_seconds(
            timing::STOP_TIMEOUT_SECS,
        ));
        debug!(?result, ?state, device = %self.device.name, "Camera pipeline stopped");
        if let Ok(mut guard) = self.latest.lock() {
            *guard = None;
        }
    }

    fn device(&self) -> &CameraDevice {
        &self.device
    }
}

impl Drop for GstStream {
    fn drop(&mut self) {
        self.stop();
    }
}

/// First error message posted on the pipeline bus, if any
fn bus_error(pipeline: &gstreamer::Pipeline) -> Option<String> {
    let bus = pipeline.bus()?;
    let msg = bus.timed_pop_filtered(
        gstreamer::ClockTime::from_mseconds(100),
        &[gstreamer::MessageType::Error],
    )?;
    match msg.view() {
        gstreamer::MessageView::Error(err) => {
            error!(error = %err.error(), debug = ?err.debug(), "GStreamer error during camera start");
            Some(err.error().to_string())
        }
        _ => None,
    }
}

fn classify_start_error(reason: String) -> BackendError {
    let lower = reason.to_lowercase();
    if lower.contains("permission") || lower.contains("not authorized") || lower.contains("denied")
    {
        BackendError::PermissionDenied(reason)
    } else {
        BackendError::InitializationFailed(reason)
    }
}
