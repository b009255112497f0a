// SPDX-License-Identifier: GPL-3.0-only

//! Camera session lifecycle
//!
//! The controller is the only owner of the hardware stream. Starting is
//! split in two so that a late grant can be told apart from a current one:
//!
//! ```text
//! begin_start ──► PendingStart::acquire (blocking pool) ──► complete_start
//!      │                                                        │
//!      └── generation N                          grant for N?  ─┘
//! ```
//!
//! Every `stop` bumps the generation, so a grant that resolves after the
//! user turned the camera off or left the page is stopped on arrival.

use crate::app::notice::{NoticeStore, PendingNotice};
use crate::app::toast::ToastKind;
use crate::backends::camera::{
    BackendError, BackendResult, CameraBackend, CameraFrame, CameraStream, FacingMode,
};
use crate::constants::messages;
use crate::errors::CameraError;
use crate::media::{self, CapturedFrame};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// The live hardware session
pub struct CameraSession {
    pub facing: FacingMode,
    stream: Box<dyn CameraStream>,
}

/// A start request waiting for the hardware
pub struct PendingStart {
    backend: Arc<dyn CameraBackend>,
    facing: FacingMode,
    generation: u64,
}

impl PendingStart {
    /// Open the device on the blocking pool (video only)
    pub async fn acquire(self) -> CameraGrant {
        let PendingStart {
            backend,
            facing,
            generation,
        } = self;
        let result = tokio::task::spawn_blocking(move || backend.open(facing))
            .await
            .unwrap_or_else(|e| Err(BackendError::Other(format!("Camera task failed: {}", e))));
        CameraGrant {
            generation,
            facing,
            result,
        }
    }
}

/// Outcome of a hardware open, tagged with the start it answers
pub struct CameraGrant {
    generation: u64,
    facing: FacingMode,
    result: BackendResult<Box<dyn CameraStream>>,
}

impl std::fmt::Debug for CameraGrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraGrant")
            .field("generation", &self.generation)
            .field("facing", &self.facing)
            .field("granted", &self.result.is_ok())
            .finish()
    }
}

/// A facing switch waiting for the settle delay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwitchTicket {
    generation: u64,
    pub facing: FacingMode,
    pub delay: Duration,
}

pub struct CameraController {
    backend: Arc<dyn CameraBackend>,
    session: Option<CameraSession>,
    facing: FacingMode,
    generation: u64,
    starting: bool,
    jpeg_quality: u8,
    settle_delay: Duration,
}

impl CameraController {
    pub fn new(
        backend: Arc<dyn CameraBackend>,
        facing: FacingMode,
        jpeg_quality: u8,
        settle_delay: Duration,
    ) -> Self {
        Self {
            backend,
            session: None,
            facing,
            generation: 0,
            starting: false,
            jpeg_quality,
            settle_delay,
        }
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// A start is waiting for the hardware
    pub fn is_starting(&self) -> bool {
        self.starting
    }

    pub fn facing(&self) -> FacingMode {
        self.facing
    }

    pub fn device_name(&self) -> Option<&str> {
        self.session
            .as_ref()
            .map(|s| s.stream.device().name.as_str())
    }

    /// Most recent preview frame
    pub fn latest_frame(&self) -> Option<CameraFrame> {
        self.session.as_ref()?.stream.latest_frame()
    }

    /// Request the camera facing `facing`
    ///
    /// Returns `None` if a session is already live or a start is pending.
    pub fn begin_start(&mut self, facing: FacingMode) -> Option<PendingStart> {
        if self.session.is_some() || self.starting {
            return None;
        }
        self.generation += 1;
        self.starting = true;
        self.facing = facing;
        debug!(generation = self.generation, %facing, "Camera start requested");
        Some(PendingStart {
            backend: Arc::clone(&self.backend),
            facing,
            generation: self.generation,
        })
    }

    /// Bind a grant to the session
    ///
    /// A denial leaves the camera off and reports the hardware text. A grant
    /// for a start that is no longer current is stopped at once.
    pub fn complete_start(&mut self, grant: CameraGrant) -> Result<(), CameraError> {
        if grant.generation != self.generation || !self.starting {
            debug!(
                grant = grant.generation,
                current = self.generation,
                "Discarding superseded camera grant"
            );
            if let Ok(mut stream) = grant.result {
                stream.stop();
            }
            return Err(CameraError::Superseded);
        }
        self.starting = false;

        match grant.result {
            Ok(stream) => {
                info!(device = %stream.device().name, facing = %grant.facing, "Camera session started");
                self.session = Some(CameraSession {
                    facing: grant.facing,
                    stream,
                });
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Camera access failed");
                Err(CameraError::from(e))
            }
        }
    }

    /// Stop every track and forget the session; invalidates pending starts
    ///
    /// Returns whether a session was actually stopped.
    pub fn stop(&mut self) -> bool {
        self.generation += 1;
        self.starting = false;
        match self.session.take() {
            Some(mut session) => {
                session.stream.stop();
                info!("Camera session stopped");
                true
            }
            None => false,
        }
    }

    /// Toggle facing and stop; restart once the returned ticket matures
    ///
    /// Without a live session this does nothing at all.
    pub fn begin_switch(&mut self) -> Option<SwitchTicket> {
        self.session.as_ref()?;
        self.facing = self.facing.toggled();
        self.stop();
        debug!(facing = %self.facing, "Camera switch, waiting for device release");
        Some(SwitchTicket {
            generation: self.generation,
            facing: self.facing,
            delay: self.settle_delay,
        })
    }

    /// Restart after the settle delay unless something happened meanwhile
    pub fn resume_after_switch(&mut self, ticket: SwitchTicket) -> Option<PendingStart> {
        if ticket.generation != self.generation {
            debug!("Camera switch superseded");
            return None;
        }
        self.begin_start(ticket.facing)
    }

    /// Encode the current frame as a JPEG data URI at native resolution
    pub fn capture(&self) -> Result<CapturedFrame, CameraError> {
        let session = self.session.as_ref().ok_or(CameraError::NotReady)?;
        let frame = session
            .stream
            .latest_frame()
            .filter(CameraFrame::has_dimensions)
            .ok_or(CameraError::NotReady)?;
        media::encode_frame(&frame, self.jpeg_quality).map_err(CameraError::EncodingFailed)
    }

    /// Stop the session because the user is leaving the capture region
    ///
    /// If a session was live, the camera-off notice is stored for the next
    /// page. Returns whether a session was stopped.
    pub fn leave_capture_region(&mut self, notices: &mut dyn NoticeStore) -> bool {
        if !self.stop() {
            return false;
        }
        let notice = PendingNotice {
            message: messages::CAMERA_OFF.to_string(),
            kind: ToastKind::Warning,
        };
        if let Err(e) = notices.store(notice) {
            warn!(error = %e, "Failed to store camera notice");
        }
        true
    }
}

impl Drop for CameraController {
    fn drop(&mut self) {
        self.stop();
    }
}
