// SPDX-License-Identifier: GPL-3.0-only

//! Camera control handlers
//!
//! Turning the camera on, switching facing and capturing a frame for
//! classification.

use crate::app::camera::{CameraGrant, SwitchTicket};
use crate::app::state::{AppModel, Message};
use crate::app::task::Task;
use crate::app::toast::ToastKind;
use crate::backends::camera::FacingMode;
use crate::constants::messages;
use crate::errors::CameraError;
use tracing::{debug, info, warn};

impl AppModel {
    // =========================================================================
    // Camera Control Handlers
    // =========================================================================

    pub(crate) fn handle_toggle_camera(&mut self) -> Task<Message> {
        if self.camera.is_active() {
            self.camera.stop();
            self.toasts.show(messages::CAMERA_OFF, ToastKind::Warning);
            return Task::none();
        }
        if !self.mounts.camera {
            debug!("No camera surface on this page");
            return Task::none();
        }
        self.start_camera(self.camera.facing())
    }

    fn start_camera(&mut self, facing: FacingMode) -> Task<Message> {
        match self.camera.begin_start(facing) {
            Some(pending) => Task::perform(pending.acquire(), Message::CameraGranted),
            None => {
                debug!("Camera already running or starting");
                Task::none()
            }
        }
    }

    pub(crate) fn handle_camera_granted(&mut self, grant: CameraGrant) -> Task<Message> {
        match self.camera.complete_start(grant) {
            Ok(()) => {
                self.toasts.show(messages::CAMERA_ON, ToastKind::Success);
            }
            Err(CameraError::Superseded) => {}
            Err(e) => {
                self.toasts.show(e.user_message(), ToastKind::Error);
            }
        }
        Task::none()
    }

    pub(crate) fn handle_switch_camera(&mut self) -> Task<Message> {
        match self.camera.begin_switch() {
            Some(ticket) => {
                info!(facing = %ticket.facing, "Switching camera");
                Task::delayed(ticket.delay, Message::SwitchSettled(ticket))
            }
            None => {
                debug!("Switch ignored, camera is off");
                Task::none()
            }
        }
    }

    pub(crate) fn handle_switch_settled(&mut self, ticket: SwitchTicket) -> Task<Message> {
        match self.camera.resume_after_switch(ticket) {
            Some(pending) => Task::perform(pending.acquire(), Message::CameraGranted),
            None => Task::none(),
        }
    }

    // =========================================================================
    // Capture Handlers
    // =========================================================================

    pub(crate) fn handle_capture(&mut self) -> Task<Message> {
        let frame = match self.camera.capture() {
            Ok(frame) => frame,
            Err(e) => {
                warn!(error = %e, "Capture failed");
                self.toasts.show(e.user_message(), ToastKind::Error);
                return Task::none();
            }
        };
        debug!(width = frame.width, height = frame.height, "Frame captured");

        match self.classifier.begin_capture(frame.data_uri) {
            Ok(pending) => self.submit(pending),
            Err(e) => {
                self.toasts.show(e.user_message(), e.toast_kind());
                Task::none()
            }
        }
    }
}
