// SPDX-License-Identifier: GPL-3.0-only

//! Message update handling
//!
//! `update()` is a dispatcher; the handling code lives in the `handlers`
//! submodules, grouped by the surface it acts on.
//!
//! # Handler Modules
//!
//! - `handlers::navigation`: page load and unload, scrolling, toast expiry
//! - `handlers::camera`: camera on/off, facing switch, capture
//! - `handlers::upload`: picker, drops, file loading, cancel
//! - `handlers::classify`: submission, results, modal close
//! - `handlers::search`: search field, quick searches, results

use crate::app::state::{AppModel, Message};
use crate::app::task::Task;
use tracing::trace;

impl AppModel {
    /// Main message handler - routes messages to the handler methods
    pub fn update(&mut self, message: Message) -> Task<Message> {
        trace!(?message, "update");
        match message {
            // ===== Navigation =====
            Message::Navigate(page) => self.handle_navigate(page),
            Message::Scroll(delta) => self.handle_scroll(delta),

            // ===== Camera =====
            Message::ToggleCamera => self.handle_toggle_camera(),
            Message::CameraGranted(grant) => self.handle_camera_granted(grant),
            Message::SwitchCamera => self.handle_switch_camera(),
            Message::SwitchSettled(ticket) => self.handle_switch_settled(ticket),
            Message::Capture => self.handle_capture(),

            // ===== Upload Zone =====
            Message::UploadZoneClicked => self.handle_upload_zone_clicked(),
            Message::FilePicked { epoch, path } => self.handle_file_picked(epoch, path),
            Message::FileDropped(path) => self.handle_file_dropped(path),
            Message::FileLoaded {
                epoch,
                dropped,
                result,
            } => self.handle_file_loaded(epoch, dropped, result),
            Message::Drag(phase) => self.handle_drag(phase),
            Message::CancelUpload => self.handle_cancel_upload(),
            Message::SubmitUpload => self.handle_submit_upload(),

            // ===== Classification =====
            Message::ClassificationFinished {
                epoch,
                kind,
                result,
            } => self.handle_classification_finished(epoch, kind, result),
            Message::CloseModal => self.handle_close_modal(),

            // ===== Search =====
            Message::FocusSearch => self.handle_focus_search(),
            Message::SearchInput(text) => self.handle_search_input(text),
            Message::Search => self.handle_search(),
            Message::QuickSearch(query) => self.handle_quick_search(query),
            Message::SearchFinished { epoch, result } => {
                self.handle_search_finished(epoch, result)
            }

            // ===== System =====
            Message::Tick => self.handle_tick(),
            Message::Noop => Task::none(),
        }
    }
}
