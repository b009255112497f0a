// SPDX-License-Identifier: GPL-3.0-only

//! Upload zone handlers: picker, drops and file loading

use crate::app::state::{AppModel, Message};
use crate::app::task::Task;
use crate::app::toast::ToastKind;
use crate::app::upload_zone::{DragPhase, SelectedFile, Source};
use crate::constants::messages;
use crate::media;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Ask the desktop for an image file
async fn pick_image() -> Option<PathBuf> {
    rfd::AsyncFileDialog::new()
        .set_title("Pilih gambar bunga")
        .add_filter("Gambar", &media::picker_extensions())
        .pick_file()
        .await
        .map(|handle| handle.path().to_path_buf())
}

impl AppModel {
    // =========================================================================
    // Upload Zone Handlers
    // =========================================================================

    pub(crate) fn handle_upload_zone_clicked(&mut self) -> Task<Message> {
        if self.picker_open {
            debug!("File picker already open");
            return Task::none();
        }
        if !self.upload_zone.click() {
            debug!("Click binding detached, picker not opened");
            return Task::none();
        }
        self.picker_open = true;
        let epoch = self.page_epoch;
        Task::perform(pick_image(), move |path| Message::FilePicked { epoch, path })
    }

    pub(crate) fn handle_file_picked(
        &mut self,
        epoch: u64,
        path: Option<PathBuf>,
    ) -> Task<Message> {
        // The dialog is gone, whichever page opened it
        self.picker_open = false;
        if epoch != self.page_epoch {
            debug!("Dropping file picked on a previous page");
            return Task::none();
        }
        match path {
            Some(path) => self.load_file(path, false),
            None => {
                debug!("File picker cancelled");
                Task::none()
            }
        }
    }

    pub(crate) fn handle_file_dropped(&mut self, path: PathBuf) -> Task<Message> {
        self.upload_zone.drag(DragPhase::Drop);
        if !self.upload_zone.bindings().drop {
            debug!(path = %path.display(), "Drop ignored, binding detached");
            return Task::none();
        }
        self.load_file(path, true)
    }

    fn load_file(&mut self, path: PathBuf, dropped: bool) -> Task<Message> {
        let epoch = self.page_epoch;
        info!(path = %path.display(), dropped, "Loading file");
        Task::perform(
            async move { SelectedFile::read(&path).await.map_err(|e| e.to_string()) },
            move |result| Message::FileLoaded {
                epoch,
                dropped,
                result,
            },
        )
    }

    pub(crate) fn handle_file_loaded(
        &mut self,
        epoch: u64,
        dropped: bool,
        result: Result<SelectedFile, String>,
    ) -> Task<Message> {
        if epoch != self.page_epoch {
            debug!("Dropping file loaded for a previous page");
            return Task::none();
        }
        let file = match result {
            Ok(file) => file,
            Err(e) => {
                warn!(error = %e, "Failed to read file");
                self.toasts
                    .show(format!("{}{}", messages::GENERIC_ERROR_PREFIX, e), ToastKind::Error);
                return Task::none();
            }
        };

        let source = if dropped { Source::Drop } else { Source::Picker };
        match self.upload_zone.select(file, source) {
            Ok(true) => self.refresh_focus(),
            Ok(false) => {}
            Err(e) => {
                debug!(error = %e, "Selection rejected");
                self.toasts.show(e.user_message(), e.toast_kind());
            }
        }
        Task::none()
    }

    pub(crate) fn handle_drag(&mut self, phase: DragPhase) -> Task<Message> {
        self.upload_zone.drag(phase);
        Task::none()
    }

    pub(crate) fn handle_cancel_upload(&mut self) -> Task<Message> {
        self.upload_zone.reset();
        Task::none()
    }
}
