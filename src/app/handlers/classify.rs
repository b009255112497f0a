// SPDX-License-Identifier: GPL-3.0-only

//! Submission and result handlers

use crate::app::state::{AppModel, Message};
use crate::app::task::Task;
use crate::app::toast::ToastKind;
use crate::classifier::{ClassificationOutcome, ClassifyPayload, PendingRequest, RequestKind};
use crate::errors::ClientError;
use tracing::{debug, info, warn};

impl AppModel {
    // =========================================================================
    // Submission
    // =========================================================================

    /// Show the loading indicator and send a request that passed local checks
    pub(crate) fn submit(&mut self, pending: PendingRequest) -> Task<Message> {
        let epoch = self.page_epoch;
        let kind = pending.kind();
        self.classify_pending = true;
        self.sync_loading();
        Task::perform(pending.send(), move |result| Message::ClassificationFinished {
            epoch,
            kind,
            result,
        })
    }

    pub(crate) fn handle_submit_upload(&mut self) -> Task<Message> {
        match self.classifier.begin_upload(self.upload_zone.selected()) {
            Ok(pending) => self.submit(pending),
            Err(e) => {
                debug!(error = %e, "Upload rejected locally");
                self.toasts.show(e.user_message(), e.toast_kind());
                Task::none()
            }
        }
    }

    // =========================================================================
    // Results
    // =========================================================================

    pub(crate) fn handle_classification_finished(
        &mut self,
        epoch: u64,
        kind: RequestKind,
        result: Result<ClassifyPayload, ClientError>,
    ) -> Task<Message> {
        if epoch != self.page_epoch {
            debug!(epoch, current = self.page_epoch, "Dropping result for a previous page");
            return Task::none();
        }
        self.classify_pending = false;
        self.sync_loading();

        match result {
            Ok(payload) => {
                let outcome = ClassificationOutcome::from_payload(payload, kind);
                info!(?kind, outcome = outcome.label(), "Classification finished");
                let opened = self
                    .presenter
                    .present(&outcome, &mut self.viewport, &mut self.toasts);
                if opened {
                    self.refresh_focus();
                }
            }
            Err(e) => {
                warn!(?kind, error = %e, "Classification request failed");
                self.toasts.show(e.user_message(), ToastKind::Error);
            }
        }
        Task::none()
    }

    pub(crate) fn handle_close_modal(&mut self) -> Task<Message> {
        if self.presenter.close(&mut self.viewport) {
            self.upload_zone.reset();
            self.refresh_focus();
        }
        Task::none()
    }
}
