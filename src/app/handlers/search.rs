// SPDX-License-Identifier: GPL-3.0-only

//! Search handlers

use crate::app::focus::Control;
use crate::app::state::{AppModel, Message};
use crate::app::task::Task;
use crate::app::toast::ToastKind;
use crate::classifier::SearchPayload;
use crate::errors::ClientError;
use tracing::{debug, warn};

impl AppModel {
    // =========================================================================
    // Search Handlers
    // =========================================================================

    pub(crate) fn handle_focus_search(&mut self) -> Task<Message> {
        self.focus.focus(&Control::SearchInput);
        Task::none()
    }

    pub(crate) fn handle_search_input(&mut self, text: String) -> Task<Message> {
        self.search.set_query(text);
        Task::none()
    }

    pub(crate) fn handle_search(&mut self) -> Task<Message> {
        if !self.mounts.search {
            return Task::none();
        }
        let pending = match self.search_client.begin(self.search.query()) {
            Ok(pending) => pending,
            Err(e) => {
                self.toasts.show(e.user_message(), e.toast_kind());
                self.focus.focus(&Control::SearchInput);
                return Task::none();
            }
        };
        debug!(query = pending.query(), "Search started");
        let epoch = self.page_epoch;
        self.searches_pending += 1;
        self.sync_loading();
        Task::perform(pending.send(), move |result| Message::SearchFinished {
            epoch,
            result,
        })
    }

    pub(crate) fn handle_quick_search(&mut self, query: String) -> Task<Message> {
        self.search.set_query(query);
        self.handle_search()
    }

    pub(crate) fn handle_search_finished(
        &mut self,
        epoch: u64,
        result: Result<SearchPayload, ClientError>,
    ) -> Task<Message> {
        if epoch != self.page_epoch {
            return Task::none();
        }
        self.searches_pending = self.searches_pending.saturating_sub(1);
        self.sync_loading();
        match result {
            Ok(payload) => {
                if payload.success == Some(false) {
                    if let Some(error) = &payload.error {
                        self.toasts.show(error.clone(), ToastKind::Error);
                    }
                }
                self.search.show(&payload);
            }
            Err(e) => {
                warn!(error = %e, "Search failed");
                self.toasts.show(e.user_message(), ToastKind::Error);
            }
        }
        Task::none()
    }
}
