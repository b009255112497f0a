// SPDX-License-Identifier: GPL-3.0-only

//! Page lifecycle handlers
//!
//! Leaving a page tears down its surfaces; loading a page mounts the new
//! ones, resets the scroll position and shows any notice left behind by the
//! previous page.

use crate::app::focus::page_controls;
use crate::app::state::{AppModel, Message, Page};
use crate::app::task::Task;
use crate::app::workflow::RegionBounds;
use std::time::Instant;
use tracing::info;

impl AppModel {
    // =========================================================================
    // Navigation Handlers
    // =========================================================================

    pub(crate) fn handle_navigate(&mut self, page: Page) -> Task<Message> {
        info!(from = ?self.page, to = ?page, "Navigating");
        self.unload_page();
        self.page = page;
        self.load_page();
        Task::none()
    }

    fn unload_page(&mut self) {
        self.camera.leave_capture_region(self.notices.as_mut());
        self.presenter.close(&mut self.viewport);
        self.upload_zone.set_mounted(false);
        self.classify_pending = false;
        self.searches_pending = 0;
        self.sync_loading();
        self.page_epoch += 1;
    }

    /// Mount the surfaces of `self.page` and show the pending notice
    pub(crate) fn load_page(&mut self) {
        self.mounts = self.page.mounts();
        self.upload_zone.set_mounted(self.mounts.upload_zone);
        self.upload_zone.reset();
        self.presenter.set_mounted(self.mounts.modal);
        self.search.set_mounted(self.mounts.search);
        self.search.set_query("");
        self.toasts.set_mounted(self.mounts.toast);
        self.regions = RegionBounds {
            margin: self.config.region_margin,
            ..Default::default()
        };
        self.viewport.scroll_to_top();
        self.focus.blur();
        self.refresh_focus();

        if let Some(notice) = self.notices.take() {
            info!(message = %notice.message, "Showing notice from previous page");
            self.toasts.show(notice.message, notice.kind);
        }
    }

    /// Rebuild the tab ring for the current page and modal state
    pub(crate) fn refresh_focus(&mut self) {
        self.focus
            .set_controls(page_controls(self.page, self.presenter.is_open()));
    }

    /// The indicator stays up until every request of the page has answered
    pub(crate) fn sync_loading(&mut self) {
        self.loading = self.classify_pending || self.searches_pending > 0;
    }

    pub(crate) fn handle_scroll(&mut self, delta: i32) -> Task<Message> {
        self.viewport.scroll_by(delta);
        Task::none()
    }

    pub(crate) fn handle_tick(&mut self) -> Task<Message> {
        self.toasts.tick(Instant::now());
        Task::none()
    }

    /// Record region extents and page height from a layout pass
    pub fn set_layout(&mut self, regions: RegionBounds, content_height: u16, viewport_height: u16) {
        self.regions = RegionBounds {
            margin: self.config.region_margin,
            ..regions
        };
        self.viewport.set_geometry(content_height, viewport_height);
    }
}
