// SPDX-License-Identifier: GPL-3.0-only

//! Main application module for Petal
//!
//! This module contains the application state, message handling and the
//! workflow that ties camera, upload, classification and search together.
//! Rendering lives in `crate::terminal`.
//!
//! # Architecture
//!
//! - `state`: Application state types (AppModel, Message, Page, Mounts)
//! - `camera`: Camera session lifecycle
//! - `upload_zone`: Upload zone lifecycle and validation
//! - `result_presenter`: Result modal view model
//! - `scroll_lock`: Page scroll state and modal scroll freeze
//! - `search`: Search field and results panel
//! - `toast`: Transient notifications
//! - `notice`: Notice carried across a page change
//! - `focus`: Keyboard focus ring
//! - `workflow`: Mode detection and keyboard dispatch
//! - `update`: Message handling
//!
//! # Main Types
//!
//! - `AppModel`: Main application state
//! - `Message`: All possible user interactions and system events
//! - `Task`: Deferred work returned from `update`

pub mod camera;
pub mod focus;
mod handlers;
pub mod notice;
pub mod result_presenter;
pub mod scroll_lock;
pub mod search;
mod state;
pub mod task;
pub mod toast;
mod update;
pub mod upload_zone;
pub mod workflow;

use crate::app::camera::CameraController;
use crate::app::focus::FocusRing;
use crate::app::notice::NoticeStore;
use crate::app::result_presenter::ResultPresenter;
use crate::app::scroll_lock::ScrollViewport;
use crate::app::search::SearchState;
use crate::app::toast::ToastNotifier;
use crate::app::upload_zone::UploadZoneController;
use crate::app::workflow::RegionBounds;
use crate::backends::camera::CameraBackend;
use crate::classifier::{ClassificationClient, SearchClient, Transport};
use crate::config::Config;
use futures::StreamExt;
use futures::stream::FuturesUnordered;
pub use state::{AppModel, Message, Mounts, Page};
use std::sync::Arc;
pub use task::Task;
use tracing::info;
pub use workflow::{Key, KeyDisposition, UiMode};

impl AppModel {
    /// Build the application and load the first page
    pub fn new(
        config: Config,
        backend: Arc<dyn CameraBackend>,
        transport: Arc<dyn Transport>,
        notices: Box<dyn NoticeStore>,
        page: Page,
    ) -> (Self, Task<Message>) {
        info!(
            backend = backend.name(),
            server = %config.server_url,
            ?page,
            "Initializing application"
        );

        let camera = CameraController::new(
            backend,
            config.facing_mode,
            config.jpeg_quality,
            config.switch_settle_delay(),
        );
        let classifier = ClassificationClient::new(Arc::clone(&transport), &config);
        let search_client = SearchClient::new(transport, &config);

        let mut app = AppModel {
            page,
            mounts: page.mounts(),
            page_epoch: 0,
            camera,
            upload_zone: UploadZoneController::new(config.max_upload_bytes),
            classifier,
            search_client,
            presenter: ResultPresenter::new(config.thresholds),
            toasts: ToastNotifier::new(config.toast_duration()),
            viewport: ScrollViewport::default(),
            search: SearchState::new(),
            focus: FocusRing::default(),
            regions: RegionBounds::default(),
            loading: false,
            classify_pending: false,
            searches_pending: 0,
            picker_open: false,
            notices,
            config,
        };
        app.load_page();
        (app, Task::none())
    }

    /// Run `task` and everything it leads to until no work is left
    ///
    /// Used by the headless commands and tests; the terminal loop polls
    /// tasks itself so it can interleave input.
    pub async fn run_until_idle(&mut self, task: Task<Message>) {
        let mut pending: FuturesUnordered<_> = task.into_futures().into_iter().collect();
        while let Some(message) = pending.next().await {
            let next = self.update(message);
            pending.extend(next.into_futures());
        }
    }
}
