// SPDX-License-Identifier: GPL-3.0-only

//! Application state management

use crate::app::camera::{CameraController, CameraGrant, SwitchTicket};
use crate::app::focus::FocusRing;
use crate::app::notice::NoticeStore;
use crate::app::result_presenter::ResultPresenter;
use crate::app::scroll_lock::ScrollViewport;
use crate::app::search::SearchState;
use crate::app::toast::ToastNotifier;
use crate::app::upload_zone::{DragPhase, SelectedFile, UploadZoneController};
use crate::app::workflow::RegionBounds;
use crate::classifier::{ClassificationClient, ClassifyPayload, RequestKind, SearchClient, SearchPayload};
use crate::config::Config;
use crate::errors::ClientError;
use std::path::PathBuf;

/// Pages of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Page {
    /// Landing page with both the classify and search regions
    #[default]
    Home,
    /// Standalone classify page
    Classify,
    /// Standalone search page
    Search,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::Home, Page::Classify, Page::Search];

    pub fn title(&self) -> &'static str {
        match self {
            Page::Home => "Beranda",
            Page::Classify => "Klasifikasi",
            Page::Search => "Pencarian",
        }
    }

    /// Page carries the upload zone and the camera
    pub fn has_classify(&self) -> bool {
        matches!(self, Page::Home | Page::Classify)
    }

    pub fn has_search(&self) -> bool {
        matches!(self, Page::Home | Page::Search)
    }

    pub fn mounts(&self) -> Mounts {
        Mounts {
            upload_zone: self.has_classify(),
            camera: self.has_classify(),
            modal: self.has_classify(),
            search: self.has_search(),
            toast: true,
            loading: true,
        }
    }
}

/// Surfaces present on the current page
///
/// Rendering into a surface that is absent does nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mounts {
    pub upload_zone: bool,
    pub camera: bool,
    pub modal: bool,
    pub search: bool,
    pub toast: bool,
    pub loading: bool,
}

/// Messages that drive the application
#[derive(Debug)]
pub enum Message {
    // ===== Navigation =====
    /// Go to a page (tears down the current one)
    Navigate(Page),
    /// Scroll the page by a number of rows
    Scroll(i32),

    // ===== Camera =====
    ToggleCamera,
    /// Hardware open finished
    CameraGranted(CameraGrant),
    SwitchCamera,
    /// Settle delay after a switch elapsed
    SwitchSettled(SwitchTicket),
    Capture,

    // ===== Upload Zone =====
    UploadZoneClicked,
    /// Picker closed, with the chosen path if any
    FilePicked {
        epoch: u64,
        path: Option<PathBuf>,
    },
    /// A path dropped onto the zone (bracketed paste in the terminal)
    FileDropped(PathBuf),
    FileLoaded {
        epoch: u64,
        dropped: bool,
        result: Result<SelectedFile, String>,
    },
    Drag(DragPhase),
    CancelUpload,
    SubmitUpload,

    // ===== Classification =====
    ClassificationFinished {
        epoch: u64,
        kind: RequestKind,
        result: Result<ClassifyPayload, ClientError>,
    },
    CloseModal,

    // ===== Search =====
    FocusSearch,
    SearchInput(String),
    Search,
    QuickSearch(String),
    SearchFinished {
        epoch: u64,
        result: Result<SearchPayload, ClientError>,
    },

    // ===== System =====
    /// Frame tick from the front end
    Tick,
    Noop,
}

/// Main application state
pub struct AppModel {
    /// Configuration loaded at startup
    pub config: Config,
    /// Current page
    pub page: Page,
    /// Surfaces of the current page
    pub mounts: Mounts,
    /// Bumped on every navigation; results for an older epoch are dropped
    pub(crate) page_epoch: u64,
    /// Exclusive owner of the camera hardware
    pub camera: CameraController,
    pub upload_zone: UploadZoneController,
    pub classifier: ClassificationClient,
    pub search_client: SearchClient,
    pub presenter: ResultPresenter,
    pub toasts: ToastNotifier,
    pub viewport: ScrollViewport,
    pub search: SearchState,
    pub focus: FocusRing,
    /// Region extents from the last layout pass
    pub regions: RegionBounds,
    /// Loading overlay visible while any request of this page is outstanding
    pub loading: bool,
    /// Classification sent from this page and not yet answered
    pub(crate) classify_pending: bool,
    /// Searches sent from this page and not yet answered
    pub(crate) searches_pending: usize,
    /// File picker currently open
    pub picker_open: bool,
    pub(crate) notices: Box<dyn NoticeStore>,
}
