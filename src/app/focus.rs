// SPDX-License-Identifier: GPL-3.0-only

//! Keyboard focus
//!
//! Every control on the page is a focus stop. Activating the focused
//! control with Enter or Space sends the same message as clicking it.

use crate::app::state::{Message, Page};
use crate::constants::layout;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Control {
    Nav(Page),
    ToggleCamera,
    SwitchCamera,
    Capture,
    UploadZone,
    CancelUpload,
    SubmitUpload,
    SearchInput,
    SearchButton,
    QuickSearch(&'static str),
    CloseModal,
}

impl Control {
    /// Message sent when the control is activated
    pub fn activate(&self) -> Message {
        match self {
            Control::Nav(page) => Message::Navigate(*page),
            Control::ToggleCamera => Message::ToggleCamera,
            Control::SwitchCamera => Message::SwitchCamera,
            Control::Capture => Message::Capture,
            Control::UploadZone => Message::UploadZoneClicked,
            Control::CancelUpload => Message::CancelUpload,
            Control::SubmitUpload => Message::SubmitUpload,
            Control::SearchInput => Message::FocusSearch,
            Control::SearchButton => Message::Search,
            Control::QuickSearch(name) => Message::QuickSearch(name.to_string()),
            Control::CloseModal => Message::CloseModal,
        }
    }

    /// Text input controls keep native key handling
    pub fn is_text_input(&self) -> bool {
        matches!(self, Control::SearchInput)
    }

    pub fn label(&self) -> String {
        match self {
            Control::Nav(page) => page.title().to_string(),
            Control::ToggleCamera => "Kamera".to_string(),
            Control::SwitchCamera => "Ganti Kamera".to_string(),
            Control::Capture => "Ambil Gambar".to_string(),
            Control::UploadZone => "Pilih Gambar".to_string(),
            Control::CancelUpload => "Batal".to_string(),
            Control::SubmitUpload => "Klasifikasi".to_string(),
            Control::SearchInput => "Cari bunga".to_string(),
            Control::SearchButton => "Cari".to_string(),
            Control::QuickSearch(name) => name.to_string(),
            Control::CloseModal => "Tutup".to_string(),
        }
    }
}

/// Controls present on a page, in tab order
pub fn page_controls(page: Page, modal_open: bool) -> Vec<Control> {
    if modal_open {
        return vec![Control::CloseModal];
    }
    let mut controls: Vec<Control> = Page::ALL.iter().copied().map(Control::Nav).collect();
    if page.has_classify() {
        controls.extend([
            Control::ToggleCamera,
            Control::SwitchCamera,
            Control::Capture,
            Control::UploadZone,
            Control::CancelUpload,
            Control::SubmitUpload,
        ]);
    }
    if page.has_search() {
        controls.extend([Control::SearchInput, Control::SearchButton]);
        controls.extend(layout::QUICK_SEARCHES.iter().copied().map(Control::QuickSearch));
    }
    controls
}

/// Tab ring over the current controls; nothing is focused initially
#[derive(Debug, Default)]
pub struct FocusRing {
    controls: Vec<Control>,
    index: Option<usize>,
}

impl FocusRing {
    /// Replace the control set, keeping focus on the same control if present
    pub fn set_controls(&mut self, controls: Vec<Control>) {
        let focused = self.focused().cloned();
        self.controls = controls;
        self.index = focused.and_then(|c| self.controls.iter().position(|x| *x == c));
    }

    pub fn focused(&self) -> Option<&Control> {
        self.index.and_then(|i| self.controls.get(i))
    }

    pub fn next(&mut self) {
        if self.controls.is_empty() {
            return;
        }
        self.index = Some(match self.index {
            Some(i) => (i + 1) % self.controls.len(),
            None => 0,
        });
    }

    pub fn prev(&mut self) {
        if self.controls.is_empty() {
            return;
        }
        let len = self.controls.len();
        self.index = Some(match self.index {
            Some(i) => (i + len - 1) % len,
            None => len - 1,
        });
    }

    /// Move focus to `control`; returns false if it is not on the page
    pub fn focus(&mut self, control: &Control) -> bool {
        match self.controls.iter().position(|c| c == control) {
            Some(i) => {
                self.index = Some(i);
                true
            }
            None => false,
        }
    }

    pub fn blur(&mut self) {
        self.index = None;
    }

    pub fn in_text_input(&self) -> bool {
        self.focused().is_some_and(Control::is_text_input)
    }
}
