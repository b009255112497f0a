// SPDX-License-Identifier: GPL-3.0-only

//! Mode detection and keyboard dispatch
//!
//! Which region the user is looking at is derived from the scroll offset on
//! every key press, never stored. Space and Enter then act on that region:
//!
//! | Mode     | Condition          | Action                     |
//! |----------|--------------------|----------------------------|
//! | classify | camera live        | capture                    |
//! | classify | file selected      | submit upload              |
//! | classify | otherwise          | open the file picker       |
//! | search   | query not empty    | search                     |
//! | search   | query empty        | error toast, focus field   |
//! | none     |                    | left to the page (scroll)  |

use crate::app::focus::Control;
use crate::app::state::{AppModel, Message};
use crate::app::task::Task;
use crate::app::toast::ToastKind;
use crate::constants::messages;
use tracing::debug;

/// Region of the page the viewport is in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    Classify,
    Search,
    None,
}

/// Vertical extent of a page region, in content rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub top: u16,
    pub height: u16,
}

/// Regions present on the page plus the look-ahead margin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegionBounds {
    pub classify: Option<Region>,
    pub search: Option<Region>,
    pub margin: u16,
}

fn contains(region: Region, offset: i32, margin: i32) -> bool {
    let start = region.top as i32 - margin;
    offset >= start && offset < start + region.height as i32
}

/// Derive the mode from the scroll offset
///
/// With both regions on the page, classify spans from its own top to the
/// top of the search region (each shifted up by the margin), and search
/// spans its own height.
pub fn detect_mode(offset: u16, bounds: &RegionBounds) -> UiMode {
    let offset = offset as i32;
    let margin = bounds.margin as i32;
    match (bounds.classify, bounds.search) {
        (Some(classify), Some(search)) => {
            let classify_top = classify.top as i32 - margin;
            let search_top = search.top as i32 - margin;
            if offset >= classify_top && offset < search_top {
                UiMode::Classify
            } else if offset >= search_top && offset < search_top + search.height as i32 {
                UiMode::Search
            } else {
                UiMode::None
            }
        }
        (Some(classify), None) if contains(classify, offset, margin) => UiMode::Classify,
        (None, Some(search)) if contains(search, offset, margin) => UiMode::Search,
        _ => UiMode::None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Space,
    Escape,
    Backspace,
    Tab,
    BackTab,
    Char(char),
    Other,
}

/// What happened to a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDisposition {
    /// Consumed; default behaviour suppressed
    Handled,
    /// Not consumed; the front end applies its native behaviour
    /// (text editing, scrolling)
    Native,
}

impl AppModel {
    pub fn ui_mode(&self) -> UiMode {
        detect_mode(self.viewport.offset(), &self.regions)
    }

    /// Keyboard entry point
    pub fn handle_key(&mut self, key: Key) -> (KeyDisposition, Task<Message>) {
        if self.presenter.is_open() {
            return match key {
                Key::Escape | Key::Backspace => {
                    (KeyDisposition::Handled, self.update(Message::CloseModal))
                }
                // Nothing behind the modal may react
                Key::Enter | Key::Space => (KeyDisposition::Handled, Task::none()),
                _ => (KeyDisposition::Native, Task::none()),
            };
        }

        match key {
            Key::Tab => {
                self.focus.next();
                return (KeyDisposition::Handled, Task::none());
            }
            Key::BackTab => {
                self.focus.prev();
                return (KeyDisposition::Handled, Task::none());
            }
            Key::Enter | Key::Space => {}
            _ => return (KeyDisposition::Native, Task::none()),
        }

        if self.focus.in_text_input() {
            if key == Key::Enter {
                return (KeyDisposition::Handled, self.update(Message::Search));
            }
            return (KeyDisposition::Native, Task::none());
        }

        if let Some(control) = self.focus.focused().cloned() {
            debug!(?control, "Keyboard activation");
            return (KeyDisposition::Handled, self.update(control.activate()));
        }

        match self.ui_mode() {
            UiMode::Classify => (KeyDisposition::Handled, self.dispatch_classify()),
            UiMode::Search => (KeyDisposition::Handled, self.dispatch_search()),
            UiMode::None => (KeyDisposition::Native, Task::none()),
        }
    }

    fn dispatch_classify(&mut self) -> Task<Message> {
        if self.camera.is_active() {
            debug!("Keyboard capture");
            let task = self.update(Message::Capture);
            if !task.is_none() {
                self.toasts.show(messages::KEYBOARD_CAPTURE, ToastKind::Info);
            }
            return task;
        }
        if self.upload_zone.selected().is_some() {
            debug!("Keyboard upload");
            let task = self.update(Message::SubmitUpload);
            if !task.is_none() {
                self.toasts.show(messages::KEYBOARD_UPLOAD, ToastKind::Info);
            }
            return task;
        }
        self.update(Message::UploadZoneClicked)
    }

    fn dispatch_search(&mut self) -> Task<Message> {
        if self.search.query().trim().is_empty() {
            self.toasts.show(messages::EMPTY_QUERY, ToastKind::Error);
            self.focus.focus(&Control::SearchInput);
            return Task::none();
        }
        let task = self.update(Message::Search);
        if !task.is_none() {
            self.toasts.show(messages::KEYBOARD_SEARCH, ToastKind::Info);
        }
        task
    }
}
