// SPDX-License-Identifier: GPL-3.0-only

//! Upload zone: picker, drop target, preview and reset lifecycle
//!
//! The zone listens on three bindings: `click` (opens the picker),
//! `file_change` (picker result) and `drop`. While a preview is shown only
//! `file_change` stays attached; the cancel control is the way back.

use crate::constants::{format_mib, limits};
use crate::errors::ValidationError;
use crate::media::{self, Thumbnail};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Longest side of the preview thumbnail in pixels
const THUMBNAIL_SIZE: u32 = 96;

/// A file as delivered by the picker or a drop, before validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
    pub thumbnail: Option<Thumbnail>,
}

impl SelectedFile {
    /// Read a file from disk, declaring its media type from the extension
    ///
    /// The thumbnail is decoded here (callers run this off the UI thread) and
    /// only for files that declare an image type.
    pub async fn read(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let media_type = media::media_type_for_path(path).to_string();
        debug!(path = %path.display(), %media_type, size = bytes.len(), "File read");

        let (bytes, thumbnail) = if media_type.starts_with(limits::IMAGE_MEDIA_PREFIX) {
            tokio::task::spawn_blocking(move || {
                let thumbnail = Thumbnail::from_bytes(&bytes, THUMBNAIL_SIZE, THUMBNAIL_SIZE);
                (bytes, thumbnail)
            })
            .await
            .map_err(std::io::Error::other)?
        } else {
            (bytes, None)
        };

        Ok(Self {
            name,
            media_type,
            bytes,
            thumbnail,
        })
    }
}

/// The file a submission will send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingUpload {
    pub name: String,
    pub media_type: String,
    pub bytes: Arc<[u8]>,
}

impl PendingUpload {
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub file: PendingUpload,
    /// e.g. "2.00 MB"
    pub size_label: String,
    pub thumbnail: Option<Thumbnail>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ZoneState {
    /// Drop target waiting for a file
    #[default]
    Empty,
    Preview(Preview),
}

/// Attached event bindings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bindings {
    pub click: bool,
    pub file_change: bool,
    pub drop: bool,
}

impl Bindings {
    fn all() -> Self {
        Self {
            click: true,
            file_change: true,
            drop: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    Enter,
    Over,
    Leave,
    Drop,
}

/// How a file reached the zone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Picker,
    Drop,
}

pub struct UploadZoneController {
    state: ZoneState,
    bindings: Bindings,
    bound: bool,
    drag_active: bool,
    max_bytes: u64,
    mounted: bool,
}

impl UploadZoneController {
    pub fn new(max_bytes: u64) -> Self {
        Self {
            state: ZoneState::Empty,
            bindings: Bindings::default(),
            bound: false,
            drag_active: false,
            max_bytes,
            mounted: true,
        }
    }

    /// Attach or detach the zone's surface; unmounting tears the zone down
    pub fn set_mounted(&mut self, mounted: bool) {
        self.mounted = mounted;
        if !mounted {
            self.teardown();
        }
    }

    /// Attach all bindings; returns false if already initialised or unmounted
    pub fn initialize(&mut self) -> bool {
        if self.bound || !self.mounted {
            return false;
        }
        self.bindings = Bindings::all();
        if matches!(self.state, ZoneState::Preview(_)) {
            self.bindings.click = false;
            self.bindings.drop = false;
        }
        self.bound = true;
        debug!("Upload zone initialised");
        true
    }

    /// Detach every binding
    pub fn teardown(&mut self) {
        self.bindings = Bindings::default();
        self.bound = false;
        self.drag_active = false;
    }

    /// Clear the selection, then start over
    pub fn reset(&mut self) {
        self.state = ZoneState::Empty;
        self.teardown();
        self.initialize();
        debug!("Upload zone reset");
    }

    /// Click on the zone; true when the picker should open
    pub fn click(&self) -> bool {
        self.bindings.click
    }

    /// Drag feedback; the default file-open action is always suppressed
    pub fn drag(&mut self, phase: DragPhase) -> bool {
        self.drag_active = matches!(phase, DragPhase::Enter | DragPhase::Over)
            && self.bindings.drop;
        true
    }

    /// Accept a file from the picker or a drop
    ///
    /// Returns `Ok(false)` when the binding for `source` is detached. Invalid
    /// files are rejected and the current state is left as it was.
    pub fn select(&mut self, file: SelectedFile, source: Source) -> Result<bool, ValidationError> {
        if source == Source::Drop {
            self.drag_active = false;
        }
        let attached = match source {
            Source::Picker => self.bindings.file_change,
            Source::Drop => self.bindings.drop,
        };
        if !attached {
            debug!(?source, "Selection ignored, binding detached");
            return Ok(false);
        }

        validate(&file.media_type, file.bytes.len() as u64, self.max_bytes)?;

        let size = file.bytes.len() as u64;
        info!(name = %file.name, size, ?source, "File selected");
        self.state = ZoneState::Preview(Preview {
            file: PendingUpload {
                name: file.name,
                media_type: file.media_type,
                bytes: Arc::from(file.bytes),
            },
            size_label: format_mib(size),
            thumbnail: file.thumbnail,
        });
        self.bindings.click = false;
        self.bindings.drop = false;
        Ok(true)
    }

    pub fn selected(&self) -> Option<&PendingUpload> {
        match &self.state {
            ZoneState::Preview(preview) => Some(&preview.file),
            ZoneState::Empty => None,
        }
    }

    pub fn state(&self) -> &ZoneState {
        &self.state
    }

    pub fn bindings(&self) -> Bindings {
        self.bindings
    }

    pub fn is_bound(&self) -> bool {
        self.bound
    }

    pub fn is_drag_active(&self) -> bool {
        self.drag_active
    }
}

/// Media type and size checks shared by selection and submission
pub fn validate(media_type: &str, size: u64, max_bytes: u64) -> Result<(), ValidationError> {
    if !media_type.starts_with(limits::IMAGE_MEDIA_PREFIX) {
        return Err(ValidationError::NotAnImage {
            media_type: media_type.to_string(),
        });
    }
    if size > max_bytes {
        return Err(ValidationError::FileTooLarge {
            size,
            limit: max_bytes,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jpeg(size: usize) -> SelectedFile {
        SelectedFile {
            name: "mawar.jpg".to_string(),
            media_type: "image/jpeg".to_string(),
            bytes: vec![0; size],
            thumbnail: None,
        }
    }

    fn zone() -> UploadZoneController {
        let mut zone = UploadZoneController::new(limits::MAX_UPLOAD_BYTES);
        zone.initialize();
        zone
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let mut zone = zone();
        assert!(zone.is_bound());
        assert!(!zone.initialize());
        assert_eq!(zone.bindings(), Bindings::all());
    }

    #[test]
    fn test_preview_detaches_click_and_drop() {
        let mut zone = zone();
        assert!(zone.select(jpeg(2 * 1024 * 1024), Source::Drop).unwrap());
        match zone.state() {
            ZoneState::Preview(p) => {
                assert_eq!(p.file.name, "mawar.jpg");
                assert_eq!(p.size_label, "2.00 MB");
            }
            ZoneState::Empty => panic!("expected preview"),
        }
        assert!(!zone.click());
        let b = zone.bindings();
        assert!(!b.click && !b.drop && b.file_change);

        // A second drop is ignored while the preview is shown
        assert!(!zone.select(jpeg(10), Source::Drop).unwrap());
        assert_eq!(zone.selected().unwrap().size(), 2 * 1024 * 1024);
    }

    #[test]
    fn test_invalid_selection_keeps_state() {
        let mut zone = zone();
        zone.select(jpeg(100), Source::Picker).unwrap();

        let text = SelectedFile {
            name: "catatan.txt".to_string(),
            media_type: "text/plain".to_string(),
            bytes: vec![1; 4],
            thumbnail: None,
        };
        assert!(matches!(
            zone.select(text, Source::Picker),
            Err(ValidationError::NotAnImage { .. })
        ));
        assert_eq!(
            zone.select(jpeg(limits::MAX_UPLOAD_BYTES as usize + 1), Source::Picker),
            Err(ValidationError::FileTooLarge {
                size: limits::MAX_UPLOAD_BYTES + 1,
                limit: limits::MAX_UPLOAD_BYTES
            })
        );
        assert_eq!(zone.selected().unwrap().size(), 100);
    }

    #[test]
    fn test_exactly_at_cap_is_accepted() {
        let mut zone = zone();
        assert!(zone
            .select(jpeg(limits::MAX_UPLOAD_BYTES as usize), Source::Picker)
            .unwrap());
    }

    #[test]
    fn test_reset_restores_empty_zone() {
        let mut zone = zone();
        zone.select(jpeg(100), Source::Picker).unwrap();
        zone.reset();
        assert_eq!(zone.state(), &ZoneState::Empty);
        assert!(zone.is_bound());
        assert_eq!(zone.bindings(), Bindings::all());
    }

    #[test]
    fn test_drag_feedback() {
        let mut zone = zone();
        assert!(zone.drag(DragPhase::Enter));
        assert!(zone.is_drag_active());
        assert!(zone.drag(DragPhase::Over));
        assert!(zone.is_drag_active());
        assert!(zone.drag(DragPhase::Leave));
        assert!(!zone.is_drag_active());
        zone.drag(DragPhase::Over);
        assert!(zone.drag(DragPhase::Drop));
        assert!(!zone.is_drag_active());
    }

    #[test]
    fn test_unmounted_zone_never_binds() {
        let mut zone = UploadZoneController::new(limits::MAX_UPLOAD_BYTES);
        zone.set_mounted(false);
        assert!(!zone.initialize());
        assert!(!zone.select(jpeg(10), Source::Picker).unwrap());
    }
}
