// SPDX-License-Identifier: GPL-3.0-only

//! One-shot notice carried across a page change
//!
//! Written when leaving a page forces the camera off, read back (and
//! cleared) when the next page loads.

use crate::app::toast::ToastKind;
use crate::errors::AppResult;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingNotice {
    pub message: String,
    #[serde(rename = "type")]
    pub kind: ToastKind,
}

pub trait NoticeStore {
    /// Persist a notice, replacing any earlier one
    fn store(&mut self, notice: PendingNotice) -> AppResult<()>;

    /// Remove and return the stored notice
    fn take(&mut self) -> Option<PendingNotice>;
}

/// Keeps the notice in memory (single process, tests)
#[derive(Debug, Default)]
pub struct MemoryNoticeStore {
    slot: Option<PendingNotice>,
}

impl MemoryNoticeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NoticeStore for MemoryNoticeStore {
    fn store(&mut self, notice: PendingNotice) -> AppResult<()> {
        self.slot = Some(notice);
        Ok(())
    }

    fn take(&mut self) -> Option<PendingNotice> {
        self.slot.take()
    }
}

/// Keeps the notice as JSON in a file, so it survives a restart
pub struct FileNoticeStore {
    path: PathBuf,
}

impl FileNoticeStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// `$XDG_CACHE_HOME/petal/pending-notice.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::cache_dir().map(|dir| dir.join("petal").join("pending-notice.json"))
    }

    fn remove(&self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %self.path.display(), error = %e, "Failed to clear notice");
            }
        }
    }
}

impl NoticeStore for FileNoticeStore {
    fn store(&mut self, notice: PendingNotice) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string(&notice)
            .map_err(|e| crate::errors::AppError::Storage(e.to_string()))?;
        std::fs::write(&self.path, data)?;
        debug!(path = %self.path.display(), "Notice stored");
        Ok(())
    }

    fn take(&mut self) -> Option<PendingNotice> {
        let data = match std::fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(_) => return None,
        };
        // Cleared whether or not it parses
        self.remove();
        match serde_json::from_str(&data) {
            Ok(notice) => Some(notice),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Discarding corrupt notice");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera_off() -> PendingNotice {
        PendingNotice {
            message: "Kamera dimatikan".to_string(),
            kind: ToastKind::Warning,
        }
    }

    #[test]
    fn test_wire_shape() {
        let json = serde_json::to_value(camera_off()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"message": "Kamera dimatikan", "type": "warning"})
        );
    }

    #[test]
    fn test_file_store_takes_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileNoticeStore::new(dir.path().join("nested").join("notice.json"));
        store.store(camera_off()).unwrap();
        assert_eq!(store.take(), Some(camera_off()));
        assert_eq!(store.take(), None);
    }

    #[test]
    fn test_corrupt_notice_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notice.json");
        std::fs::write(&path, "{not json").unwrap();
        let mut store = FileNoticeStore::new(path.clone());
        assert_eq!(store.take(), None);
        assert!(!path.exists());
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryNoticeStore::new();
        assert_eq!(store.take(), None);
        store.store(camera_off()).unwrap();
        assert_eq!(store.take(), Some(camera_off()));
        assert_eq!(store.take(), None);
    }
}
