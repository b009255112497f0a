// SPDX-License-Identifier: GPL-3.0-only

//! Page scroll state and the modal scroll freeze

use tracing::debug;

/// Vertical scroll state of the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollViewport {
    offset: u16,
    content_height: u16,
    viewport_height: u16,
    locked: bool,
}

impl ScrollViewport {
    pub fn offset(&self) -> u16 {
        self.offset
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn content_height(&self) -> u16 {
        self.content_height
    }

    pub fn max_offset(&self) -> u16 {
        self.content_height.saturating_sub(self.viewport_height)
    }

    /// Update page geometry after a layout pass
    ///
    /// While locked the offset is left alone even if it no longer fits.
    pub fn set_geometry(&mut self, content_height: u16, viewport_height: u16) {
        self.content_height = content_height;
        self.viewport_height = viewport_height;
        if !self.locked {
            self.offset = self.offset.min(self.max_offset());
        }
    }

    /// Scroll by `delta` rows; ignored while locked
    pub fn scroll_by(&mut self, delta: i32) {
        if self.locked {
            return;
        }
        let target = (self.offset as i32 + delta).clamp(0, self.max_offset() as i32);
        self.offset = target as u16;
    }

    /// Scroll so that `offset` is at the top; ignored while locked
    pub fn scroll_to(&mut self, offset: u16) {
        if self.locked {
            return;
        }
        self.offset = offset.min(self.max_offset());
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll_to(0);
    }
}

/// Freezes the page while the result modal is open
///
/// `acquire` snapshots the offset and locks the viewport; `release` unlocks
/// and puts back exactly the snapshotted offset, whatever happened to the
/// page height in between.
#[derive(Debug, Default)]
pub struct ModalScrollLock {
    saved: Option<u16>,
}

impl ModalScrollLock {
    /// Lock the viewport; a second acquire keeps the first snapshot
    pub fn acquire(&mut self, viewport: &mut ScrollViewport) {
        if self.saved.is_some() {
            return;
        }
        self.saved = Some(viewport.offset);
        viewport.locked = true;
        debug!(offset = viewport.offset, "Scroll locked");
    }

    /// Unlock and restore; returns the restored offset
    pub fn release(&mut self, viewport: &mut ScrollViewport) -> Option<u16> {
        let saved = self.saved.take()?;
        viewport.locked = false;
        viewport.offset = saved;
        debug!(offset = saved, "Scroll restored");
        Some(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport(offset: u16) -> ScrollViewport {
        let mut v = ScrollViewport::default();
        v.set_geometry(200, 40);
        v.scroll_to(offset);
        v
    }

    #[test]
    fn test_scroll_clamps() {
        let mut v = viewport(0);
        v.scroll_by(-5);
        assert_eq!(v.offset(), 0);
        v.scroll_by(500);
        assert_eq!(v.offset(), 160);
    }

    #[test]
    fn test_locked_viewport_ignores_scrolling() {
        let mut v = viewport(70);
        let mut lock = ModalScrollLock::default();
        lock.acquire(&mut v);
        v.scroll_by(10);
        v.scroll_to(0);
        assert_eq!(v.offset(), 70);
    }

    #[test]
    fn test_restore_survives_height_change() {
        let mut v = viewport(120);
        let mut lock = ModalScrollLock::default();
        lock.acquire(&mut v);
        // Rendering the result shrinks the page below the saved offset
        v.set_geometry(100, 40);
        v.set_geometry(260, 40);
        assert_eq!(lock.release(&mut v), Some(120));
        assert_eq!(v.offset(), 120);
        assert!(!v.is_locked());
    }

    #[test]
    fn test_double_acquire_keeps_first_snapshot() {
        let mut v = viewport(30);
        let mut lock = ModalScrollLock::default();
        lock.acquire(&mut v);
        lock.acquire(&mut v);
        assert_eq!(lock.release(&mut v), Some(30));
        assert_eq!(lock.release(&mut v), None);
    }
}
