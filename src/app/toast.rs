// SPDX-License-Identifier: GPL-3.0-only

//! Transient status line
//!
//! One toast is visible at a time; showing a new one replaces it. A toast
//! disappears once its duration has elapsed (checked on every tick).

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::debug;

/// Number of recently shown toasts kept for inspection
const HISTORY_LEN: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub shown_at: Instant,
}

pub struct ToastNotifier {
    current: Option<Toast>,
    history: Vec<(String, ToastKind)>,
    duration: Duration,
    mounted: bool,
}

impl ToastNotifier {
    pub fn new(duration: Duration) -> Self {
        Self {
            current: None,
            history: Vec::new(),
            duration,
            mounted: true,
        }
    }

    /// Attach or detach the toast surface; without it `show` does nothing
    pub fn set_mounted(&mut self, mounted: bool) {
        self.mounted = mounted;
        if !mounted {
            self.current = None;
        }
    }

    pub fn show(&mut self, message: impl Into<String>, kind: ToastKind) {
        if !self.mounted {
            return;
        }
        let message = message.into();
        debug!(?kind, %message, "Toast");
        if self.history.len() == HISTORY_LEN {
            self.history.remove(0);
        }
        self.history.push((message.clone(), kind));
        self.current = Some(Toast {
            message,
            kind,
            shown_at: Instant::now(),
        });
    }

    /// Hide the toast once its duration has passed
    pub fn tick(&mut self, now: Instant) {
        if self
            .current
            .as_ref()
            .is_some_and(|t| now.saturating_duration_since(t.shown_at) >= self.duration)
        {
            self.current = None;
        }
    }

    pub fn current(&self) -> Option<&Toast> {
        self.current.as_ref()
    }

    /// Toasts shown since creation, oldest first
    pub fn history(&self) -> &[(String, ToastKind)] {
        &self.history
    }

    /// Whether any toast of `kind` was shown
    pub fn has_shown(&self, kind: ToastKind) -> bool {
        self.history.iter().any(|(_, k)| *k == kind)
    }
}
