// SPDX-License-Identifier: GPL-3.0-only

use crate::backends::camera::FacingMode;
use crate::constants::{capture, endpoints, layout, limits, thresholds, timing};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Thresholds the result modal reports against
///
/// Camera and upload confidence minimums are separate settings even though
/// the service currently uses the same value for both.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub camera_min_confidence: f64,
    pub upload_min_confidence: f64,
    pub min_brightness: f64,
    pub max_brightness: f64,
    pub min_focus_score: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            camera_min_confidence: thresholds::CAMERA_MIN_CONFIDENCE,
            upload_min_confidence: thresholds::UPLOAD_MIN_CONFIDENCE,
            min_brightness: thresholds::MIN_BRIGHTNESS,
            max_brightness: thresholds::MAX_BRIGHTNESS,
            min_focus_score: thresholds::MIN_FOCUS_SCORE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the classifier service
    pub server_url: String,
    /// Upload size cap in bytes
    pub max_upload_bytes: u64,
    /// Result rendering thresholds
    pub thresholds: Thresholds,
    /// Camera used when the camera is first turned on
    pub facing_mode: FacingMode,
    /// JPEG quality for captured frames (0-100)
    pub jpeg_quality: u8,
    /// Toast visibility in milliseconds
    pub toast_duration_ms: u64,
    /// Settle delay around a facing switch in milliseconds
    pub switch_settle_ms: u64,
    /// Look-ahead rows for region detection
    pub region_margin: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: endpoints::DEFAULT_SERVER_URL.to_string(),
            max_upload_bytes: limits::MAX_UPLOAD_BYTES,
            thresholds: Thresholds::default(),
            facing_mode: FacingMode::default(),
            jpeg_quality: capture::JPEG_QUALITY,
            toast_duration_ms: timing::TOAST_DURATION.as_millis() as u64,
            switch_settle_ms: timing::SWITCH_SETTLE_DELAY.as_millis() as u64,
            region_margin: layout::REGION_MARGIN,
        }
    }
}

impl Config {
    /// Default location: `$XDG_CONFIG_HOME/petal/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("petal").join("config.json"))
    }

    /// Load the configuration, falling back to defaults
    ///
    /// A missing file is normal; a malformed one is logged and ignored.
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            debug!("No config directory available, using defaults");
            return Self::default();
        };
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => {
                info!(path = %path.display(), "Loaded configuration");
                config
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to load config, using defaults");
                Self::default()
            }
        }
    }

    /// Load the configuration from an explicit path
    pub fn load_from(path: &Path) -> AppResult<Self> {
        let data = std::fs::read_to_string(path)?;
        serde_json::from_str(&data).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Write the configuration as pretty JSON, creating parent directories
    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let data =
            serde_json::to_string_pretty(self).map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(path, data)?;
        Ok(())
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }

    pub fn switch_settle_delay(&self) -> Duration {
        Duration::from_millis(self.switch_settle_ms)
    }

    /// Full URL of an endpoint path such as `/upload`
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.server_url.trim_end_matches('/'), path)
    }
}
