// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use std::time::Duration;

/// Upload limits
pub mod limits {
    /// Maximum accepted upload size (10 MiB)
    pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

    /// Media type prefix every accepted file must declare
    pub const IMAGE_MEDIA_PREFIX: &str = "image/";
}

/// Image quality and confidence thresholds used when rendering results
pub mod thresholds {
    /// Minimum confidence the service requires for camera captures
    pub const CAMERA_MIN_CONFIDENCE: f64 = 0.75;

    /// Minimum confidence the service requires for uploads
    pub const UPLOAD_MIN_CONFIDENCE: f64 = 0.75;

    /// Lowest acceptable mean brightness (0-255)
    pub const MIN_BRIGHTNESS: f64 = 15.0;

    /// Highest acceptable mean brightness (0-255)
    pub const MAX_BRIGHTNESS: f64 = 250.0;

    /// Lowest acceptable focus (Laplacian variance) score
    pub const MIN_FOCUS_SCORE: f64 = 15.0;
}

/// Capture encoding
pub mod capture {
    /// JPEG quality for captured frames (0-100)
    pub const JPEG_QUALITY: u8 = 95;

    /// Media type of captured frames
    pub const MEDIA_TYPE: &str = "image/jpeg";
}

/// Timing constants
pub mod timing {
    use super::Duration;

    /// How long a toast stays visible
    pub const TOAST_DURATION: Duration = Duration::from_millis(2000);

    /// Delay between stopping and restarting the camera on a facing switch
    pub const SWITCH_SETTLE_DELAY: Duration = Duration::from_millis(100);

    /// Event poll interval of the terminal loop (~60 fps)
    pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

    /// Warm-up before the headless capture takes its frame
    pub const CAPTURE_WARMUP: Duration = Duration::from_millis(500);

    /// Give up waiting for a first frame after this long
    pub const CAPTURE_TIMEOUT: Duration = Duration::from_secs(5);

    /// GStreamer state change timeout on start
    pub const START_TIMEOUT_SECS: u64 = 5;

    /// GStreamer state change timeout on stop
    pub const STOP_TIMEOUT_SECS: u64 = 2;
}

/// Network endpoints (relative to the configured server URL)
pub mod endpoints {
    pub const UPLOAD: &str = "/upload";
    pub const CAPTURE: &str = "/capture";
    pub const SEARCH: &str = "/api/search";

    /// Multipart field carrying the uploaded file
    pub const UPLOAD_FIELD: &str = "file";

    /// Default classifier address
    pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";
}

/// Layout constants for the terminal front end
pub mod layout {
    /// Rows of look-ahead when deciding which region the page is in
    pub const REGION_MARGIN: u16 = 3;

    /// Lines moved by PageUp/PageDown
    pub const PAGE_SCROLL: u16 = 10;

    /// Popular flowers offered as quick-search chips
    pub const QUICK_SEARCHES: &[&str] = &["Mawar", "Melati", "Anggrek", "Tulip", "Matahari"];
}

/// User-facing strings
pub mod messages {
    pub const CAMERA_OFF: &str = "Kamera dimatikan";
    pub const CAMERA_ON: &str = "Kamera berhasil diaktifkan";
    pub const CAMERA_FAILED_PREFIX: &str = "Gagal mengakses kamera: ";
    pub const CAMERA_NOT_READY: &str =
        "Kamera belum siap. Pastikan kamera aktif sebelum menangkap gambar.";
    pub const SELECT_IMAGE_FIRST: &str = "Silakan pilih gambar terlebih dahulu";
    pub const NOT_AN_IMAGE: &str = "Silakan pilih file gambar";
    pub const EMPTY_QUERY: &str = "Masukkan kata kunci pencarian";
    pub const REQUEST_IN_FLIGHT: &str = "Permintaan sedang diproses";
    pub const CLASSIFY_OK: &str = "Klasifikasi berhasil!";
    pub const CLASSIFY_FAILED: &str = "Gagal mengklasifikasi gambar";
    pub const NOT_A_FLOWER: &str = "Gambar tidak terdeteksi sebagai bunga";
    pub const GENERIC_ERROR_PREFIX: &str = "Terjadi kesalahan: ";
    pub const PROCESSING_FAILED: &str = "Terjadi kesalahan saat memproses gambar.";
    pub const KEYBOARD_CAPTURE: &str = "Gambar diambil (Keyboard)";
    pub const KEYBOARD_UPLOAD: &str = "Mengunggah gambar (Keyboard)";
    pub const KEYBOARD_SEARCH: &str = "Mencari... (Keyboard)";
}

/// Format a byte count as mebibytes with two decimals (e.g. "2.00 MB")
pub fn format_mib(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / 1024.0 / 1024.0)
}

/// Format a 0-1 confidence as a rounded integer percentage
pub fn confidence_percent(confidence: f64) -> u8 {
    (confidence * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Format a 0-1 threshold for display (e.g. "75%")
pub fn format_threshold(threshold: f64) -> String {
    format!("{}%", confidence_percent(threshold))
}
