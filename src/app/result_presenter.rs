// SPDX-License-Identifier: GPL-3.0-only

//! Result modal
//!
//! [`ModalView`] is a render model built from a [`ClassificationOutcome`];
//! the terminal front end draws it and the headless commands print it with
//! [`ModalView::to_plain_text`].

use crate::app::scroll_lock::{ModalScrollLock, ScrollViewport};
use crate::app::toast::{ToastKind, ToastNotifier};
use crate::classifier::{
    ClassificationOutcome, FailureOutcome, LowConfidenceOutcome, QualityInfo, RequestKind,
    SuccessOutcome,
};
use crate::config::Thresholds;
use crate::constants::{confidence_percent, format_threshold, messages};
use std::fmt::Write;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalStatus {
    Success,
    Warning,
    Error,
}

/// Colouring of a quality readout against its threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadoutLevel {
    Acceptable,
    /// Out of range on an otherwise successful result
    Marginal,
    /// Out of range or missing on a low-confidence result
    Poor,
    /// Informational, no threshold
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualityReadout {
    pub label: String,
    pub value: String,
    pub level: ReadoutLevel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfidenceBar {
    pub label: String,
    pub percent: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub heading: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalView {
    pub status: ModalStatus,
    pub title: String,
    pub subtitle: Option<String>,
    /// Classified image as a data URI
    pub image: Option<String>,
    pub confidence: Option<ConfidenceBar>,
    /// Highlighted explanation (warning and error renderings)
    pub notice: Option<Section>,
    /// Best guess on a low-confidence result
    pub prediction: Option<Section>,
    pub readouts: Vec<QualityReadout>,
    pub sections: Vec<Section>,
}

impl ModalView {
    pub fn build(outcome: &ClassificationOutcome, thresholds: &Thresholds) -> Self {
        match outcome {
            ClassificationOutcome::Success(s) => success_view(s, thresholds),
            ClassificationOutcome::LowConfidence(l) => low_confidence_view(l, thresholds),
            ClassificationOutcome::Failure(f) => failure_view(f),
        }
    }

    /// Same content as the modal, as plain text
    pub fn to_plain_text(&self) -> String {
        let mut out = String::new();
        let marker = match self.status {
            ModalStatus::Success => "[OK]",
            ModalStatus::Warning => "[!]",
            ModalStatus::Error => "[X]",
        };
        let _ = writeln!(out, "{} {}", marker, self.title);
        if let Some(subtitle) = &self.subtitle {
            let _ = writeln!(out, "    {}", subtitle);
        }
        if let Some(bar) = &self.confidence {
            let filled = bar.percent as usize / 5;
            let _ = writeln!(
                out,
                "\n{}\n[{}{}] {}%",
                bar.label,
                "#".repeat(filled),
                "-".repeat(20 - filled),
                bar.percent
            );
        }
        for section in self.notice.iter().chain(self.prediction.iter()) {
            let _ = writeln!(out, "\n{}\n  {}", section.heading, section.body);
        }
        if !self.readouts.is_empty() {
            out.push('\n');
            for readout in &self.readouts {
                let _ = writeln!(out, "  {}: {}", readout.label, readout.value);
            }
        }
        for section in &self.sections {
            let _ = writeln!(out, "\n{}\n  {}", section.heading, section.body);
        }
        out
    }
}

fn mode_word(mode: RequestKind) -> &'static str {
    if mode.is_camera() { "kamera" } else { "upload" }
}

fn mode_title(mode: RequestKind) -> &'static str {
    if mode.is_camera() { "Kamera" } else { "Upload" }
}

fn min_confidence(mode: RequestKind, thresholds: &Thresholds) -> String {
    let value = if mode.is_camera() {
        thresholds.camera_min_confidence
    } else {
        thresholds.upload_min_confidence
    };
    format_threshold(value)
}

fn brightness_label(t: &Thresholds) -> String {
    format!("Brightness ({}-{})", t.min_brightness, t.max_brightness)
}

fn focus_label(t: &Thresholds) -> String {
    format!("Focus Score (min: {})", t.min_focus_score)
}

fn level(ok: bool, otherwise: ReadoutLevel) -> ReadoutLevel {
    if ok { ReadoutLevel::Acceptable } else { otherwise }
}

fn success_view(s: &SuccessOutcome, t: &Thresholds) -> ModalView {
    let percent = confidence_percent(s.confidence);
    let mut readouts = Vec::new();

    if let Some((brightness, blur)) = s
        .quality
        .as_ref()
        .filter(|q| q.is_complete())
        .and_then(|q| Some((q.brightness_value()?, q.blur_value()?)))
    {
        readouts.push(QualityReadout {
            label: brightness_label(t),
            value: format!("{:.1}", brightness),
            level: level(
                brightness >= t.min_brightness && brightness <= t.max_brightness,
                ReadoutLevel::Marginal,
            ),
        });
        readouts.push(QualityReadout {
            label: focus_label(t),
            value: format!("{:.1}", blur),
            level: level(blur >= t.min_focus_score, ReadoutLevel::Marginal),
        });
        readouts.push(QualityReadout {
            label: "Mode Deteksi".to_string(),
            value: mode_title(s.mode).to_string(),
            level: ReadoutLevel::Neutral,
        });
    }

    let meta = &s.metadata;
    let sections = [
        ("Deskripsi", meta.display_description()),
        ("Karakteristik", meta.physical_characteristics.as_deref()),
        ("Habitat", meta.habitat.as_deref()),
        ("Manfaat & Makna", meta.benefits_or_meaning.as_deref()),
    ]
    .into_iter()
    .filter_map(|(heading, body)| {
        body.filter(|b| !b.is_empty()).map(|b| Section {
            heading: heading.to_string(),
            body: b.to_string(),
        })
    })
    .collect();

    ModalView {
        status: ModalStatus::Success,
        title: meta.name.clone(),
        subtitle: meta.scientific_name.clone().filter(|s| !s.is_empty()),
        image: s.image_data.clone(),
        confidence: Some(ConfidenceBar {
            label: format!(
                "Tingkat Kepercayaan (Min: {} untuk mode {})",
                min_confidence(s.mode, t),
                mode_word(s.mode)
            ),
            percent,
        }),
        notice: None,
        prediction: None,
        readouts,
        sections,
    }
}

fn poor_readouts(q: &QualityInfo, mode: RequestKind, t: &Thresholds) -> Vec<QualityReadout> {
    let brightness = q.brightness_value();
    let blur = q.blur_value();
    vec![
        QualityReadout {
            label: brightness_label(t),
            value: brightness.map_or_else(|| "N/A".to_string(), |b| format!("{:.1}", b)),
            level: level(
                brightness.is_some_and(|b| b >= t.min_brightness && b <= t.max_brightness),
                ReadoutLevel::Poor,
            ),
        },
        QualityReadout {
            label: focus_label(t),
            value: blur.map_or_else(|| "N/A".to_string(), |b| format!("{:.1}", b)),
            level: level(blur.is_some_and(|b| b >= t.min_focus_score), ReadoutLevel::Poor),
        },
        QualityReadout {
            label: format!("Min Confidence ({})", mode_title(mode)),
            value: min_confidence(mode, t),
            level: ReadoutLevel::Acceptable,
        },
    ]
}

fn low_confidence_view(l: &LowConfidenceOutcome, t: &Thresholds) -> ModalView {
    let camera = l.mode.is_camera();
    let mut body = format!(
        "Sistem memerlukan confidence minimal {} untuk mode {}. {}",
        min_confidence(l.mode, t),
        mode_word(l.mode),
        if camera {
            "Arahkan kamera ke bunga dengan pencahayaan yang baik."
        } else {
            "Pastikan gambar berisi bunga yang jelas."
        }
    );
    if let Some(warning) = &l.warning {
        body.push_str("\n  ");
        body.push_str(warning);
    }

    let prediction = l.predicted_name.as_ref().map(|name| Section {
        heading: "Prediksi (Tidak Pasti)".to_string(),
        body: match l.confidence_label() {
            Some(label) => format!("{}\n  Tingkat kepercayaan: {}", name, label),
            None => name.clone(),
        },
    });

    ModalView {
        status: ModalStatus::Warning,
        title: "Peringatan".to_string(),
        subtitle: Some(format!(
            "Mode: {}",
            if camera { "Kamera Real-time" } else { "Upload Gambar" }
        )),
        image: l.image_data.clone(),
        confidence: None,
        notice: Some(Section {
            heading: "Confidence Terlalu Rendah".to_string(),
            body,
        }),
        prediction,
        readouts: l
            .quality
            .as_ref()
            .map(|q| poor_readouts(q, l.mode, t))
            .unwrap_or_default(),
        sections: Vec::new(),
    }
}

fn failure_view(f: &FailureOutcome) -> ModalView {
    ModalView {
        status: ModalStatus::Error,
        title: "Gagal Memproses".to_string(),
        subtitle: None,
        image: f.image_data.clone(),
        confidence: None,
        notice: Some(Section {
            heading: "Kesalahan".to_string(),
            body: f
                .error
                .clone()
                .unwrap_or_else(|| messages::PROCESSING_FAILED.to_string()),
        }),
        prediction: None,
        readouts: Vec::new(),
        sections: Vec::new(),
    }
}

/// Toast that accompanies an outcome, if any
///
/// Low-confidence results from the live camera stay silent so continuous
/// capture is not interrupted.
pub fn outcome_toast(outcome: &ClassificationOutcome) -> Option<(String, ToastKind)> {
    match outcome {
        ClassificationOutcome::Success(_) => {
            Some((messages::CLASSIFY_OK.to_string(), ToastKind::Success))
        }
        ClassificationOutcome::LowConfidence(l) if l.mode == RequestKind::Upload => {
            Some((messages::NOT_A_FLOWER.to_string(), ToastKind::Error))
        }
        ClassificationOutcome::LowConfidence(_) => None,
        ClassificationOutcome::Failure(f) => Some((
            f.error
                .clone()
                .unwrap_or_else(|| messages::CLASSIFY_FAILED.to_string()),
            ToastKind::Error,
        )),
    }
}

/// Owns the modal and its scroll lock
pub struct ResultPresenter {
    view: Option<ModalView>,
    lock: ModalScrollLock,
    thresholds: Thresholds,
    mounted: bool,
}

impl ResultPresenter {
    pub fn new(thresholds: Thresholds) -> Self {
        Self {
            view: None,
            lock: ModalScrollLock::default(),
            thresholds,
            mounted: true,
        }
    }

    pub fn set_mounted(&mut self, mounted: bool) {
        self.mounted = mounted;
    }

    pub fn is_open(&self) -> bool {
        self.view.is_some()
    }

    pub fn view(&self) -> Option<&ModalView> {
        self.view.as_ref()
    }

    /// Render an outcome into the modal and fire its toast
    ///
    /// Without a modal surface nothing is rendered and the page is not
    /// locked; the toast still goes out. Returns whether the modal opened.
    pub fn present(
        &mut self,
        outcome: &ClassificationOutcome,
        viewport: &mut ScrollViewport,
        toasts: &mut ToastNotifier,
    ) -> bool {
        if let Some((message, kind)) = outcome_toast(outcome) {
            toasts.show(message, kind);
        }
        if !self.mounted {
            debug!("Result modal not mounted, skipping render");
            return false;
        }
        self.view = Some(ModalView::build(outcome, &self.thresholds));
        self.lock.acquire(viewport);
        true
    }

    /// Close the modal and put the page back where it was
    ///
    /// Returns false if the modal was not open.
    pub fn close(&mut self, viewport: &mut ScrollViewport) -> bool {
        if self.view.take().is_none() {
            return false;
        }
        self.lock.release(viewport);
        true
    }
}
