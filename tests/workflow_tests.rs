// SPDX-License-Identifier: GPL-3.0-only

//! End-to-end workflow tests against the scripted transport and the
//! virtual camera

mod common;

use common::{Harness, write_file};
use petal::app::notice::{FileNoticeStore, NoticeStore};
use petal::app::result_presenter::ModalStatus;
use petal::app::search::SearchPanel;
use petal::app::toast::ToastKind;
use petal::app::upload_zone::ZoneState;
use petal::classifier::RequestBody;
use petal::errors::TransportError;
use petal::{Message, Page};
use serde_json::json;

fn low_confidence_payload(mode: &str) -> serde_json::Value {
    json!({
        "success": true,
        "is_flower": false,
        "warning": true,
        "mode": mode,
        "predicted_name": "Melati",
        "confidence": 0.4
    })
}

#[tokio::test]
async fn test_drop_preview_and_successful_upload() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "mawar.jpg", 2 * 1024 * 1024);
    let mut h = Harness::new(Page::Home);
    h.transport.reply_json(
        200,
        json!({
            "success": true,
            "is_flower": true,
            "metadata": {"name": "Mawar"},
            "confidence": 0.92,
            "mode": "upload"
        }),
    );

    h.send(Message::FileDropped(path)).await;
    match h.app.upload_zone.state() {
        ZoneState::Preview(preview) => {
            assert_eq!(preview.file.name, "mawar.jpg");
            assert_eq!(preview.size_label, "2.00 MB");
        }
        ZoneState::Empty => panic!("expected a preview"),
    }

    let task = h.app.update(Message::SubmitUpload);
    assert!(h.app.loading);
    assert!(h.app.classifier.is_busy());
    h.app.run_until_idle(task).await;

    assert!(!h.app.loading);
    assert!(!h.app.classifier.is_busy());
    assert_eq!(h.transport.call_count(), 1);
    let request = &h.transport.requests()[0];
    assert!(request.url.ends_with("/upload"));
    assert!(matches!(
        &request.body,
        RequestBody::Multipart { field: "file", file_name, .. } if file_name == "mawar.jpg"
    ));

    let view = h.app.presenter.view().expect("modal open");
    assert_eq!(view.status, ModalStatus::Success);
    assert_eq!(view.title, "Mawar");
    assert_eq!(view.confidence.as_ref().map(|c| c.percent), Some(92));
    assert!(h.app.toasts.has_shown(ToastKind::Success));
}

#[tokio::test]
async fn test_camera_low_confidence_has_no_error_toast() {
    let mut h = Harness::new(Page::Home);
    h.transport.reply_json(200, low_confidence_payload("camera"));

    h.send(Message::ToggleCamera).await;
    assert!(h.app.camera.is_active());

    h.send(Message::Capture).await;

    let request = &h.transport.requests()[0];
    assert!(request.url.ends_with("/capture"));
    match &request.body {
        RequestBody::Json(body) => {
            let image = body["image"].as_str().unwrap();
            assert!(image.starts_with("data:image/jpeg;base64,"));
        }
        other => panic!("unexpected body {:?}", other),
    }

    let view = h.app.presenter.view().expect("modal open");
    assert_eq!(view.status, ModalStatus::Warning);
    assert!(!h.app.toasts.has_shown(ToastKind::Error));
    assert!(!h.app.classifier.is_busy());
}

#[tokio::test]
async fn test_upload_low_confidence_fires_error_toast() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "melati.png", 1024);
    let mut h = Harness::new(Page::Classify);
    h.transport.reply_json(200, low_confidence_payload("upload"));

    h.send(Message::FileDropped(path)).await;
    h.send(Message::SubmitUpload).await;

    let view = h.app.presenter.view().expect("modal open");
    assert_eq!(view.status, ModalStatus::Warning);
    assert!(
        h.toast_messages()
            .contains(&"Gambar tidak terdeteksi sebagai bunga".to_string())
    );
}

#[tokio::test]
async fn test_search_without_results_shows_empty_state() {
    let mut h = Harness::new(Page::Search);
    h.transport.reply_json(200, json!({"results": []}));

    h.send(Message::SearchInput("mawar".to_string())).await;
    h.send(Message::Search).await;

    assert_eq!(h.app.search.panel(), &SearchPanel::Empty);
    assert!(h.app.search.panel().cards().is_empty());
    assert!(!h.app.loading);
    match &h.transport.requests()[0].body {
        RequestBody::Json(body) => assert_eq!(body, &json!({"query": "mawar"})),
        other => panic!("unexpected body {:?}", other),
    }
}

#[tokio::test]
async fn test_leaving_with_camera_on_shows_notice_once() {
    let mut h = Harness::new(Page::Home);
    h.send(Message::ToggleCamera).await;
    assert!(h.app.camera.is_active());

    h.send(Message::Navigate(Page::Search)).await;
    assert!(!h.app.camera.is_active());
    assert_eq!(h.camera.stops(), 1);
    let toast = h.app.toasts.current().expect("notice shown");
    assert_eq!(toast.message, "Kamera dimatikan");
    assert_eq!(toast.kind, ToastKind::Warning);

    h.send(Message::Navigate(Page::Home)).await;
    let shown = h
        .toast_messages()
        .iter()
        .filter(|m| *m == "Kamera dimatikan")
        .count();
    assert_eq!(shown, 1);
}

#[tokio::test]
async fn test_notice_file_is_cleared_after_display() {
    let dir = tempfile::tempdir().unwrap();
    let notice_path = dir.path().join("pending-notice.json");
    let mut h = Harness::with_notices(
        Page::Classify,
        Box::new(FileNoticeStore::new(notice_path.clone())),
    );
    h.send(Message::ToggleCamera).await;

    h.send(Message::Navigate(Page::Home)).await;
    assert!(h.app.toasts.has_shown(ToastKind::Warning));
    assert!(FileNoticeStore::new(notice_path).take().is_none());
}

#[tokio::test]
async fn test_switch_without_camera_is_noop() {
    let mut h = Harness::new(Page::Home);
    let task = h.app.update(Message::SwitchCamera);
    assert!(task.is_none());
    assert_eq!(h.camera.opens(), 0);
    assert_eq!(h.camera.stops(), 0);
    assert!(!h.app.camera.is_active());
}

#[tokio::test]
async fn test_switch_restarts_on_other_facing() {
    let mut h = Harness::new(Page::Home);
    h.send(Message::ToggleCamera).await;
    h.send(Message::SwitchCamera).await;

    assert!(h.app.camera.is_active());
    assert_eq!(h.camera.opens(), 2);
    assert_eq!(h.camera.stops(), 1);
    assert_eq!(h.app.camera.device_name(), Some("Virtual Camera (front)"));
}

#[tokio::test]
async fn test_transport_failure_clears_in_flight_state() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "mawar.jpg", 512);
    let mut h = Harness::new(Page::Home);
    h.transport
        .push(Err(TransportError::Network("connection refused".to_string())));
    h.transport.push(Err(TransportError::Status(502)));

    h.send(Message::FileDropped(path)).await;
    h.send(Message::SubmitUpload).await;
    assert!(!h.app.loading);
    assert!(!h.app.classifier.is_busy());
    assert!(!h.app.presenter.is_open());
    assert!(h.app.toasts.has_shown(ToastKind::Error));
    assert!(
        h.app
            .toasts
            .current()
            .is_some_and(|t| t.message.starts_with("Terjadi kesalahan: "))
    );

    // The file stays selected, so a retry goes out immediately
    h.send(Message::SubmitUpload).await;
    assert_eq!(h.transport.call_count(), 2);
    assert!(!h.app.classifier.is_busy());
}

#[tokio::test]
async fn test_server_rejection_renders_failure_modal() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "mawar.jpg", 512);
    let mut h = Harness::new(Page::Home);
    h.transport
        .reply_json(200, json!({"success": false, "error": "Model belum dimuat"}));

    h.send(Message::FileDropped(path)).await;
    h.send(Message::SubmitUpload).await;

    let view = h.app.presenter.view().expect("modal open");
    assert_eq!(view.status, ModalStatus::Error);
    assert_eq!(
        h.app.toasts.current().map(|t| t.message.as_str()),
        Some("Model belum dimuat")
    );
}

#[tokio::test]
async fn test_invalid_files_never_reach_the_network() {
    let dir = tempfile::tempdir().unwrap();
    let big = write_file(dir.path(), "besar.jpg", 10 * 1024 * 1024 + 1);
    let text = write_file(dir.path(), "catatan.txt", 10);
    let mut h = Harness::new(Page::Home);

    h.send(Message::FileDropped(big)).await;
    assert_eq!(h.app.upload_zone.state(), &ZoneState::Empty);
    assert_eq!(
        h.app.toasts.current().map(|t| t.message.as_str()),
        Some("Ukuran file Maksimal 10MB!")
    );

    h.send(Message::FileDropped(text)).await;
    assert_eq!(h.app.upload_zone.state(), &ZoneState::Empty);
    assert_eq!(
        h.app.toasts.current().map(|t| t.message.as_str()),
        Some("Silakan pilih file gambar")
    );

    h.send(Message::SubmitUpload).await;
    assert_eq!(
        h.app.toasts.current().map(|t| (t.message.as_str(), t.kind)),
        Some(("Silakan pilih gambar terlebih dahulu", ToastKind::Warning))
    );
    assert_eq!(h.transport.call_count(), 0);
}

#[tokio::test]
async fn test_modal_close_restores_scroll_after_taller_render() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "mawar.jpg", 512);
    let mut h = Harness::new(Page::Home);
    h.transport.reply_json(
        200,
        json!({
            "success": true,
            "is_flower": true,
            "metadata": {"name": "Mawar"},
            "confidence": 0.92,
            "quality_info": {"brightness": 120.0, "blur_score": 80.0}
        }),
    );

    h.lay_out_home(200, 40);
    h.send(Message::Scroll(37)).await;
    assert_eq!(h.app.viewport.offset(), 37);

    h.send(Message::FileDropped(path)).await;
    h.send(Message::SubmitUpload).await;
    let view = h.app.presenter.view().expect("modal open");
    assert_eq!(view.readouts.len(), 3);
    assert!(h.app.viewport.is_locked());

    // Scrolling and relayout while locked leave the offset alone
    h.send(Message::Scroll(10)).await;
    h.lay_out_home(60, 40);
    assert_eq!(h.app.viewport.offset(), 37);

    h.send(Message::CloseModal).await;
    assert!(!h.app.presenter.is_open());
    assert_eq!(h.app.viewport.offset(), 37);
    assert_eq!(h.app.upload_zone.state(), &ZoneState::Empty);
}

#[tokio::test]
async fn test_search_finishing_mid_upload_keeps_loading() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "mawar.jpg", 512);
    let mut h = Harness::new(Page::Home);
    // Replies are consumed in poll order: the search runs first
    h.transport
        .reply_json(200, json!({"success": true, "results": [{"name": "Mawar"}]}));
    h.transport.reply_json(
        200,
        json!({"success": true, "is_flower": true, "metadata": {"name": "Mawar"}, "confidence": 0.9}),
    );

    h.send(Message::FileDropped(path)).await;
    let upload = h.app.update(Message::SubmitUpload);
    assert!(h.app.loading);

    h.send(Message::SearchInput("mawar".to_string())).await;
    h.send(Message::Search).await;
    assert_eq!(h.app.search.panel().cards().len(), 1);
    assert!(h.app.loading);
    assert!(h.app.classifier.is_busy());

    h.app.run_until_idle(upload).await;
    assert!(!h.app.loading);
    assert!(h.app.presenter.is_open());
}

#[tokio::test]
async fn test_upload_finishing_mid_search_keeps_loading() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "mawar.jpg", 512);
    let mut h = Harness::new(Page::Home);
    h.transport.reply_json(
        200,
        json!({"success": true, "is_flower": true, "metadata": {"name": "Mawar"}, "confidence": 0.9}),
    );
    h.transport.reply_json(200, json!({"success": true, "results": []}));

    h.send(Message::FileDropped(path)).await;
    h.send(Message::SearchInput("mawar".to_string())).await;
    let search = h.app.update(Message::Search);
    assert!(h.app.loading);

    h.send(Message::SubmitUpload).await;
    assert!(h.app.presenter.is_open());
    assert!(h.app.loading);

    h.app.run_until_idle(search).await;
    assert!(!h.app.loading);
}

#[tokio::test]
async fn test_result_for_previous_page_is_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "mawar.jpg", 512);
    let mut h = Harness::new(Page::Home);
    h.transport.reply_json(
        200,
        json!({"success": true, "is_flower": true, "metadata": {"name": "Mawar"}, "confidence": 0.9}),
    );

    h.send(Message::FileDropped(path)).await;
    let task = h.app.update(Message::SubmitUpload);
    h.send(Message::Navigate(Page::Classify)).await;
    h.app.run_until_idle(task).await;

    assert!(!h.app.presenter.is_open());
    assert!(!h.app.loading);
    assert!(!h.app.classifier.is_busy());
}

#[tokio::test]
async fn test_camera_denial_rolls_back() {
    let mut h = Harness::new(Page::Home);
    let backend = petal::backends::camera::virtual_camera::VirtualCameraBackend::refusing(
        "NotAllowedError: Permission denied",
    );
    h.app.camera = petal::app::camera::CameraController::new(
        std::sync::Arc::new(backend),
        Default::default(),
        95,
        std::time::Duration::from_millis(1),
    );

    h.send(Message::ToggleCamera).await;
    assert!(!h.app.camera.is_active());
    let toast = h.app.toasts.current().expect("error toast");
    assert_eq!(toast.kind, ToastKind::Error);
    assert!(toast.message.starts_with("Gagal mengakses kamera: "));
    assert!(toast.message.contains("NotAllowedError"));
}
