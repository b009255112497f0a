// SPDX-License-Identifier: GPL-3.0-only

//! Keyboard dispatch against scroll-derived modes

mod common;

use common::{Harness, write_file};
use petal::app::focus::Control;
use petal::app::toast::ToastKind;
use petal::app::{Key, KeyDisposition, UiMode};
use petal::{Message, Page};
use serde_json::json;

fn success() -> serde_json::Value {
    json!({"success": true, "is_flower": true, "metadata": {"name": "Anggrek"}, "confidence": 0.81})
}

#[tokio::test]
async fn test_mode_follows_scroll_offset() {
    let mut h = Harness::new(Page::Home);
    h.lay_out_home(200, 40);
    assert_eq!(h.app.ui_mode(), UiMode::None);

    h.send(Message::Scroll(20)).await;
    assert_eq!(h.app.ui_mode(), UiMode::Classify);

    h.send(Message::Scroll(40)).await;
    assert_eq!(h.app.ui_mode(), UiMode::Search);

    h.send(Message::Scroll(40)).await;
    assert_eq!(h.app.ui_mode(), UiMode::None);
}

#[tokio::test]
async fn test_space_outside_regions_is_left_to_the_page() {
    let mut h = Harness::new(Page::Home);
    h.lay_out_home(200, 40);
    let (disposition, task) = h.app.handle_key(Key::Space);
    assert_eq!(disposition, KeyDisposition::Native);
    assert!(task.is_none());
}

#[tokio::test]
async fn test_space_in_classify_opens_picker_without_file() {
    let mut h = Harness::new(Page::Home);
    h.lay_out_home(200, 40);
    h.send(Message::Scroll(25)).await;

    let (disposition, _picker) = h.app.handle_key(Key::Space);
    assert_eq!(disposition, KeyDisposition::Handled);
    assert!(h.app.picker_open);

    // A second press while the picker is up does nothing
    let (_, task) = h.app.handle_key(Key::Enter);
    assert!(task.is_none());
}

#[tokio::test]
async fn test_enter_in_classify_submits_selected_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "anggrek.jpg", 2048);
    let mut h = Harness::new(Page::Home);
    h.transport.reply_json(200, success());
    h.lay_out_home(200, 40);
    h.send(Message::Scroll(25)).await;
    h.send(Message::FileDropped(path)).await;

    let (disposition, task) = h.app.handle_key(Key::Enter);
    assert_eq!(disposition, KeyDisposition::Handled);
    assert!(
        h.toast_messages()
            .contains(&"Mengunggah gambar (Keyboard)".to_string())
    );
    h.app.run_until_idle(task).await;

    assert_eq!(h.transport.call_count(), 1);
    assert_eq!(h.app.presenter.view().map(|v| v.title.as_str()), Some("Anggrek"));
}

#[tokio::test]
async fn test_space_in_classify_captures_when_camera_is_live() {
    let mut h = Harness::new(Page::Classify);
    h.transport.reply_json(200, success());
    h.lay_out_home(200, 40);
    h.send(Message::Scroll(25)).await;
    h.send(Message::ToggleCamera).await;

    let (disposition, task) = h.app.handle_key(Key::Space);
    assert_eq!(disposition, KeyDisposition::Handled);
    assert!(
        h.toast_messages()
            .contains(&"Gambar diambil (Keyboard)".to_string())
    );
    h.app.run_until_idle(task).await;
    assert!(h.transport.requests()[0].url.ends_with("/capture"));
}

#[tokio::test]
async fn test_search_mode_with_empty_query_focuses_field() {
    let mut h = Harness::new(Page::Home);
    h.lay_out_home(200, 40);
    h.send(Message::Scroll(65)).await;

    let (disposition, task) = h.app.handle_key(Key::Enter);
    assert_eq!(disposition, KeyDisposition::Handled);
    assert!(task.is_none());
    assert_eq!(
        h.app.toasts.current().map(|t| (t.message.as_str(), t.kind)),
        Some(("Masukkan kata kunci pencarian", ToastKind::Error))
    );
    assert_eq!(h.app.focus.focused(), Some(&Control::SearchInput));
    assert_eq!(h.transport.call_count(), 0);
}

#[tokio::test]
async fn test_text_input_keeps_space_and_searches_on_enter() {
    let mut h = Harness::new(Page::Search);
    h.transport.reply_json(
        200,
        json!({"success": true, "count": 1, "results": [{"name": "Bunga Matahari"}]}),
    );
    h.send(Message::FocusSearch).await;
    h.send(Message::SearchInput("bunga".to_string())).await;

    let (disposition, _) = h.app.handle_key(Key::Space);
    assert_eq!(disposition, KeyDisposition::Native);

    let (disposition, task) = h.app.handle_key(Key::Enter);
    assert_eq!(disposition, KeyDisposition::Handled);
    h.app.run_until_idle(task).await;
    assert_eq!(h.app.search.panel().cards().len(), 1);
}

#[tokio::test]
async fn test_escape_closes_modal_and_enter_is_swallowed() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "anggrek.jpg", 2048);
    let mut h = Harness::new(Page::Home);
    h.transport.reply_json(200, success());
    h.send(Message::FileDropped(path)).await;
    h.send(Message::SubmitUpload).await;
    assert!(h.app.presenter.is_open());
    assert_eq!(h.app.focus.focused(), None);

    let (disposition, task) = h.app.handle_key(Key::Enter);
    assert_eq!(disposition, KeyDisposition::Handled);
    assert!(task.is_none());
    assert!(h.app.presenter.is_open());

    let (disposition, _) = h.app.handle_key(Key::Escape);
    assert_eq!(disposition, KeyDisposition::Handled);
    assert!(!h.app.presenter.is_open());
}

#[tokio::test]
async fn test_focused_control_activates_like_a_click() {
    let mut h = Harness::new(Page::Home);
    h.transport.reply_json(200, json!({"results": []}));
    assert!(h.app.focus.focus(&Control::QuickSearch("Tulip")));

    let (disposition, task) = h.app.handle_key(Key::Enter);
    assert_eq!(disposition, KeyDisposition::Handled);
    h.app.run_until_idle(task).await;

    assert_eq!(h.app.search.query(), "Tulip");
    assert_eq!(h.transport.call_count(), 1);
}

#[tokio::test]
async fn test_tab_walks_the_focus_ring() {
    let mut h = Harness::new(Page::Search);
    let (disposition, _) = h.app.handle_key(Key::Tab);
    assert_eq!(disposition, KeyDisposition::Handled);
    assert_eq!(h.app.focus.focused(), Some(&Control::Nav(Page::Home)));

    h.app.handle_key(Key::Tab);
    assert_eq!(h.app.focus.focused(), Some(&Control::Nav(Page::Classify)));

    h.app.handle_key(Key::BackTab);
    assert_eq!(h.app.focus.focused(), Some(&Control::Nav(Page::Home)));
}
