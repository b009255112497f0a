// SPDX-License-Identifier: GPL-3.0-only

//! Terminal front end
//!
//! Renders the pages with ratatui and feeds keyboard, paste and task
//! results back into [`AppModel::update`]. The page body is drawn into an
//! offscreen buffer as tall as the content and the visible window is
//! copied out at the current scroll offset, so region positions are known
//! in content rows. Camera frames and thumbnails are drawn with Unicode
//! half-block characters for improved vertical resolution.

use crate::app::focus::Control;
use crate::app::notice::{FileNoticeStore, MemoryNoticeStore, NoticeStore};
use crate::app::result_presenter::{ModalStatus, ModalView, ReadoutLevel};
use crate::app::search::{EMPTY_STATE_TEXT, SearchPanel};
use crate::app::toast::ToastKind;
use crate::app::upload_zone::{DragPhase, ZoneState};
use crate::app::workflow::{Region, RegionBounds};
use crate::app::{AppModel, Key, KeyDisposition, Message, Page, Task};
use crate::backends::camera::get_backend;
use crate::classifier::HttpTransport;
use crate::config::Config;
use crate::constants::{layout, timing};
use crate::media::{self, PixelSource, Thumbnail};

use crossterm::{
    event::{
        DisableBracketedPaste, EnableBracketedPaste, Event, EventStream, KeyCode, KeyEvent,
        KeyEventKind, KeyModifiers,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use futures::future::LocalBoxFuture;
use futures::stream::FuturesUnordered;
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};
use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

const HERO_HEIGHT: u16 = 7;
const CLASSIFY_HEIGHT: u16 = 24;

/// Run the interactive terminal UI
pub fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let result = runtime.block_on(run_app(&mut terminal, config));

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

fn notice_store() -> Box<dyn NoticeStore> {
    match FileNoticeStore::default_path() {
        Some(path) => Box::new(FileNoticeStore::new(path)),
        None => {
            warn!("No cache directory, notices will not survive a restart");
            Box::new(MemoryNoticeStore::new())
        }
    }
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let transport = Arc::new(HttpTransport::new()?);
    let (mut app, init) = AppModel::new(
        config,
        get_backend(),
        transport,
        notice_store(),
        Page::Home,
    );

    let mut tasks: FuturesUnordered<LocalBoxFuture<'static, Message>> = FuturesUnordered::new();
    tasks.extend(init.into_futures());
    let mut events = EventStream::new();
    let mut ticker = tokio::time::interval(timing::FRAME_INTERVAL);
    let mut modal_image = ModalImageCache::default();

    loop {
        let mut page_layout = None;
        terminal.draw(|f| page_layout = Some(draw(f, &app, &mut modal_image)))?;
        if let Some(page_layout) = page_layout {
            app.set_layout(
                page_layout.regions,
                page_layout.content_height,
                page_layout.viewport_height,
            );
        }

        let task = tokio::select! {
            Some(message) = tasks.next(), if !tasks.is_empty() => app.update(message),
            event = events.next() => match event {
                Some(Ok(event)) => match handle_event(&mut app, event) {
                    Some(task) => task,
                    None => break,
                },
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
            _ = ticker.tick() => app.update(Message::Tick),
        };
        tasks.extend(task.into_futures());
    }

    info!("Terminal UI exiting");
    Ok(())
}

// =============================================================================
// Input
// =============================================================================

/// Apply one terminal event; `None` means quit
fn handle_event(app: &mut AppModel, event: Event) -> Option<Task<Message>> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key_event(app, key),
        Event::Paste(text) => Some(handle_paste(app, &text)),
        _ => Some(Task::none()),
    }
}

fn handle_key_event(app: &mut AppModel, key: KeyEvent) -> Option<Task<Message>> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }

    match key.code {
        KeyCode::F(n @ 1..=3) => {
            let page = Page::ALL[(n - 1) as usize];
            return Some(app.update(Message::Navigate(page)));
        }
        KeyCode::Char('q') if !app.focus.in_text_input() && !app.presenter.is_open() => {
            return None;
        }
        _ => {}
    }

    let mapped = match key.code {
        KeyCode::Enter => Key::Enter,
        KeyCode::Char(' ') => Key::Space,
        KeyCode::Esc => Key::Escape,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Tab => Key::Tab,
        KeyCode::BackTab => Key::BackTab,
        KeyCode::Char(c) => Key::Char(c),
        _ => Key::Other,
    };

    let (disposition, task) = app.handle_key(mapped);
    if disposition == KeyDisposition::Handled {
        return Some(task);
    }
    Some(Task::batch([task, native_key(app, key)]))
}

/// What the terminal does with a key nobody consumed
fn native_key(app: &mut AppModel, key: KeyEvent) -> Task<Message> {
    if app.focus.in_text_input() {
        return match key.code {
            KeyCode::Char(c) => {
                let mut query = app.search.query().to_string();
                query.push(c);
                app.update(Message::SearchInput(query))
            }
            KeyCode::Backspace => {
                let mut query = app.search.query().to_string();
                query.pop();
                app.update(Message::SearchInput(query))
            }
            KeyCode::Esc => {
                app.focus.blur();
                Task::none()
            }
            _ => Task::none(),
        };
    }

    let page = layout::PAGE_SCROLL as i32;
    let delta = match key.code {
        KeyCode::Up => -1,
        KeyCode::Down => 1,
        KeyCode::PageUp => -page,
        KeyCode::PageDown | KeyCode::Char(' ') => page,
        KeyCode::Home => -i32::from(u16::MAX),
        KeyCode::End => i32::from(u16::MAX),
        _ => return Task::none(),
    };
    app.update(Message::Scroll(delta))
}

/// A pasted path is treated as a file dropped onto the upload zone
fn handle_paste(app: &mut AppModel, text: &str) -> Task<Message> {
    match pasted_path(text) {
        Some(path) if app.mounts.upload_zone => {
            debug!(path = %path.display(), "Path pasted");
            let enter = app.update(Message::Drag(DragPhase::Enter));
            Task::batch([enter, app.update(Message::FileDropped(path))])
        }
        Some(_) => Task::none(),
        None if app.focus.in_text_input() => {
            let query = format!("{}{}", app.search.query(), text.trim());
            app.update(Message::SearchInput(query))
        }
        None => Task::none(),
    }
}

fn pasted_path(text: &str) -> Option<PathBuf> {
    let text = text.trim().trim_matches(|c| c == '\'' || c == '"');
    let text = text.strip_prefix("file://").unwrap_or(text);
    let path = PathBuf::from(text);
    (!text.is_empty() && path.is_file()).then_some(path)
}

// =============================================================================
// Rendering
// =============================================================================

struct PageLayout {
    regions: RegionBounds,
    content_height: u16,
    viewport_height: u16,
}

fn draw(f: &mut Frame, app: &AppModel, modal_image: &mut ModalImageCache) -> PageLayout {
    let area = f.area();
    let [header_area, body_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(area);

    f.render_widget(header(app), header_area);

    let canvas = render_page(app, body_area.width);
    copy_visible(&canvas.buffer, app.viewport.offset(), body_area, f.buffer_mut());

    f.render_widget(status_line(app), status_area);

    if let Some(view) = app.presenter.view() {
        draw_modal(f, view, modal_image);
    }

    PageLayout {
        regions: canvas.regions,
        content_height: canvas.buffer.area.height,
        viewport_height: body_area.height,
    }
}

/// Copy rows `[offset, offset + area.height)` of the page into the frame
fn copy_visible(page: &Buffer, offset: u16, area: Rect, out: &mut Buffer) {
    for row in 0..area.height {
        let src_y = offset.saturating_add(row);
        if src_y >= page.area.height {
            break;
        }
        for x in 0..area.width.min(page.area.width) {
            if let (Some(src), Some(dst)) = (page.cell((x, src_y)), out.cell_mut((area.x + x, area.y + row))) {
                *dst = src.clone();
            }
        }
    }
}

struct PageCanvas {
    buffer: Buffer,
    regions: RegionBounds,
}

fn render_page(app: &AppModel, width: u16) -> PageCanvas {
    let hero_height = if app.page == Page::Home { HERO_HEIGHT } else { 0 };
    let classify_height = if app.page.has_classify() { CLASSIFY_HEIGHT } else { 0 };
    let search_lines = if app.page.has_search() {
        search_body(app, width.saturating_sub(2))
    } else {
        Vec::new()
    };
    let search_height = if app.page.has_search() {
        search_lines.len() as u16 + 2
    } else {
        0
    };

    let height = (hero_height + classify_height + search_height).max(1);
    let mut buffer = Buffer::empty(Rect::new(0, 0, width, height));
    let mut regions = RegionBounds::default();
    let mut y = 0;

    if hero_height > 0 {
        render_hero(Rect::new(0, y, width, hero_height), &mut buffer);
        y += hero_height;
    }
    if classify_height > 0 {
        render_classify(app, Rect::new(0, y, width, classify_height), &mut buffer);
        regions.classify = Some(Region {
            top: y,
            height: classify_height,
        });
        y += classify_height;
    }
    if search_height > 0 {
        let block = Block::bordered().title(" Cari Bunga ");
        Paragraph::new(search_lines)
            .block(block)
            .render(Rect::new(0, y, width, search_height), &mut buffer);
        regions.search = Some(Region {
            top: y,
            height: search_height,
        });
    }

    PageCanvas { buffer, regions }
}

fn focused_style(app: &AppModel, control: &Control) -> Style {
    if app.focus.focused() == Some(control) {
        Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD)
    } else {
        Style::default()
    }
}

fn button(app: &AppModel, control: Control, enabled: bool) -> Span<'static> {
    let style = if enabled {
        focused_style(app, &control)
    } else {
        focused_style(app, &control).fg(Color::DarkGray)
    };
    Span::styled(format!("[{}]", control.label()), style)
}

fn header(app: &AppModel) -> Paragraph<'static> {
    let mut spans = vec![Span::styled(
        " Petal ",
        Style::default().fg(Color::Black).bg(Color::LightMagenta),
    )];
    for (i, page) in Page::ALL.iter().enumerate() {
        let control = Control::Nav(*page);
        let mut style = focused_style(app, &control);
        if *page == app.page {
            style = style.fg(Color::LightMagenta).add_modifier(Modifier::UNDERLINED);
        }
        spans.push(Span::raw(" "));
        spans.push(Span::styled(format!("F{} {}", i + 1, page.title()), style));
    }
    Paragraph::new(Line::from(spans))
}

fn render_hero(area: Rect, buf: &mut Buffer) {
    let lines = vec![
        Line::from(""),
        Line::styled(
            "Kenali Bunga di Sekitarmu",
            Style::default()
                .fg(Color::LightMagenta)
                .add_modifier(Modifier::BOLD),
        ),
        Line::from("Unggah foto atau gunakan kamera untuk mengidentifikasi bunga,"),
        Line::from("lalu cari informasi lengkapnya."),
        Line::from(""),
        Line::styled(
            "Gulir ke bawah lalu tekan Spasi atau Enter untuk memulai",
            Style::default().fg(Color::DarkGray),
        ),
    ];
    Paragraph::new(lines)
        .centered()
        .render(area, buf);
}

fn render_classify(app: &AppModel, area: Rect, buf: &mut Buffer) {
    let block = Block::bordered().title(" Klasifikasi Bunga ");
    let inner = block.inner(area);
    block.render(area, buf);

    let [camera_area, upload_area] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(inner);
    render_camera_panel(app, camera_area, buf);
    render_upload_panel(app, upload_area, buf);
}

fn render_camera_panel(app: &AppModel, area: Rect, buf: &mut Buffer) {
    let [preview_area, controls_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(2)]).areas(area);

    let block = Block::default()
        .borders(Borders::RIGHT)
        .title(match app.camera.device_name() {
            Some(name) => format!(" {} ({}) ", name, app.camera.facing()),
            None => " Kamera ".to_string(),
        });
    let preview_inner = block.inner(preview_area);
    block.render(preview_area, buf);

    match app.camera.latest_frame() {
        Some(frame) if frame.has_dimensions() => HalfBlockImage::new(&frame).render(preview_inner, buf),
        _ => {
            let msg = if app.camera.is_starting() {
                "Menunggu kamera..."
            } else if app.camera.is_active() {
                "Menunggu gambar..."
            } else {
                "Kamera mati"
            };
            render_placeholder(msg, preview_inner, buf);
        }
    }

    let active = app.camera.is_active();
    let toggle_label = if active { "Matikan Kamera" } else { "Nyalakan Kamera" };
    let controls = Line::from(vec![
        Span::styled(
            format!("[{}]", toggle_label),
            focused_style(app, &Control::ToggleCamera),
        ),
        Span::raw(" "),
        button(app, Control::SwitchCamera, active),
        Span::raw(" "),
        button(app, Control::Capture, active),
    ]);
    Paragraph::new(vec![Line::from(""), controls]).render(controls_area, buf);
}

fn render_upload_panel(app: &AppModel, area: Rect, buf: &mut Buffer) {
    let [zone_area, controls_area] = Layout::vertical([
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(area);

    let zone_style = if app.upload_zone.is_drag_active() {
        Style::default().fg(Color::LightMagenta)
    } else {
        focused_style(app, &Control::UploadZone)
    };
    let block = Block::bordered()
        .border_style(zone_style)
        .title(" Unggah Gambar ");
    let inner = block.inner(zone_area);
    block.render(zone_area, buf);

    match app.upload_zone.state() {
        ZoneState::Empty => {
            let lines = vec![
                Line::from(""),
                Line::from("Tempel path gambar di sini"),
                Line::from("atau tekan Enter untuk memilih file"),
                Line::styled(
                    "PNG, JPG, GIF, WEBP (maks. 10 MB)",
                    Style::default().fg(Color::DarkGray),
                ),
            ];
            Paragraph::new(lines).centered().render(inner, buf);
        }
        ZoneState::Preview(preview) => {
            let [image_area, info_area] =
                Layout::vertical([Constraint::Min(1), Constraint::Length(2)]).areas(inner);
            match &preview.thumbnail {
                Some(thumbnail) => HalfBlockImage::new(thumbnail).render(image_area, buf),
                None => render_placeholder("Pratinjau tidak tersedia", image_area, buf),
            }
            Paragraph::new(vec![
                Line::styled(
                    preview.file.name.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Line::from(preview.size_label.clone()),
            ])
            .centered()
            .render(info_area, buf);
        }
    }

    let selected = app.upload_zone.selected().is_some();
    let controls = if selected {
        Line::from(vec![
            button(app, Control::CancelUpload, true),
            Span::raw(" "),
            button(app, Control::SubmitUpload, !app.classifier.is_busy()),
        ])
    } else {
        Line::from(button(app, Control::UploadZone, app.upload_zone.click()))
    };
    Paragraph::new(controls).centered().render(controls_area, buf);
}

fn search_body(app: &AppModel, width: u16) -> Vec<Line<'static>> {
    let input_style = focused_style(app, &Control::SearchInput);
    let cursor = if app.focus.in_text_input() { "▏" } else { "" };
    let query = app.search.query();
    let input = if query.is_empty() && !app.focus.in_text_input() {
        Span::styled(
            format!("{}...", Control::SearchInput.label()),
            input_style.fg(Color::DarkGray),
        )
    } else {
        Span::styled(format!("{}{}", query, cursor), input_style)
    };

    let mut lines = vec![Line::from(vec![
        Span::raw("> "),
        input,
        Span::raw("  "),
        button(app, Control::SearchButton, true),
    ])];

    let mut chips = vec![Span::styled("Populer: ", Style::default().fg(Color::DarkGray))];
    for name in layout::QUICK_SEARCHES.iter().copied() {
        chips.push(button(app, Control::QuickSearch(name), true));
        chips.push(Span::raw(" "));
    }
    lines.push(Line::from(chips));

    let panel = app.search.panel();
    if let Some(header) = panel.header() {
        lines.push(Line::from(""));
        lines.push(Line::styled(
            header,
            Style::default().add_modifier(Modifier::BOLD),
        ));
    }
    match panel {
        SearchPanel::Idle => {}
        SearchPanel::Empty => {
            lines.push(Line::styled(
                EMPTY_STATE_TEXT,
                Style::default().fg(Color::DarkGray),
            ));
        }
        SearchPanel::Results(cards) => {
            for card in cards {
                lines.push(Line::from(""));
                let mut title = vec![Span::styled(
                    format!("{}. {}", card.number, card.name),
                    Style::default()
                        .fg(Color::LightMagenta)
                        .add_modifier(Modifier::BOLD),
                )];
                if !card.scientific_name.is_empty() {
                    title.push(Span::styled(
                        format!(" ({})", card.scientific_name),
                        Style::default().add_modifier(Modifier::ITALIC),
                    ));
                }
                lines.push(Line::from(title));
                for (label, value) in &card.details {
                    let text = format!("{} {}", label, value);
                    for (i, chunk) in wrap_text(&text, width.saturating_sub(3)).into_iter().enumerate() {
                        let indent = if i == 0 { "   " } else { "     " };
                        lines.push(Line::from(format!("{}{}", indent, chunk)));
                    }
                }
            }
        }
    }
    lines
}

/// Greedy word wrap
fn wrap_text(text: &str, width: u16) -> Vec<String> {
    let width = width.max(10) as usize;
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn status_line(app: &AppModel) -> Paragraph<'static> {
    let mut spans = Vec::new();
    if app.loading {
        spans.push(Span::styled(
            " Memproses... ",
            Style::default().fg(Color::Black).bg(Color::Yellow),
        ));
        spans.push(Span::raw(" "));
    }
    match app.toasts.current() {
        Some(toast) => {
            let color = match toast.kind {
                ToastKind::Info => Color::Blue,
                ToastKind::Success => Color::Green,
                ToastKind::Warning => Color::Yellow,
                ToastKind::Error => Color::Red,
            };
            spans.push(Span::styled(
                format!(" {} ", toast.message),
                Style::default().fg(Color::Black).bg(color),
            ));
        }
        None => spans.push(Span::styled(
            "Tab: fokus | Spasi/Enter: aksi | PgUp/PgDn: gulir | F1-F3: halaman | q: keluar",
            Style::default().fg(Color::DarkGray),
        )),
    }
    Paragraph::new(Line::from(spans))
}

/// Decoded modal image, kept until the modal shows a different one
#[derive(Default)]
struct ModalImageCache {
    uri: Option<String>,
    thumbnail: Option<Thumbnail>,
}

impl ModalImageCache {
    fn get(&mut self, uri: Option<&str>) -> Option<&Thumbnail> {
        if self.uri.as_deref() != uri {
            self.uri = uri.map(str::to_string);
            self.thumbnail = uri
                .and_then(media::decode_data_uri)
                .and_then(|(_, bytes)| Thumbnail::from_bytes(&bytes, 160, 120));
        }
        self.thumbnail.as_ref()
    }
}

fn draw_modal(f: &mut Frame, view: &ModalView, images: &mut ModalImageCache) {
    let area = centered_rect(70, 80, f.area());
    f.render_widget(Clear, area);

    let color = match view.status {
        ModalStatus::Success => Color::Green,
        ModalStatus::Warning => Color::Yellow,
        ModalStatus::Error => Color::Red,
    };
    let block = Block::bordered()
        .border_style(Style::default().fg(color))
        .title(format!(" {} ", view.title))
        .title_bottom(Line::from(" Esc: tutup ").right_aligned());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let thumbnail = images.get(view.image.as_deref());
    let image_height = if thumbnail.is_some() { inner.height / 3 } else { 0 };
    let [image_area, text_area] =
        Layout::vertical([Constraint::Length(image_height), Constraint::Min(1)]).areas(inner);
    if let Some(thumbnail) = thumbnail {
        f.render_widget(HalfBlockImage::new(thumbnail), image_area);
    }

    let mut lines = Vec::new();
    if let Some(subtitle) = &view.subtitle {
        lines.push(Line::styled(
            subtitle.clone(),
            Style::default().add_modifier(Modifier::ITALIC),
        ));
    }
    if let Some(bar) = &view.confidence {
        let width = usize::from(text_area.width.saturating_sub(8)).min(40);
        let filled = width * bar.percent as usize / 100;
        lines.push(Line::from(""));
        lines.push(Line::from(bar.label.clone()));
        lines.push(Line::from(vec![
            Span::styled("█".repeat(filled), Style::default().fg(color)),
            Span::styled("░".repeat(width - filled), Style::default().fg(Color::DarkGray)),
            Span::raw(format!(" {}%", bar.percent)),
        ]));
    }
    for section in view.notice.iter().chain(view.prediction.iter()) {
        lines.push(Line::from(""));
        lines.push(Line::styled(
            section.heading.clone(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
        lines.push(Line::from(section.body.clone()));
    }
    if !view.readouts.is_empty() {
        lines.push(Line::from(""));
        for readout in &view.readouts {
            let value_color = match readout.level {
                ReadoutLevel::Acceptable => Color::Green,
                ReadoutLevel::Marginal => Color::Yellow,
                ReadoutLevel::Poor => Color::Red,
                ReadoutLevel::Neutral => Color::Reset,
            };
            lines.push(Line::from(vec![
                Span::raw(format!("{}: ", readout.label)),
                Span::styled(readout.value.clone(), Style::default().fg(value_color)),
            ]));
        }
    }
    for section in &view.sections {
        lines.push(Line::from(""));
        lines.push(Line::styled(
            section.heading.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        lines.push(Line::from(section.body.clone()));
    }

    f.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: true }),
        text_area,
    );
}

/// A `percent_x` by `percent_y` rectangle centred in `area`
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let [_, middle, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(area);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(middle);
    center
}

fn render_placeholder(msg: &str, area: Rect, buf: &mut Buffer) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let x = area.x + (area.width.saturating_sub(msg.chars().count() as u16)) / 2;
    let y = area.y + area.height / 2;
    buf.set_stringn(
        x,
        y,
        msg,
        area.width as usize,
        Style::default().fg(Color::DarkGray),
    );
}

/// Widget that renders an image using half-block characters
struct HalfBlockImage<'a, P: PixelSource> {
    source: &'a P,
}

impl<'a, P: PixelSource> HalfBlockImage<'a, P> {
    fn new(source: &'a P) -> Self {
        Self { source }
    }
}

impl<P: PixelSource> Widget for HalfBlockImage<'_, P> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (width, height) = self.source.dimensions();
        if width == 0 || height == 0 || area.width == 0 || area.height == 0 {
            return;
        }

        // Each terminal cell displays 2 vertical pixels
        let aspect = width as f64 / height as f64;
        let term_width = area.width as f64;
        let term_height = (area.height * 2) as f64;

        let (display_width, display_height) = if term_width / term_height > aspect {
            // Area is wider - fit to height
            let w = term_height * aspect;
            (w as u16, area.height)
        } else {
            // Area is taller - fit to width
            let h = term_width / aspect;
            (area.width, (h / 2.0) as u16)
        };
        if display_width == 0 || display_height == 0 {
            return;
        }

        let x_offset = area.x + (area.width - display_width.min(area.width)) / 2;
        let y_offset = area.y + (area.height - display_height.min(area.height)) / 2;
        let x_scale = width as f64 / display_width as f64;
        let y_scale = height as f64 / (display_height * 2) as f64;

        for ty in 0..display_height.min(area.height) {
            for tx in 0..display_width.min(area.width) {
                let src_x = ((tx as f64 * x_scale) as u32).min(width - 1);
                let src_top = ((ty as f64 * 2.0 * y_scale) as u32).min(height - 1);
                let src_bottom = (((ty as f64 * 2.0 + 1.0) * y_scale) as u32).min(height - 1);

                let (tr, tg, tb) = self.source.sample(src_x, src_top);
                let (br, bg, bb) = self.source.sample(src_x, src_bottom);

                if let Some(cell) = buf.cell_mut((x_offset + tx, y_offset + ty)) {
                    cell.set_char('▀');
                    cell.set_fg(Color::Rgb(tr, tg, tb));
                    cell.set_bg(Color::Rgb(br, bg, bb));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::notice::MemoryNoticeStore;
    use crate::backends::camera::virtual_camera::VirtualCameraBackend;
    use crate::classifier::ScriptedTransport;

    fn app(page: Page) -> AppModel {
        let (app, _) = AppModel::new(
            Config::default(),
            Arc::new(VirtualCameraBackend::solid(8, 8, [0, 0, 0])),
            Arc::new(ScriptedTransport::new()),
            Box::new(MemoryNoticeStore::new()),
            page,
        );
        app
    }

    #[test]
    fn test_home_page_regions() {
        let canvas = render_page(&app(Page::Home), 80);
        let classify = canvas.regions.classify.unwrap();
        let search = canvas.regions.search.unwrap();
        assert_eq!(classify.top, HERO_HEIGHT);
        assert_eq!(search.top, HERO_HEIGHT + CLASSIFY_HEIGHT);
        assert_eq!(canvas.buffer.area.height, search.top + search.height);
    }

    #[test]
    fn test_standalone_pages_have_one_region() {
        let canvas = render_page(&app(Page::Classify), 80);
        assert_eq!(canvas.regions.classify.map(|r| r.top), Some(0));
        assert!(canvas.regions.search.is_none());

        let canvas = render_page(&app(Page::Search), 80);
        assert!(canvas.regions.classify.is_none());
        assert_eq!(canvas.regions.search.map(|r| r.top), Some(0));
    }

    #[test]
    fn test_wrap_text() {
        assert_eq!(
            wrap_text("Habitat : tumbuh di daerah tropis dan subtropis", 20),
            vec!["Habitat : tumbuh di", "daerah tropis dan", "subtropis"]
        );
    }

    #[test]
    fn test_pasted_path_requires_existing_file() {
        assert!(pasted_path("'/definitely/not/here.jpg'").is_none());
        assert!(pasted_path("   ").is_none());
    }
}
