// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands
//!
//! This module provides command-line functionality for:
//! - Listing available cameras
//! - Classifying an image file
//! - Capturing a frame from the camera and classifying it
//! - Searching the flower catalogue

use chrono::Local;
use petal::app::camera::CameraController;
use petal::app::result_presenter::{ModalView, outcome_toast};
use petal::app::search::{EMPTY_STATE_TEXT, SearchPanel};
use petal::app::upload_zone::{self, PendingUpload, SelectedFile};
use petal::backends::camera::virtual_camera::VirtualCameraBackend;
use petal::backends::camera::{CameraBackend, FacingMode, get_backend};
use petal::classifier::{
    ClassificationClient, ClassificationOutcome, HttpTransport, RequestKind, SearchClient,
};
use petal::config::Config;
use petal::constants::timing;
use petal::media;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}

/// List all available cameras
pub fn list_cameras() -> CliResult {
    let backend = get_backend();
    let cameras = backend.enumerate_cameras();

    if cameras.is_empty() {
        println!("No cameras found.");
        return Ok(());
    }

    println!("Available cameras ({}):", backend.name());
    println!();
    for (index, camera) in cameras.iter().enumerate() {
        println!("  [{}] {}", index, camera.name);
        println!("      Path: {}", camera.path);
        if let Some(location) = &camera.camera_location {
            println!("      Facing: {}", location);
        }
    }

    Ok(())
}

/// Upload an image file and print the result
pub fn classify_file(config: &Config, path: &Path) -> CliResult {
    runtime()?.block_on(async {
        let file = SelectedFile::read(path).await?;
        upload_zone::validate(&file.media_type, file.bytes.len() as u64, config.max_upload_bytes)
            .map_err(|e| e.user_message())?;

        let upload = PendingUpload {
            name: file.name,
            media_type: file.media_type,
            bytes: Arc::from(file.bytes),
        };
        println!("Uploading {} ({})", upload.name, petal::constants::format_mib(upload.size()));

        let client = ClassificationClient::new(Arc::new(HttpTransport::new()?), config);
        let pending = client
            .begin_upload(Some(&upload))
            .map_err(|e| e.user_message())?;
        let payload = pending.send().await.map_err(|e| e.user_message())?;
        print_outcome(
            config,
            ClassificationOutcome::from_payload(payload, RequestKind::Upload),
        );
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}

/// Open the camera, wait for a warm frame, capture and classify it
pub fn capture(
    config: &Config,
    facing: FacingMode,
    image: Option<PathBuf>,
    save: Option<PathBuf>,
) -> CliResult {
    let backend: Arc<dyn CameraBackend> = match &image {
        Some(path) => Arc::new(VirtualCameraBackend::from_image_file(path)?),
        None => get_backend(),
    };

    runtime()?.block_on(async {
        let mut camera = CameraController::new(
            backend,
            facing,
            config.jpeg_quality,
            config.switch_settle_delay(),
        );
        let pending = camera
            .begin_start(facing)
            .ok_or("Camera is already starting")?;
        camera
            .complete_start(pending.acquire().await)
            .map_err(|e| e.user_message())?;
        println!(
            "Using camera: {}",
            camera.device_name().unwrap_or("unknown")
        );

        // Let exposure settle, then wait for a frame with real dimensions
        tokio::time::sleep(timing::CAPTURE_WARMUP).await;
        let started = Instant::now();
        let frame = loop {
            match camera.capture() {
                Ok(frame) => break frame,
                Err(e) if started.elapsed() >= timing::CAPTURE_TIMEOUT => {
                    camera.stop();
                    return Err(e.user_message().into());
                }
                Err(_) => tokio::time::sleep(timing::FRAME_INTERVAL).await,
            }
        };
        camera.stop();
        println!("Captured {}x{} frame", frame.width, frame.height);

        if let Some(path) = save {
            let path = if path.is_dir() {
                let timestamp = Local::now().format("%Y%m%d_%H%M%S");
                path.join(format!("petal_{}.jpg", timestamp))
            } else {
                path
            };
            if let Some((_, bytes)) = media::decode_data_uri(&frame.data_uri) {
                tokio::fs::write(&path, bytes).await?;
                println!("Saved: {}", path.display());
            }
        }

        let client = ClassificationClient::new(Arc::new(HttpTransport::new()?), config);
        let pending = client
            .begin_capture(frame.data_uri)
            .map_err(|e| e.user_message())?;
        let payload = pending.send().await.map_err(|e| e.user_message())?;
        print_outcome(
            config,
            ClassificationOutcome::from_payload(payload, RequestKind::Capture),
        );
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}

/// Search the catalogue and print the result cards
pub fn search(config: &Config, query: &str) -> CliResult {
    runtime()?.block_on(async {
        let client = SearchClient::new(Arc::new(HttpTransport::new()?), config);
        let pending = client.begin(query).map_err(|e| e.user_message())?;
        let payload = pending.send().await.map_err(|e| e.user_message())?;
        if let Some(error) = payload.error.as_deref().filter(|_| payload.success == Some(false)) {
            eprintln!("{}", error);
        }

        let panel = SearchPanel::from_payload(&payload);
        if let Some(header) = panel.header() {
            println!("{}", header);
        }
        if panel.cards().is_empty() {
            println!("{}", EMPTY_STATE_TEXT);
        }
        for card in panel.cards() {
            println!();
            if card.scientific_name.is_empty() {
                println!("{}. {}", card.number, card.name);
            } else {
                println!("{}. {} ({})", card.number, card.name, card.scientific_name);
            }
            for (label, value) in &card.details {
                println!("   {} {}", label, value);
            }
        }
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}

fn print_outcome(config: &Config, outcome: ClassificationOutcome) {
    if let Some((message, _)) = outcome_toast(&outcome) {
        eprintln!("{}", message);
    }
    let view = ModalView::build(&outcome, &config.thresholds);
    println!();
    print!("{}", view.to_plain_text());
}
