// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for headless operation
//!
//! This module provides command-line functionality for:
//! - Listing available cameras
//! - Scanning a barcode and submitting it without the GUI

use comic_recapper::backends::camera::types::CameraFrame;
use comic_recapper::backends::camera::{PreviewPipeline, enumerate_cameras};
use comic_recapper::config::Config;
use comic_recapper::constants::{net, scan};
use comic_recapper::recap::{FrameEncoder, RecapClient};
use comic_recapper::scanner::{DetectedCode, UpcDetector};
use futures::channel::mpsc;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// List all available cameras
pub fn list_cameras() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize GStreamer
    gstreamer::init()?;

    let cameras = enumerate_cameras();

    if cameras.is_empty() {
        println!("No cameras found.");
        return Ok(());
    }

    println!("Available cameras:");
    println!();
    for (index, camera) in cameras.iter().enumerate() {
        println!("  [{}] {}", index, camera.name);
    }

    Ok(())
}

/// Scan a barcode with the specified camera and submit it to the recap
/// endpoint, printing the service message
pub fn scan(
    camera_index: usize,
    endpoint: Option<String>,
    output: Option<PathBuf>,
    timeout_secs: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    // Initialize GStreamer
    gstreamer::init()?;

    // Enumerate cameras
    let cameras = enumerate_cameras();
    if cameras.is_empty() {
        return Err("No cameras found".into());
    }

    if camera_index >= cameras.len() {
        return Err(format!(
            "Camera index {} out of range (0-{})",
            camera_index,
            cameras.len() - 1
        )
        .into());
    }

    let camera = &cameras[camera_index];
    println!("Using camera: {}", camera.name);

    let endpoint = endpoint.unwrap_or_else(|| {
        // Fall back to the GUI configuration, then the built-in default
        load_configured_endpoint().unwrap_or_else(|| net::DEFAULT_RECAP_ENDPOINT.to_string())
    });
    println!("Endpoint: {}", endpoint);

    // Ctrl+C aborts the scan loop cleanly so the camera is released
    let aborted = Arc::new(AtomicBool::new(false));
    {
        let aborted = Arc::clone(&aborted);
        ctrlc::set_handler(move || {
            aborted.store(true, Ordering::Release);
        })?;
    }

    // Start camera pipeline
    println!("Scanning (point the camera at a UPC-A barcode)...");
    let (sender, mut receiver) = mpsc::channel(10);
    let pipeline = PreviewPipeline::new(camera, sender)?;

    let detector = UpcDetector::default();
    let deadline = Instant::now() + Duration::from_secs(timeout_secs);
    let mut last_decode: Option<Instant> = None;
    let mut detection: Option<(DetectedCode, CameraFrame)> = None;

    while Instant::now() < deadline {
        if aborted.load(Ordering::Acquire) {
            break;
        }

        match receiver.try_next() {
            Ok(Some(frame)) => {
                if last_decode.is_some_and(|t| t.elapsed() < scan::DETECTION_INTERVAL) {
                    continue;
                }
                last_decode = Some(Instant::now());

                if let Some(raw) = detector.detect_sync(&frame)
                    && let Some(code) = DetectedCode::parse(&raw)
                {
                    detection = Some((code, frame));
                    break;
                }
            }
            Ok(None) => return Err("Camera frame stream ended".into()),
            Err(_) => {
                // No frame available yet, wait a bit
                std::thread::sleep(Duration::from_millis(16));
            }
        }
    }

    // Release the camera before the network round trip
    pipeline.stop()?;

    if aborted.load(Ordering::Acquire) {
        println!("Aborted.");
        return Ok(());
    }

    let Some((code, frame)) = detection else {
        return Err("No barcode detected before timeout".into());
    };
    println!("Detected code: {}", code);

    let config = load_config();
    let encoder = FrameEncoder::new(config.jpeg_quality);
    let jpeg = encoder.encode_jpeg_sync(&frame)?;

    if let Some(path) = output {
        std::fs::write(&path, &jpeg)?;
        println!("Saved frame to {}", path.display());
    }

    // Submit on a local runtime
    let runtime = tokio::runtime::Runtime::new()?;
    let client = RecapClient::new(endpoint);
    match runtime.block_on(client.submit(&code, jpeg)) {
        Ok(message) => {
            println!("{}", message);
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", scan::SUBMIT_ERROR_TEXT);
            Err(e.into())
        }
    }
}

/// Load the persisted GUI configuration, falling back to defaults
fn load_config() -> Config {
    use cosmic::cosmic_config::{self, CosmicConfigEntry};
    use comic_recapper::app::AppModel;
    use cosmic::Application;

    cosmic_config::Config::new(AppModel::APP_ID, Config::VERSION)
        .ok()
        .and_then(|handler| Config::get_entry(&handler).ok())
        .unwrap_or_default()
}

fn load_configured_endpoint() -> Option<String> {
    let endpoint = load_config().recap_endpoint;
    if endpoint.is_empty() {
        None
    } else {
        Some(endpoint)
    }
}
