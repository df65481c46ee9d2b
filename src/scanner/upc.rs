// SPDX-License-Identifier: GPL-3.0-only

//! UPC-A barcode detection
//!
//! Detection runs on a luma copy of the frame, downscaled when the frame is
//! larger than the decoder needs. The decode itself happens on a blocking
//! thread to keep the UI responsive.

use crate::backends::camera::types::CameraFrame;
use crate::constants::scan;
use std::fmt;
use tracing::{debug, trace};

/// A validated 12-digit UPC-A code
///
/// Construction goes through [`DetectedCode::parse`]; anything that is not
/// exactly twelve ASCII digits is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedCode(String);

impl DetectedCode {
    /// Validate a raw decoder result as a UPC-A code
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.len() != scan::UPC_A_LENGTH {
            return None;
        }
        if !raw.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DetectedCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// UPC-A detector operating on camera frames
#[derive(Debug, Clone)]
pub struct UpcDetector {
    /// Frames with a larger edge are downscaled before decoding
    max_dimension: u32,
}

impl Default for UpcDetector {
    fn default() -> Self {
        Self {
            max_dimension: scan::MAX_DETECTION_DIMENSION,
        }
    }
}

impl UpcDetector {
    /// Run detection on a blocking thread.
    ///
    /// Returns the raw decoded text when a UPC-A barcode was found, `None`
    /// otherwise. Validation is left to the caller.
    pub async fn detect(&self, frame: CameraFrame) -> Option<String> {
        let detector = self.clone();
        tokio::task::spawn_blocking(move || detector.detect_sync(&frame))
            .await
            .ok()
            .flatten()
    }

    /// Synchronous detection, used directly by the CLI scan loop
    pub fn detect_sync(&self, frame: &CameraFrame) -> Option<String> {
        let (luma, width, height) = luma_view(frame, self.max_dimension);

        match rxing::helpers::detect_in_luma(
            luma,
            height,
            width,
            Some(rxing::BarcodeFormat::UPC_A),
        ) {
            Ok(result) => {
                let text = result.getText().to_string();
                debug!(code = %text, "UPC-A barcode detected");
                Some(text)
            }
            Err(e) => {
                trace!(error = ?e, "No barcode in frame");
                None
            }
        }
    }
}

/// Convert a frame to a grayscale buffer, removing stride padding and
/// downscaling (nearest neighbor) when the frame exceeds `max_dimension`.
fn luma_view(frame: &CameraFrame, max_dimension: u32) -> (Vec<u8>, u32, u32) {
    let src_width = frame.width as usize;
    let src_height = frame.height as usize;
    let stride = frame.stride as usize;

    let largest = frame.width.max(frame.height);
    let (out_width, out_height) = if largest > max_dimension && largest > 0 {
        let scale = max_dimension as f32 / largest as f32;
        (
            ((frame.width as f32 * scale) as u32).max(1),
            ((frame.height as f32 * scale) as u32).max(1),
        )
    } else {
        (frame.width, frame.height)
    };

    let mut luma = Vec::with_capacity(out_width as usize * out_height as usize);
    for y in 0..out_height as usize {
        let src_y = y * src_height / out_height as usize;
        let row_start = src_y * stride;
        for x in 0..out_width as usize {
            let src_x = x * src_width / out_width as usize;
            let idx = row_start + src_x * 4;
            if idx + 2 < frame.data.len() {
                let r = frame.data[idx] as u32;
                let g = frame.data[idx + 1] as u32;
                let b = frame.data[idx + 2] as u32;
                // ITU-R BT.601 luma weights
                luma.push(((r * 299 + g * 587 + b * 114) / 1000) as u8);
            } else {
                luma.push(0);
            }
        }
    }

    (luma, out_width, out_height)
}
