// SPDX-License-Identifier: GPL-3.0-only

//! JPEG encoding of captured frames
//!
//! The frame shown to the user at detection time is the one submitted, so the
//! encoder works on a [`CameraFrame`] snapshot rather than pulling a fresh
//! frame from the pipeline.

use crate::backends::camera::types::CameraFrame;
use crate::constants::encoding;
use crate::errors::CaptureError;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Encodes camera frames as JPEG for submission
#[derive(Debug, Clone, Copy)]
pub struct FrameEncoder {
    quality: u8,
}

impl Default for FrameEncoder {
    fn default() -> Self {
        Self {
            quality: encoding::DEFAULT_JPEG_QUALITY,
        }
    }
}

impl FrameEncoder {
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }

    /// Encode a frame as JPEG on a blocking thread
    pub async fn encode_jpeg(&self, frame: CameraFrame) -> Result<Vec<u8>, CaptureError> {
        let quality = self.quality;
        tokio::task::spawn_blocking(move || encode_jpeg_sync(&frame, quality))
            .await
            .map_err(|e| CaptureError::EncodingFailed(e.to_string()))?
    }

    /// Synchronous encode, used by the CLI scan path
    pub fn encode_jpeg_sync(&self, frame: &CameraFrame) -> Result<Vec<u8>, CaptureError> {
        encode_jpeg_sync(frame, self.quality)
    }
}

fn encode_jpeg_sync(frame: &CameraFrame, quality: u8) -> Result<Vec<u8>, CaptureError> {
    if frame.width == 0 || frame.height == 0 {
        return Err(CaptureError::NoFrameAvailable);
    }

    let rgba = frame.packed_rgba();
    let expected = frame.width as usize * frame.height as usize * 4;
    if rgba.len() != expected {
        return Err(CaptureError::EncodingFailed(format!(
            "Frame data truncated: {} of {} bytes",
            rgba.len(),
            expected
        )));
    }

    // JPEG has no alpha channel
    let mut rgb = Vec::with_capacity(frame.width as usize * frame.height as usize * 3);
    for pixel in rgba.chunks_exact(4) {
        rgb.extend_from_slice(&pixel[..3]);
    }

    let mut output = Vec::new();
    let encoder =
        image::codecs::jpeg::JpegEncoder::new_with_quality(Cursor::new(&mut output), quality);
    encoder
        .encode(
            &rgb,
            frame.width,
            frame.height,
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| CaptureError::EncodingFailed(e.to_string()))?;

    debug!(
        width = frame.width,
        height = frame.height,
        size_kb = output.len() / 1024,
        "Encoded frame as JPEG"
    );
    Ok(output)
}

/// Write an already-encoded JPEG next to the user's pictures, named by
/// timestamp and code
pub fn save_frame_copy(jpeg: &[u8], code: &str, dir: &Path) -> Result<PathBuf, CaptureError> {
    std::fs::create_dir_all(dir)?;

    let timestamp = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S");
    let path = dir.join(format!("scan_{}_{}.jpg", timestamp, code));
    std::fs::write(&path, jpeg)?;

    info!(path = %path.display(), "Saved captured frame");
    Ok(path)
}

/// Default directory for saved frames (`~/Pictures/Scans`, falling back to
/// the current directory)
pub fn default_save_dir() -> PathBuf {
    dirs::picture_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Scans")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Instant;

    fn solid_frame(width: u32, height: u32) -> CameraFrame {
        let data = vec![200u8; (width * height * 4) as usize];
        CameraFrame {
            width,
            height,
            data: Arc::from(data.as_slice()),
            stride: width * 4,
            captured_at: Instant::now(),
        }
    }

    #[test]
    fn test_encode_produces_jpeg_magic() {
        let encoder = FrameEncoder::default();
        let jpeg = encoder
            .encode_jpeg_sync(&solid_frame(16, 16))
            .expect("encode succeeds");
        assert!(jpeg.len() > 2);
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_encode_rejects_empty_frame() {
        let encoder = FrameEncoder::default();
        let frame = CameraFrame {
            width: 0,
            height: 0,
            data: Arc::from(Vec::new().as_slice()),
            stride: 0,
            captured_at: Instant::now(),
        };
        assert!(matches!(
            encoder.encode_jpeg_sync(&frame),
            Err(CaptureError::NoFrameAvailable)
        ));
    }

    #[test]
    fn test_encode_rejects_truncated_data() {
        let encoder = FrameEncoder::default();
        let data = vec![0u8; 8];
        let frame = CameraFrame {
            width: 16,
            height: 16,
            data: Arc::from(data.as_slice()),
            stride: 64,
            captured_at: Instant::now(),
        };
        assert!(matches!(
            encoder.encode_jpeg_sync(&frame),
            Err(CaptureError::EncodingFailed(_))
        ));
    }

    #[test]
    fn test_quality_is_clamped() {
        let encoder = FrameEncoder::new(0);
        assert!(encoder.encode_jpeg_sync(&solid_frame(8, 8)).is_ok());
        let encoder = FrameEncoder::new(255);
        assert!(encoder.encode_jpeg_sync(&solid_frame(8, 8)).is_ok());
    }

    #[test]
    fn test_save_frame_copy_writes_file() {
        let dir = std::env::temp_dir().join("recapper_capture_test");
        let path = save_frame_copy(&[0xFF, 0xD8, 0xFF, 0xD9], "036000291452", &dir)
            .expect("save succeeds");
        assert!(path.exists());
        assert!(
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.contains("036000291452"))
        );
        let _ = std::fs::remove_file(&path);
    }
}
