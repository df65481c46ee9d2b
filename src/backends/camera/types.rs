// SPDX-License-Identifier: GPL-3.0-only

//! Shared types for the camera backend

use std::sync::Arc;
use std::time::Instant;

/// Represents a camera device discovered through PipeWire
#[derive(Debug, Clone)]
pub struct CameraDevice {
    /// Human-readable device name
    pub name: String,
    /// PipeWire object serial used as pipewiresrc target-object
    /// (empty = let PipeWire auto-select)
    pub path: String,
    /// PipeWire node ID, when known
    pub node_id: Option<String>,
}

impl CameraDevice {
    /// Fallback device that lets PipeWire pick the default camera
    pub fn auto() -> Self {
        Self {
            name: "Default Camera (PipeWire)".to_string(),
            path: String::new(),
            node_id: None,
        }
    }
}

/// A single RGBA frame delivered by the capture pipeline
#[derive(Clone)]
pub struct CameraFrame {
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// RGBA pixel data, possibly with per-row stride padding
    pub data: Arc<[u8]>,
    /// Bytes per row (>= width * 4)
    pub stride: u32,
    /// When the frame left the pipeline
    pub captured_at: Instant,
}

impl CameraFrame {
    /// Copy the RGBA pixel data without stride padding.
    ///
    /// Rows shorter than the declared stride are skipped rather than read out
    /// of bounds.
    pub fn packed_rgba(&self) -> Vec<u8> {
        let width = self.width as usize;
        let height = self.height as usize;
        let stride = self.stride as usize;

        let mut result = Vec::with_capacity(width * height * 4);
        for y in 0..height {
            let row_start = y * stride;
            let row_end = row_start + width * 4;
            if row_end <= self.data.len() {
                result.extend_from_slice(&self.data[row_start..row_end]);
            }
        }
        result
    }
}

impl std::fmt::Debug for CameraFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "CameraFrame({}x{}, stride {}, {} bytes)",
            self.width,
            self.height,
            self.stride,
            self.data.len()
        )
    }
}

/// Channel used to deliver frames from the pipeline callback
pub type FrameSender = futures::channel::mpsc::Sender<CameraFrame>;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Errors raised by the capture backend
#[derive(Debug, Clone)]
pub enum BackendError {
    /// Pipeline or element creation failed
    InitializationFailed(String),
    /// Other backend failure
    Other(String),
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::InitializationFailed(msg) => {
                write!(f, "Initialization failed: {}", msg)
            }
            BackendError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for BackendError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packed_rgba_removes_stride_padding() {
        // 2x2 RGBA frame with 2 bytes of padding per row
        let data: Vec<u8> = vec![
            255, 0, 0, 255, // red
            0, 255, 0, 255, // green
            0, 0, // padding
            0, 0, 255, 255, // blue
            255, 255, 255, 255, // white
            0, 0, // padding
        ];

        let frame = CameraFrame {
            width: 2,
            height: 2,
            data: Arc::from(data.as_slice()),
            stride: 10,
            captured_at: Instant::now(),
        };

        let packed = frame.packed_rgba();
        assert_eq!(packed.len(), 16);
        assert_eq!(&packed[0..4], &[255, 0, 0, 255]);
        assert_eq!(&packed[4..8], &[0, 255, 0, 255]);
        assert_eq!(&packed[8..12], &[0, 0, 255, 255]);
        assert_eq!(&packed[12..16], &[255, 255, 255, 255]);
    }

    #[test]
    fn test_packed_rgba_no_padding_passthrough() {
        let data: Vec<u8> = (0..32).collect();
        let frame = CameraFrame {
            width: 2,
            height: 4,
            data: Arc::from(data.as_slice()),
            stride: 8,
            captured_at: Instant::now(),
        };

        assert_eq!(frame.packed_rgba(), data);
    }
}
