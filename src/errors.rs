// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the capture and submission paths
//!
//! Camera/pipeline failures are typed at the backend boundary
//! (`backends::camera::types::BackendError`); the types here cover what
//! happens after a code was accepted.

use std::fmt;

/// Frame capture errors
#[derive(Debug, Clone)]
pub enum CaptureError {
    /// No frame has arrived from the camera yet
    NoFrameAvailable,
    /// JPEG encoding failed
    EncodingFailed(String),
    /// Saving a local copy of the frame failed
    SaveFailed(String),
}

/// Submission errors for the recap round trip
#[derive(Debug, Clone)]
pub enum SubmitError {
    /// Request failed, timed out, or the server answered non-2xx
    Network(String),
    /// Response body was not JSON or carried unexpected fields
    ResponseFormat(String),
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::NoFrameAvailable => write!(f, "No frame available for capture"),
            CaptureError::EncodingFailed(msg) => write!(f, "Encoding failed: {}", msg),
            CaptureError::SaveFailed(msg) => write!(f, "Save failed: {}", msg),
        }
    }
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::Network(msg) => write!(f, "Network error: {}", msg),
            SubmitError::ResponseFormat(msg) => write!(f, "Malformed response: {}", msg),
        }
    }
}

impl std::error::Error for CaptureError {}
impl std::error::Error for SubmitError {}

impl From<std::io::Error> for CaptureError {
    fn from(err: std::io::Error) -> Self {
        CaptureError::SaveFailed(err.to_string())
    }
}
