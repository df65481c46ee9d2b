// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

/// Barcode scanning constants
pub mod scan {
    use std::time::Duration;

    /// Number of digits in a UPC-A code
    pub const UPC_A_LENGTH: usize = 12;

    /// Minimum time between decode attempts on sampled frames
    pub const DETECTION_INTERVAL: Duration = Duration::from_secs(1);

    /// Maximum dimension for decode processing (frames are downscaled to this).
    /// 1D barcodes need more horizontal resolution than QR codes, so this is
    /// kept higher than a typical QR processing size.
    pub const MAX_DETECTION_DIMENSION: u32 = 1280;

    /// Displayed when the server response carries no `message` field
    pub const RESPONSE_FALLBACK_TEXT: &str = "Received response";

    /// Displayed when capture or submission fails for any reason
    pub const SUBMIT_ERROR_TEXT: &str = "Error sending data";
}

/// Backend endpoint constants
pub mod net {
    /// Default recap endpoint for local development deployments
    pub const DEFAULT_RECAP_ENDPOINT: &str = "http://localhost:5000/recap";

    /// Multipart field carrying the JSON metadata
    pub const METADATA_FIELD: &str = "metadata";

    /// Multipart field carrying the JPEG image
    pub const IMAGE_FIELD: &str = "image";

    /// Filename sent with the image part
    pub const IMAGE_FILENAME: &str = "frame.jpg";

    /// Request timeout for the recap round trip
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;
}

/// JPEG encoding constants
pub mod encoding {
    /// Default JPEG quality for captured frames
    pub const DEFAULT_JPEG_QUALITY: u8 = 92;
}

/// GStreamer pipeline constants
pub mod pipeline {
    /// Maximum buffer queue size (keep small for low latency)
    pub const MAX_BUFFERS: u32 = 2;

    /// Get number of threads for videoconvert based on available CPU threads
    pub fn videoconvert_threads() -> u32 {
        std::thread::available_parallelism()
            .map(|n| n.get() as u32)
            .unwrap_or(4)
    }

    /// Output pixel format for appsink.
    /// RGBA uses 4 bytes/pixel and keeps preview, detection, and capture on
    /// one layout.
    pub const OUTPUT_FORMAT: &str = "RGBA";
}

/// Timing constants
pub mod timing {
    /// Frame counter modulo for periodic logging
    pub const FRAME_LOG_INTERVAL: u64 = 30;

    /// Poll interval while waiting for frames (~60fps)
    pub const FRAME_POLL_MILLIS: u64 = 16;

    /// Pipeline state change timeout on stop
    pub const STOP_TIMEOUT_SECS: u64 = 2;

    /// Pipeline playing state timeout on start
    pub const START_TIMEOUT_SECS: u64 = 5;

    /// Delay before retrying a failed pipeline start
    pub const PIPELINE_RETRY_SECS: u64 = 5;
}

/// UI constants
pub mod ui {
    /// Maximum width of the result/error card under the preview
    pub const RESULT_CARD_MAX_WIDTH: f32 = 480.0;

    /// Vertical spacing in the footer column
    pub const FOOTER_SPACING: u16 = 12;

    /// Padding around the footer
    pub const FOOTER_PADDING: u16 = 16;
}

/// Application information utilities
pub mod app_info {
    /// Get the application version from build-time environment
    pub fn version() -> &'static str {
        env!("GIT_VERSION")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upc_a_length() {
        assert_eq!(scan::UPC_A_LENGTH, 12);
    }

    #[test]
    fn test_jpeg_quality_in_range() {
        assert!(encoding::DEFAULT_JPEG_QUALITY >= 1 && encoding::DEFAULT_JPEG_QUALITY <= 100);
    }

    #[test]
    fn test_user_facing_texts_not_empty() {
        assert!(!scan::RESPONSE_FALLBACK_TEXT.is_empty());
        assert!(!scan::SUBMIT_ERROR_TEXT.is_empty());
    }
}
