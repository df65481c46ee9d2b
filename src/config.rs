// SPDX-License-Identifier: GPL-3.0-only

use crate::constants::{encoding, net};
use cosmic::cosmic_config::{self, CosmicConfigEntry, cosmic_config_derive::CosmicConfigEntry};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, CosmicConfigEntry, Eq, PartialEq, Serialize, Deserialize)]
#[version = 1]
pub struct Config {
    /// Last used camera device path (PipeWire object serial)
    pub last_camera_path: Option<String>,
    /// Recap endpoint receiving the code + frame upload
    pub recap_endpoint: String,
    /// JPEG quality for captured frames (1-100)
    pub jpeg_quality: u8,
    /// Keep a local copy of every captured frame (for debugging failed recaps)
    pub save_captured_frames: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            last_camera_path: None,
            recap_endpoint: net::DEFAULT_RECAP_ENDPOINT.to_string(),
            jpeg_quality: encoding::DEFAULT_JPEG_QUALITY,
            save_captured_frames: false,
        }
    }
}
