// SPDX-License-Identifier: GPL-3.0-only

//! Application state management

use crate::backends::camera::types::{CameraDevice, CameraFrame};
use crate::config::Config;
use crate::scanner::ScanSession;
use cosmic::cosmic_config;
use cosmic::widget::about::About;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Instant;

/// The application model stores app-specific state used to describe its interface and
/// drive its logic.
pub struct AppModel {
    /// Application state which is managed by the COSMIC runtime.
    pub core: cosmic::Core,
    /// Display a context drawer with the designated page if defined.
    pub context_page: ContextPage,
    /// The about page for this app.
    pub about: About,
    /// Configuration data that persists between application runs.
    pub config: Config,
    /// Configuration handler for saving settings
    pub config_handler: Option<cosmic_config::Config>,

    // ===== Scan Flow =====
    /// Scan flow state machine (scanning, submitting, result, error)
    pub session: ScanSession,
    /// When the current detection sample was taken
    pub last_detection_time: Option<Instant>,
    /// Frame snapshot being decoded; pinned so a slow decode is not
    /// cancelled by newer frames
    pub pending_detection: Option<Arc<CameraFrame>>,
    /// Monotonic counter keying the detection subscription per sample
    pub detection_seq: u64,

    // ===== Camera =====
    /// Flag to cancel the camera subscription (used when switching cameras
    /// or freezing the preview for submission)
    pub camera_cancel_flag: Arc<AtomicBool>,
    /// Most recent camera frame; frozen while a submission is in flight
    pub current_frame: Option<Arc<CameraFrame>>,
    /// Preview handle built from the current frame
    pub preview: Option<cosmic::widget::image::Handle>,
    /// Status text shown when the camera cannot start
    pub camera_error: Option<String>,
    /// Available camera devices
    pub available_cameras: Vec<CameraDevice>,
    /// Current camera index
    pub current_camera_index: usize,
    /// Dropdown options (cached for UI)
    pub camera_dropdown_options: Vec<String>,
    /// Whether the async camera enumeration has completed
    pub cameras_initialized: bool,

    // ===== Settings =====
    /// Endpoint text field contents in the settings drawer
    pub endpoint_input: String,
}

/// The context page to display in the context drawer.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum ContextPage {
    #[default]
    About,
    Settings,
}

/// Messages emitted by the application and its widgets.
#[derive(Debug, Clone)]
pub enum Message {
    // ===== UI Navigation =====
    LaunchUrl(String),
    ToggleContextPage(ContextPage),

    // ===== Camera Control =====
    CameraFrame(Arc<CameraFrame>),
    CamerasInitialized(Vec<CameraDevice>, usize),
    SelectCamera(usize),
    CameraUnavailable(String),

    // ===== Scan Flow =====
    /// Raw decoder result for a sampled frame (None when no barcode found)
    CodeDetected(Option<String>),
    /// Submission outcome, tagged with the scan attempt that started it
    SubmitFinished {
        generation: u64,
        outcome: Result<String, String>,
    },
    ScanAgain,

    // ===== Settings =====
    UpdateConfig(Config),
    EndpointInputChanged(String),
    SaveEndpoint,
    ToggleSaveFrames,
}
