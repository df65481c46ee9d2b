// SPDX-License-Identifier: GPL-3.0-only

//! Message update handling
//!
//! The main `update()` function acts as a dispatcher; the actual handling
//! code lives in the `handlers` submodules organized by functional domain.
//!
//! # Handler Modules
//!
//! - `handlers::ui`: context pages, settings inputs, config updates
//! - `handlers::camera`: camera selection and frame handling
//! - `handlers::scan`: detection, submission, and scan reset

use crate::app::state::{AppModel, Message};
use cosmic::Task;

impl AppModel {
    /// Main message handler - routes messages to appropriate handler methods.
    pub fn update(&mut self, message: Message) -> Task<cosmic::Action<Message>> {
        match message {
            // ===== UI Navigation =====
            Message::LaunchUrl(url) => self.handle_launch_url(url),
            Message::ToggleContextPage(page) => self.handle_toggle_context_page(page),

            // ===== Camera Control =====
            Message::CameraFrame(frame) => self.handle_camera_frame(frame),
            Message::CamerasInitialized(cameras, index) => {
                self.handle_cameras_initialized(cameras, index)
            }
            Message::SelectCamera(index) => self.handle_select_camera(index),
            Message::CameraUnavailable(error) => self.handle_camera_unavailable(error),

            // ===== Scan Flow =====
            Message::CodeDetected(raw) => self.handle_code_detected(raw),
            Message::SubmitFinished {
                generation,
                outcome,
            } => self.handle_submit_finished(generation, outcome),
            Message::ScanAgain => self.handle_scan_again(),

            // ===== Settings =====
            Message::UpdateConfig(config) => self.handle_update_config(config),
            Message::EndpointInputChanged(value) => self.handle_endpoint_input_changed(value),
            Message::SaveEndpoint => self.handle_save_endpoint(),
            Message::ToggleSaveFrames => self.handle_toggle_save_frames(),
        }
    }
}
