// SPDX-License-Identifier: GPL-3.0-only

//! Camera control handlers
//!
//! Handles camera selection, initialization results, and incoming frames.

use crate::app::state::{AppModel, Message};
use crate::backends::camera::types::{CameraDevice, CameraFrame};
use crate::constants::scan;
use cosmic::Task;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Whether a new detection sample should be taken.
///
/// No sample while a decode is still in flight, and at most one per
/// detection interval otherwise.
fn sample_due(last_sample: Option<Instant>, decode_in_flight: bool) -> bool {
    if decode_in_flight {
        return false;
    }
    last_sample
        .map(|t| t.elapsed() >= scan::DETECTION_INTERVAL)
        .unwrap_or(true)
}

impl AppModel {
    pub(crate) fn handle_camera_frame(
        &mut self,
        frame: Arc<CameraFrame>,
    ) -> Task<cosmic::Action<Message>> {
        // Frames arriving after the preview was frozen for submission are
        // dropped so the captured frame stays on screen
        if !self.session.is_scanning() {
            debug!("Frame dropped (preview frozen)");
            return Task::none();
        }

        self.camera_error = None;
        self.preview = Some(cosmic::widget::image::Handle::from_rgba(
            frame.width,
            frame.height,
            frame.packed_rgba(),
        ));

        // Pin the sampled frame; the detection subscription keys on the
        // sample counter so the decode survives newer frames
        if sample_due(self.last_detection_time, self.pending_detection.is_some()) {
            self.last_detection_time = Some(Instant::now());
            self.detection_seq = self.detection_seq.wrapping_add(1);
            self.pending_detection = Some(Arc::clone(&frame));
        }

        self.current_frame = Some(frame);
        Task::none()
    }

    pub(crate) fn handle_cameras_initialized(
        &mut self,
        cameras: Vec<CameraDevice>,
        index: usize,
    ) -> Task<cosmic::Action<Message>> {
        info!(count = cameras.len(), index, "Cameras initialized");

        self.camera_dropdown_options = cameras.iter().map(|cam| cam.name.clone()).collect();
        self.available_cameras = cameras;
        self.current_camera_index = index.min(self.available_cameras.len().saturating_sub(1));
        self.cameras_initialized = true;

        if self.available_cameras.is_empty() {
            warn!("No cameras available");
            self.camera_error = Some("No camera found".to_string());
        }
        Task::none()
    }

    pub(crate) fn handle_select_camera(&mut self, index: usize) -> Task<cosmic::Action<Message>> {
        if index >= self.available_cameras.len() || index == self.current_camera_index {
            return Task::none();
        }
        info!(index, camera = %self.available_cameras[index].name, "Selected camera");

        // Cancel the running subscription loop; a fresh flag arms the next one
        self.camera_cancel_flag
            .store(true, std::sync::atomic::Ordering::Release);
        self.camera_cancel_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));

        self.current_camera_index = index;
        self.current_frame = None;
        self.preview = None;
        self.pending_detection = None;

        // Persist the selection
        if let Some(handler) = &self.config_handler {
            let path = self.available_cameras[index].path.clone();
            if let Err(err) = self
                .config
                .set_last_camera_path(handler, Some(path))
            {
                warn!(error = ?err, "Failed to save camera selection");
            }
        }
        Task::none()
    }

    pub(crate) fn handle_camera_unavailable(
        &mut self,
        error: String,
    ) -> Task<cosmic::Action<Message>> {
        warn!(error = %error, "Camera unavailable");
        self.camera_error = Some(error);
        Task::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_sample_is_due_immediately() {
        assert!(sample_due(None, false));
    }

    #[test]
    fn test_no_sample_while_decode_in_flight() {
        // A slow decode must finish before the next frame is sampled,
        // regardless of how much time has passed
        assert!(!sample_due(None, true));
        let long_ago = Instant::now() - 2 * scan::DETECTION_INTERVAL;
        assert!(!sample_due(Some(long_ago), true));
    }

    #[test]
    fn test_sampling_is_throttled_to_interval() {
        assert!(!sample_due(Some(Instant::now()), false));
        let elapsed = Instant::now() - scan::DETECTION_INTERVAL;
        assert!(sample_due(Some(elapsed), false));
    }
}
