// SPDX-License-Identifier: GPL-3.0-only

//! Scan flow handlers
//!
//! Handles decoder results, capture and submission, and the scan reset.
//! The frame shown at detection time is the frame submitted; the camera is
//! released as soon as a code is accepted.

use crate::app::state::{AppModel, Message};
use crate::constants::scan;
use crate::recap::{FrameEncoder, RecapClient, capture};
use cosmic::Task;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

impl AppModel {
    pub(crate) fn handle_code_detected(
        &mut self,
        raw: Option<String>,
    ) -> Task<cosmic::Action<Message>> {
        // The decode for the pinned sample finished; the next frame past the
        // detection interval starts a new one
        self.pending_detection = None;

        let Some(raw) = raw else {
            return Task::none();
        };

        let Some(code) = self.session.accept_detection(&raw) else {
            return Task::none();
        };

        let Some(frame) = self.current_frame.clone() else {
            // Should not happen: detection ran on this frame. Treated as a
            // capture failure, recovered by the reset button.
            warn!("Code accepted but no frame available");
            let generation = self.session.generation();
            self.session
                .complete(generation, Err(scan::SUBMIT_ERROR_TEXT.to_string()));
            return Task::none();
        };

        // Release the camera while the submission is in flight. The
        // subscription also stops on its own since the phase left Scanning,
        // but raising the flag tears the pipeline down immediately.
        self.camera_cancel_flag
            .store(true, std::sync::atomic::Ordering::Release);
        self.camera_cancel_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));

        let generation = self.session.generation();
        let encoder = FrameEncoder::new(self.config.jpeg_quality);
        let client = RecapClient::new(self.config.recap_endpoint.clone());
        let save_frames = self.config.save_captured_frames;

        info!(code = %code, generation, "Starting submission");

        Task::perform(
            async move {
                let jpeg = match encoder.encode_jpeg((*frame).clone()).await {
                    Ok(jpeg) => jpeg,
                    Err(e) => {
                        error!(error = %e, "Frame encoding failed");
                        return Err(scan::SUBMIT_ERROR_TEXT.to_string());
                    }
                };

                if save_frames {
                    let dir = capture::default_save_dir();
                    if let Err(e) = capture::save_frame_copy(&jpeg, code.as_str(), &dir) {
                        // Local copies are best effort; the submission proceeds
                        warn!(error = %e, "Failed to save frame copy");
                    }
                }

                match client.submit(&code, jpeg).await {
                    Ok(message) => Ok(message),
                    Err(e) => {
                        error!(error = %e, "Submission failed");
                        Err(scan::SUBMIT_ERROR_TEXT.to_string())
                    }
                }
            },
            move |outcome| {
                cosmic::Action::App(Message::SubmitFinished {
                    generation,
                    outcome,
                })
            },
        )
    }

    pub(crate) fn handle_submit_finished(
        &mut self,
        generation: u64,
        outcome: Result<String, String>,
    ) -> Task<cosmic::Action<Message>> {
        if !self.session.complete(generation, outcome) {
            debug!(generation, "Ignored stale submission outcome");
        }
        Task::none()
    }

    pub(crate) fn handle_scan_again(&mut self) -> Task<cosmic::Action<Message>> {
        info!("Returning to live scanning");
        self.session.reset();
        self.current_frame = None;
        self.preview = None;
        self.pending_detection = None;
        self.last_detection_time = None;
        Task::none()
    }
}
