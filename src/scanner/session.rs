// SPDX-License-Identifier: GPL-3.0-only

//! Scan session state machine
//!
//! One session drives the whole scan flow: live scanning, submission in
//! flight, and a terminal result or error screen. A generation counter ties
//! async submissions to the scan attempt that started them so that completions
//! arriving after a reset are discarded.

use super::upc::DetectedCode;
use tracing::{debug, info};

/// Phase of the current scan attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanPhase {
    /// Camera running, frames being analyzed
    Scanning,
    /// A code was accepted and the upload is in flight
    Submitting { code: DetectedCode },
    /// Server responded; message is shown to the user
    Result { message: String },
    /// Submission failed; message is shown to the user
    Error { message: String },
}

/// Owns the scan flow state for one window
#[derive(Debug)]
pub struct ScanSession {
    phase: ScanPhase,
    generation: u64,
}

impl Default for ScanSession {
    fn default() -> Self {
        Self {
            phase: ScanPhase::Scanning,
            generation: 0,
        }
    }
}

impl ScanSession {
    pub fn phase(&self) -> &ScanPhase {
        &self.phase
    }

    /// Generation of the current scan attempt, bumped on every reset
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_scanning(&self) -> bool {
        matches!(self.phase, ScanPhase::Scanning)
    }

    /// Offer a raw decoder result to the session.
    ///
    /// Returns the validated code when the session was scanning and the text
    /// is a well-formed UPC-A; the session then moves to `Submitting`. In any
    /// other phase detections are ignored, so one scan attempt produces at
    /// most one submission.
    pub fn accept_detection(&mut self, raw: &str) -> Option<DetectedCode> {
        if !self.is_scanning() {
            debug!(phase = ?self.phase, "Detection ignored outside scanning phase");
            return None;
        }

        let code = match DetectedCode::parse(raw) {
            Some(code) => code,
            None => {
                debug!(raw = %raw, "Rejected non-UPC-A decoder result");
                return None;
            }
        };

        info!(code = %code, "Accepted UPC-A code");
        self.phase = ScanPhase::Submitting { code: code.clone() };
        Some(code)
    }

    /// Record the outcome of a submission started in `generation`.
    ///
    /// Stale completions (a reset happened while the request was in flight)
    /// are discarded. Returns whether the outcome was applied.
    pub fn complete(&mut self, generation: u64, outcome: Result<String, String>) -> bool {
        if generation != self.generation {
            debug!(
                stale = generation,
                current = self.generation,
                "Discarding stale submission outcome"
            );
            return false;
        }
        if !matches!(self.phase, ScanPhase::Submitting { .. }) {
            debug!(phase = ?self.phase, "Submission outcome without submission in flight");
            return false;
        }

        self.phase = match outcome {
            Ok(message) => {
                info!(message = %message, "Submission succeeded");
                ScanPhase::Result { message }
            }
            Err(message) => {
                info!(message = %message, "Submission failed");
                ScanPhase::Error { message }
            }
        };
        true
    }

    /// Return to live scanning and invalidate any in-flight submission.
    ///
    /// A reset while already scanning is a no-op so the camera keeps running.
    pub fn reset(&mut self) {
        if self.is_scanning() {
            return;
        }
        self.generation += 1;
        self.phase = ScanPhase::Scanning;
        debug!(generation = self.generation, "Session reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CODE: &str = "036000291452";

    #[test]
    fn test_detection_moves_to_submitting() {
        let mut session = ScanSession::default();
        let code = session.accept_detection(CODE).expect("valid code accepted");
        assert_eq!(code.as_str(), CODE);
        assert!(matches!(session.phase(), ScanPhase::Submitting { .. }));
    }

    #[test]
    fn test_invalid_codes_leave_session_scanning() {
        let mut session = ScanSession::default();
        assert!(session.accept_detection("12345").is_none());
        assert!(session.accept_detection("03600029145x").is_none());
        assert!(session.is_scanning());
    }

    #[test]
    fn test_at_most_one_submission_per_attempt() {
        let mut session = ScanSession::default();
        assert!(session.accept_detection(CODE).is_some());
        // Further detections while submitting or showing a result are ignored
        assert!(session.accept_detection(CODE).is_none());
        assert!(session.complete(0, Ok("Thanks".to_string())));
        assert!(session.accept_detection(CODE).is_none());
    }

    #[test]
    fn test_success_and_failure_outcomes() {
        let mut session = ScanSession::default();
        session.accept_detection(CODE);
        assert!(session.complete(0, Ok("Recorded".to_string())));
        assert_eq!(
            session.phase(),
            &ScanPhase::Result {
                message: "Recorded".to_string()
            }
        );

        session.reset();
        session.accept_detection(CODE);
        assert!(session.complete(1, Err("Error sending data".to_string())));
        assert_eq!(
            session.phase(),
            &ScanPhase::Error {
                message: "Error sending data".to_string()
            }
        );
    }

    #[test]
    fn test_stale_generation_discarded() {
        let mut session = ScanSession::default();
        session.accept_detection(CODE);
        session.reset();
        // Outcome from before the reset must not leave the scanning phase
        assert!(!session.complete(0, Ok("Late".to_string())));
        assert!(session.is_scanning());
    }

    #[test]
    fn test_reset_bumps_generation_and_rescans() {
        let mut session = ScanSession::default();
        assert_eq!(session.generation(), 0);
        session.accept_detection(CODE);
        session.reset();
        assert_eq!(session.generation(), 1);
        assert!(session.is_scanning());
        // A fresh attempt accepts a new detection
        assert!(session.accept_detection(CODE).is_some());
    }

    #[test]
    fn test_capture_failure_locks_session_until_reset() {
        let mut session = ScanSession::default();
        session.accept_detection(CODE);

        // Capture failed before any request went out
        assert!(session.complete(
            session.generation(),
            Err("Error sending data".to_string())
        ));
        assert_eq!(
            session.phase(),
            &ScanPhase::Error {
                message: "Error sending data".to_string()
            }
        );

        // Stays stopped: further detections are ignored until a manual reset
        assert!(session.accept_detection(CODE).is_none());
        session.reset();
        assert!(session.is_scanning());
    }

    #[test]
    fn test_reset_while_scanning_is_noop() {
        let mut session = ScanSession::default();
        session.reset();
        assert_eq!(session.generation(), 0);
        assert!(session.is_scanning());
    }

    #[test]
    fn test_outcome_without_submission_ignored() {
        let mut session = ScanSession::default();
        assert!(!session.complete(0, Ok("Unexpected".to_string())));
        assert!(session.is_scanning());
    }
}
