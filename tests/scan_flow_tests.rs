// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for the scan flow state machine

use comic_recapper::scanner::{DetectedCode, ScanPhase, ScanSession};

const CODE: &str = "012345678905";

#[test]
fn test_full_scan_cycle() {
    let mut session = ScanSession::default();
    assert!(session.is_scanning());

    // Noise from the decoder does not change the phase
    assert!(session.accept_detection("not-a-code").is_none());
    assert!(session.is_scanning());

    // A valid code starts a submission
    let code = session.accept_detection(CODE).expect("code accepted");
    assert_eq!(code, DetectedCode::parse(CODE).expect("valid code"));

    // The response message lands on screen
    let generation = session.generation();
    assert!(session.complete(generation, Ok("Scan recorded".to_string())));
    assert_eq!(
        session.phase(),
        &ScanPhase::Result {
            message: "Scan recorded".to_string()
        }
    );

    // Scan Again returns to live scanning
    session.reset();
    assert!(session.is_scanning());
}

#[test]
fn test_late_response_after_reset_is_ignored() {
    let mut session = ScanSession::default();
    session.accept_detection(CODE);
    let stale_generation = session.generation();

    // User hits Scan Again before the response arrives
    session.reset();

    assert!(!session.complete(stale_generation, Ok("Too late".to_string())));
    assert!(session.is_scanning());

    // A new attempt still works end to end
    session.accept_detection(CODE);
    assert!(session.complete(session.generation(), Err("Error sending data".to_string())));
    assert_eq!(
        session.phase(),
        &ScanPhase::Error {
            message: "Error sending data".to_string()
        }
    );
}

#[test]
fn test_duplicate_detections_do_not_resubmit() {
    let mut session = ScanSession::default();
    assert!(session.accept_detection(CODE).is_some());

    // The same barcode keeps being visible in later frames
    for _ in 0..5 {
        assert!(session.accept_detection(CODE).is_none());
    }
}
