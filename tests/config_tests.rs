// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for configuration module

use comic_recapper::Config;

#[test]
fn test_config_default() {
    // Test that default config can be created
    let config = Config::default();

    // Check sensible defaults
    assert_eq!(
        config.recap_endpoint, "http://localhost:5000/recap",
        "Default endpoint should target the local recap service"
    );
    assert!(
        config.last_camera_path.is_none(),
        "No camera should be remembered on first run"
    );
}

#[test]
fn test_config_jpeg_quality_in_range() {
    let config = Config::default();
    assert!(
        (1..=100).contains(&config.jpeg_quality),
        "JPEG quality should be a valid percentage"
    );
}

#[test]
fn test_config_save_frames_off_by_default() {
    let config = Config::default();
    assert!(
        !config.save_captured_frames,
        "Frame copies should be opt-in"
    );
}
