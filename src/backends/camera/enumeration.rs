// SPDX-License-Identifier: GPL-3.0-only

//! PipeWire camera enumeration
//!
//! Camera discovery goes through `pw-cli ls Node` when available. When
//! enumeration fails we still return a single auto-select device and let
//! PipeWire pick its default camera.

use super::types::CameraDevice;
use tracing::{debug, info, warn};

/// Enumerate cameras using PipeWire
pub fn enumerate_cameras() -> Vec<CameraDevice> {
    debug!("Attempting to enumerate cameras via PipeWire");

    if gstreamer::init().is_err() {
        warn!("GStreamer init failed");
        return Vec::new();
    }

    if gstreamer::ElementFactory::make("pipewiresrc")
        .build()
        .is_err()
    {
        warn!("pipewiresrc not available");
        return Vec::new();
    }

    if let Some(cameras) = try_enumerate_with_pw_cli() {
        debug!(count = cameras.len(), "Found PipeWire cameras");
        return cameras;
    }

    // Fallback: let PipeWire use its default camera
    info!("Using PipeWire auto-selection (default camera)");
    vec![CameraDevice::auto()]
}

/// Try to enumerate cameras using the pw-cli command
fn try_enumerate_with_pw_cli() -> Option<Vec<CameraDevice>> {
    let output = std::process::Command::new("pw-cli")
        .args(["ls", "Node"])
        .output()
        .ok()?;

    if !output.status.success() {
        debug!("pw-cli command failed");
        return None;
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let mut cameras = Vec::new();
    let mut current = NodeProps::default();

    for line in stdout.lines() {
        let trimmed = line.trim();

        // New node header, e.g. "id 76, type PipeWire:Interface:Node/3"
        if trimmed.starts_with("id ") && trimmed.contains("type PipeWire:Interface:Node") {
            if let Some(camera) = current.into_camera() {
                cameras.push(camera);
            }
            current = NodeProps::default();

            if let Some(id_str) = trimmed.strip_prefix("id ")
                && let Some(id_num) = id_str.split(',').next()
            {
                current.id = Some(id_num.trim().to_string());
            }
        }

        if trimmed.contains("media.class") && trimmed.contains("\"Video/Source\"") {
            current.is_video_source = true;
        }

        if trimmed.contains("object.serial")
            && let Some(value) = extract_quoted_value(trimmed)
        {
            current.serial = Some(value);
        }

        if trimmed.contains("node.description")
            && let Some(value) = extract_quoted_value(trimmed)
        {
            current.name = Some(value);
        }
    }

    // Don't forget the last node
    if let Some(camera) = current.into_camera() {
        cameras.push(camera);
    }

    if cameras.is_empty() {
        debug!("No cameras found via pw-cli");
        None
    } else {
        debug!(count = cameras.len(), "Enumerated cameras via pw-cli");
        Some(cameras)
    }
}

/// Properties collected while parsing one pw-cli node block
#[derive(Default)]
struct NodeProps {
    id: Option<String>,
    serial: Option<String>,
    name: Option<String>,
    is_video_source: bool,
}

impl NodeProps {
    fn into_camera(self) -> Option<CameraDevice> {
        if !self.is_video_source {
            return None;
        }
        let name = self.name?;
        // pipewiresrc target-object accepts the object serial; fall back to
        // the node ID when no serial was advertised
        let path = self.serial.clone().or_else(|| self.id.clone())?;
        debug!(name = %name, path = %path, "Found video camera");
        Some(CameraDevice {
            name,
            path,
            node_id: self.id,
        })
    }
}

/// Extract quoted value from a property line (e.g., 'property = "value"' -> "value")
fn extract_quoted_value(line: &str) -> Option<String> {
    let start = line.find('"')?;
    let end = line[start + 1..].find('"')?;
    Some(line[start + 1..start + 1 + end].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_quoted_value() {
        assert_eq!(
            extract_quoted_value("object.serial = \"2146\""),
            Some("2146".to_string())
        );
        assert_eq!(
            extract_quoted_value("node.description = \"Laptop Webcam\""),
            Some("Laptop Webcam".to_string())
        );
        assert_eq!(extract_quoted_value("no quotes here"), None);
    }

    #[test]
    fn test_node_props_requires_video_source() {
        let props = NodeProps {
            id: Some("42".to_string()),
            serial: Some("2146".to_string()),
            name: Some("Webcam".to_string()),
            is_video_source: false,
        };
        assert!(props.into_camera().is_none());
    }

    #[test]
    fn test_node_props_prefers_serial_over_id() {
        let props = NodeProps {
            id: Some("42".to_string()),
            serial: Some("2146".to_string()),
            name: Some("Webcam".to_string()),
            is_video_source: true,
        };
        let camera = props.into_camera().expect("video source with name");
        assert_eq!(camera.path, "2146");
        assert_eq!(camera.node_id.as_deref(), Some("42"));
    }
}
