// SPDX-License-Identifier: GPL-3.0-only

//! Comic Recapper - a UPC-A comic scanner for the COSMIC desktop environment
//!
//! Points a camera at a comic book's barcode, uploads the detected code plus
//! a captured frame to a recap backend, and displays the returned summary.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`app`]: Main application logic and UI
//! - [`backends`]: Camera capture via PipeWire/GStreamer
//! - [`scanner`]: UPC-A detection and the scan session state machine
//! - [`recap`]: Frame capture (JPEG) and the backend submission client
//! - [`config`]: User configuration handling

pub mod app;
pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod recap;
pub mod scanner;

// Re-export commonly used types
pub use app::{AppModel, Message};
pub use config::Config;
pub use scanner::{DetectedCode, ScanPhase, ScanSession};
