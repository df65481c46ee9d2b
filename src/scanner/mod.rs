// SPDX-License-Identifier: GPL-3.0-only

//! Barcode scanning: UPC-A detection and scan session state

pub mod session;
pub mod upc;

pub use session::{ScanPhase, ScanSession};
pub use upc::{DetectedCode, UpcDetector};
