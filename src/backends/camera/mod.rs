// SPDX-License-Identifier: GPL-3.0-only

//! Camera capture backend (PipeWire via GStreamer)

pub mod enumeration;
pub mod pipeline;
pub mod types;

pub use enumeration::enumerate_cameras;
pub use pipeline::PreviewPipeline;
