// SPDX-License-Identifier: GPL-3.0-only

//! Frame capture and submission to the recap service

pub mod capture;
pub mod client;

pub use capture::FrameEncoder;
pub use client::RecapClient;
