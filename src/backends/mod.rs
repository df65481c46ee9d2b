// SPDX-License-Identifier: GPL-3.0-only

//! Backend abstractions for device access

pub mod camera;
