// SPDX-License-Identifier: GPL-3.0-only

//! Message handlers organized by functional domain

mod camera;
mod scan;
mod ui;
