// SPDX-License-Identifier: GPL-3.0-only

//! Hardware backends
//!
//! - [`camera`]: Camera backend with device enumeration and frame access

pub mod camera;
