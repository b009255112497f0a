// SPDX-License-Identifier: GPL-3.0-only

//! Message handler modules
//!
//! Handlers are grouped by the surface they act on. Each one is an
//! `impl AppModel` block called from the dispatcher in `update.rs`.

pub mod camera;
pub mod classify;
pub mod navigation;
pub mod search;
pub mod upload;
