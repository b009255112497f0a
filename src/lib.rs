// SPDX-License-Identifier: GPL-3.0-only

//! Petal - a terminal client for a flower classification service
//!
//! Photos come from a file or the live camera, go to the classifier, and
//! come back as a result modal. A keyword search over the flower catalogue
//! sits alongside.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`app`]: Application state, message handling and the workflow
//! - [`backends`]: Camera backend abstraction
//! - [`classifier`]: HTTP client for upload, capture and search
//! - [`media`]: JPEG encoding, data URIs and thumbnails
//! - [`config`]: User configuration handling
//! - [`terminal`]: ratatui front end
//!
//! # Example
//!
//! ```ignore
//! // Interactive UI:
//! // petal
//! // One-shot classification:
//! // petal classify mawar.jpg
//! ```

pub mod app;
pub mod backends;
pub mod classifier;
pub mod config;
pub mod constants;
pub mod errors;
pub mod media;
pub mod terminal;

// Re-export commonly used types
pub use app::{AppModel, Message, Page};
pub use classifier::ClassificationOutcome;
pub use config::Config;
