// SPDX-License-Identifier: GPL-3.0-only

//! Remote classifier contract
//!
//! - [`transport`]: the HTTP seam (`reqwest`-backed)
//! - [`client`]: upload and capture submission with the in-flight guard
//! - [`search`]: keyword search
//! - [`response`]: payload model and outcome classification

pub mod client;
pub mod response;
pub mod search;
pub mod transport;

pub use client::{ClassificationClient, PendingRequest};
pub use response::{
    ClassificationOutcome, ClassifyPayload, FailureOutcome, FlowerMetadata, LowConfidenceOutcome,
    QualityInfo, SearchPayload, SearchResult, SuccessOutcome,
};
pub use search::{PendingSearch, SearchClient};
pub use transport::{HttpReply, HttpTransport, RequestBody, Transport};
#[cfg(test)]
pub(crate) use transport::scripted::ScriptedTransport;

use crate::app::upload_zone::PendingUpload;

/// Where the classified image came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    /// File picked or dropped into the upload zone
    Upload,
    /// Frame captured from the live camera
    Capture,
}

impl RequestKind {
    /// Parse the `mode` field of a response
    pub fn from_mode(mode: &str) -> Option<Self> {
        match mode {
            "upload" => Some(RequestKind::Upload),
            "camera" | "capture" => Some(RequestKind::Capture),
            _ => None,
        }
    }

    pub fn is_camera(&self) -> bool {
        matches!(self, RequestKind::Capture)
    }
}

/// A submission to the classifier
#[derive(Debug, Clone, PartialEq)]
pub enum ClassificationRequest {
    Upload(PendingUpload),
    Capture { image_data_uri: String },
}

impl ClassificationRequest {
    pub fn kind(&self) -> RequestKind {
        match self {
            ClassificationRequest::Upload(_) => RequestKind::Upload,
            ClassificationRequest::Capture { .. } => RequestKind::Capture,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parsing() {
        assert_eq!(RequestKind::from_mode("camera"), Some(RequestKind::Capture));
        assert_eq!(RequestKind::from_mode("upload"), Some(RequestKind::Upload));
        assert_eq!(RequestKind::from_mode("video"), None);
    }
}
