// SPDX-License-Identifier: GPL-3.0-only

//! Upload and capture submission
//!
//! Submitting is two-phase. `begin_upload`/`begin_capture` run the local
//! checks synchronously and, if they pass, take the in-flight slot and return
//! a [`PendingRequest`]. `PendingRequest::send` performs the exchange. The
//! slot is released when the pending request is dropped, whether it was sent,
//! completed, failed or abandoned.

use super::response::ClassifyPayload;
use super::transport::{RequestBody, Transport};
use super::{ClassificationRequest, RequestKind};
use crate::app::upload_zone::PendingUpload;
use crate::config::Config;
use crate::constants::endpoints;
use crate::errors::{ClientError, TransportError, ValidationError};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

/// Holds the in-flight slot; releases it on drop
#[derive(Debug)]
struct InFlightGuard {
    flag: Arc<AtomicBool>,
}

impl InFlightGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self {
                flag: Arc::clone(flag),
            })
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

pub struct ClassificationClient {
    transport: Arc<dyn Transport>,
    upload_url: String,
    capture_url: String,
    max_upload_bytes: u64,
    in_flight: Arc<AtomicBool>,
}

impl ClassificationClient {
    pub fn new(transport: Arc<dyn Transport>, config: &Config) -> Self {
        Self {
            transport,
            upload_url: config.endpoint(endpoints::UPLOAD),
            capture_url: config.endpoint(endpoints::CAPTURE),
            max_upload_bytes: config.max_upload_bytes,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether a submission is currently in flight
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Prepare a multipart upload of the selected file
    ///
    /// Fails without touching the network when nothing is selected, when the
    /// file exceeds the cap, or when another submission is in flight.
    pub fn begin_upload(
        &self,
        file: Option<&PendingUpload>,
    ) -> Result<PendingRequest, ValidationError> {
        let file = file.ok_or(ValidationError::NoFileSelected)?;
        let size = file.size();
        if size > self.max_upload_bytes {
            return Err(ValidationError::FileTooLarge {
                size,
                limit: self.max_upload_bytes,
            });
        }
        self.begin(
            ClassificationRequest::Upload(file.clone()),
            self.upload_url.clone(),
        )
    }

    /// Prepare a JSON submission of a captured frame
    pub fn begin_capture(&self, image_data_uri: String) -> Result<PendingRequest, ValidationError> {
        self.begin(
            ClassificationRequest::Capture { image_data_uri },
            self.capture_url.clone(),
        )
    }

    fn begin(
        &self,
        request: ClassificationRequest,
        url: String,
    ) -> Result<PendingRequest, ValidationError> {
        let guard = InFlightGuard::acquire(&self.in_flight).ok_or_else(|| {
            debug!(kind = ?request.kind(), "Submission rejected, request in flight");
            ValidationError::RequestInFlight
        })?;
        Ok(PendingRequest {
            transport: Arc::clone(&self.transport),
            url,
            request,
            _guard: guard,
        })
    }
}

/// A submission that passed local checks and owns the in-flight slot
pub struct PendingRequest {
    transport: Arc<dyn Transport>,
    url: String,
    request: ClassificationRequest,
    _guard: InFlightGuard,
}

impl PendingRequest {
    pub fn kind(&self) -> RequestKind {
        self.request.kind()
    }

    /// Perform the exchange
    ///
    /// Transport failures and non-2xx statuses are errors. Any parsed body,
    /// including `success=false`, is returned as-is for the presenter to
    /// classify.
    pub async fn send(self) -> Result<ClassifyPayload, ClientError> {
        let kind = self.request.kind();
        let body = match &self.request {
            ClassificationRequest::Upload(file) => RequestBody::Multipart {
                field: endpoints::UPLOAD_FIELD,
                file_name: file.name.clone(),
                media_type: file.media_type.clone(),
                bytes: Arc::clone(&file.bytes),
            },
            ClassificationRequest::Capture { image_data_uri } => {
                RequestBody::Json(serde_json::json!({ "image": image_data_uri }))
            }
        };

        info!(?kind, url = %self.url, "Submitting image for classification");
        let reply = self.transport.post(self.url.clone(), body).await?;
        if !reply.is_success() {
            warn!(?kind, status = reply.status, "Classifier returned error status");
            return Err(TransportError::Status(reply.status).into());
        }

        let payload: ClassifyPayload = serde_json::from_slice(&reply.body)
            .map_err(|e| ClientError::Decode(e.to_string()))?;
        debug!(
            ?kind,
            success = payload.success,
            is_flower = ?payload.is_flower,
            "Classification response parsed"
        );
        Ok(payload)
    }
}
