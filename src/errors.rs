// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the classifier client
//!
//! Every condition is handled at the component boundary that raised it. The
//! only user-visible surfaces are the toast and the result modal, so each
//! error knows its toast kind and its user-facing message.

use crate::app::toast::ToastKind;
use crate::backends::camera::BackendError;
use crate::constants::messages;
use std::fmt;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, Clone)]
pub enum AppError {
    /// Input rejected locally, no network call made
    Validation(ValidationError),
    /// Camera hardware errors
    Camera(CameraError),
    /// Network exchange with the classifier failed
    Client(ClientError),
    /// Configuration errors
    Config(String),
    /// Storage/filesystem errors
    Storage(String),
}

/// Input validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Submission attempted with no file selected
    NoFileSelected,
    /// Selected file does not declare an image media type
    NotAnImage { media_type: String },
    /// Selected file exceeds the upload cap
    FileTooLarge { size: u64, limit: u64 },
    /// Search attempted with an empty query
    EmptyQuery,
    /// A classification request is already in flight
    RequestInFlight,
}

/// Camera-specific errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraError {
    /// Permission denied or device unavailable; carries the hardware message
    Unavailable(String),
    /// No session, or the session has not produced a sized frame yet
    NotReady,
    /// The grant arrived after the session was stopped or replaced
    Superseded,
    /// Frame could not be encoded
    EncodingFailed(String),
}

/// Transport-level failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Connection, DNS, TLS or I/O failure
    Network(String),
    /// Server answered with a non-success status
    Status(u16),
}

/// Errors from a classifier or search round-trip
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The request never produced a usable HTTP response
    Transport(TransportError),
    /// The response body was not the expected JSON
    Decode(String),
}

impl ValidationError {
    pub fn toast_kind(&self) -> ToastKind {
        match self {
            ValidationError::NoFileSelected => ToastKind::Warning,
            ValidationError::RequestInFlight => ToastKind::Info,
            _ => ToastKind::Error,
        }
    }

    /// Message shown to the user
    pub fn user_message(&self) -> String {
        match self {
            ValidationError::NoFileSelected => messages::SELECT_IMAGE_FIRST.to_string(),
            ValidationError::NotAnImage { .. } => messages::NOT_AN_IMAGE.to_string(),
            ValidationError::FileTooLarge { limit, .. } => {
                format!("Ukuran file Maksimal {}MB!", limit / (1024 * 1024))
            }
            ValidationError::EmptyQuery => messages::EMPTY_QUERY.to_string(),
            ValidationError::RequestInFlight => messages::REQUEST_IN_FLIGHT.to_string(),
        }
    }
}

impl CameraError {
    /// Message shown to the user
    pub fn user_message(&self) -> String {
        match self {
            CameraError::Unavailable(msg) => format!("{}{}", messages::CAMERA_FAILED_PREFIX, msg),
            CameraError::NotReady => messages::CAMERA_NOT_READY.to_string(),
            CameraError::Superseded => messages::CAMERA_OFF.to_string(),
            CameraError::EncodingFailed(msg) => format!("{}{}", messages::GENERIC_ERROR_PREFIX, msg),
        }
    }
}

impl ClientError {
    /// Message shown to the user
    pub fn user_message(&self) -> String {
        format!("{}{}", messages::GENERIC_ERROR_PREFIX, self)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(e) => write!(f, "Validation error: {}", e),
            AppError::Camera(e) => write!(f, "Camera error: {}", e),
            AppError::Client(e) => write!(f, "Classifier error: {}", e),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Storage(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NoFileSelected => write!(f, "No file selected"),
            ValidationError::NotAnImage { media_type } => {
                write!(f, "Not an image file (media type: {})", media_type)
            }
            ValidationError::FileTooLarge { size, limit } => {
                write!(f, "File is {} bytes, limit is {} bytes", size, limit)
            }
            ValidationError::EmptyQuery => write!(f, "Search query is empty"),
            ValidationError::RequestInFlight => write!(f, "A request is already in flight"),
        }
    }
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::Unavailable(msg) => write!(f, "Camera unavailable: {}", msg),
            CameraError::NotReady => write!(f, "Camera not ready"),
            CameraError::Superseded => write!(f, "Camera grant superseded"),
            CameraError::EncodingFailed(msg) => write!(f, "Encoding failed: {}", msg),
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Network(msg) => write!(f, "{}", msg),
            TransportError::Status(code) => {
                write!(f, "Network response was not ok (status {})", code)
            }
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Transport(e) => write!(f, "{}", e),
            ClientError::Decode(msg) => write!(f, "Invalid response: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for ValidationError {}
impl std::error::Error for CameraError {}
impl std::error::Error for TransportError {}
impl std::error::Error for ClientError {}

// Conversions from sub-errors to AppError
impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err)
    }
}

impl From<CameraError> for AppError {
    fn from(err: CameraError) -> Self {
        AppError::Camera(err)
    }
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        AppError::Client(err)
    }
}

impl From<TransportError> for ClientError {
    fn from(err: TransportError) -> Self {
        ClientError::Transport(err)
    }
}

impl From<BackendError> for CameraError {
    fn from(err: BackendError) -> Self {
        CameraError::Unavailable(err.to_string())
    }
}

// Conversions for I/O errors
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_too_large_message_uses_limit_in_mib() {
        let err = ValidationError::FileTooLarge {
            size: 11 * 1024 * 1024,
            limit: 10 * 1024 * 1024,
        };
        assert_eq!(err.user_message(), "Ukuran file Maksimal 10MB!");
        assert_eq!(err.toast_kind(), ToastKind::Error);
    }

    #[test]
    fn test_camera_message_carries_hardware_text() {
        let err = CameraError::Unavailable("Permission denied".to_string());
        assert!(err.user_message().ends_with("Permission denied"));
    }

    #[test]
    fn test_status_error_display() {
        let err = ClientError::from(TransportError::Status(502));
        assert!(err.to_string().contains("502"));
    }
}
