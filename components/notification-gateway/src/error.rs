/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Error handling for the component.
//!
//! `Error` is what the Rust code passes around internally. `NotificationGatewayApiError` is what
//! crosses the FFI, both as the error our foreign collaborators return to us and as the result of
//! converting an internal error. Nothing in the public API hands an error back to the host; see
//! `handling.rs` for how errors are logged instead.

use crate::handling::{convert_log_report_error, ErrorHandling, GetErrorHandling};

/// Result type for internal errors.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Result type for public errors, returned by the foreign collaborator traits.
pub type ApiResult<T> = std::result::Result<T, NotificationGatewayApiError>;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error, uniffi::Error)]
pub enum NotificationGatewayApiError {
    /// The push provider SDK failed, usually because the network is unavailable.
    #[error("Push SDK error: {reason}")]
    Sdk { reason: String },

    /// Reading or writing persisted application state failed.
    #[error("Persisted state error: {reason}")]
    Storage { reason: String },

    #[error("Notification gateway error: {reason}")]
    Other { reason: String },
}

/// Unexpected errors when invoking foreign implementations of our traits become `Other`.
impl From<uniffi::UnexpectedUniFFICallbackError> for NotificationGatewayApiError {
    fn from(error: uniffi::UnexpectedUniFFICallbackError) -> Self {
        NotificationGatewayApiError::Other {
            reason: error.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Payload is not gzip compressed")]
    NotGzip,

    #[error("Error decompressing payload: {0}")]
    Decompress(#[from] std::io::Error),

    #[error("Payload JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Payload is not a JSON object")]
    NotAnObject,

    #[error("Notification payload could not be decoded")]
    MalformedPayload,

    #[error("Notification data is missing `{0}`")]
    MissingField(&'static str),

    #[error("Push SDK call failed: {0}")]
    Sdk(NotificationGatewayApiError),

    #[error("Persisted state access failed: {0}")]
    Storage(NotificationGatewayApiError),

    #[error("Applying updates reliably failed: {0}")]
    UpdateApplication(NotificationGatewayApiError),

    #[error("Applying updates reliably did not settle within {0}ms")]
    UpdateTimeout(u64),

    #[error("Navigation failed: {0}")]
    Navigation(NotificationGatewayApiError),

    #[error("Finishing background processing failed: {0}")]
    BackgroundBridge(NotificationGatewayApiError),
}

impl GetErrorHandling for Error {
    type ExternalError = NotificationGatewayApiError;

    fn get_error_handling(&self) -> ErrorHandling<Self::ExternalError> {
        match self {
            // Malformed payloads and missing fields are expected from older servers; they end
            // as silent no-ops.
            Self::Base64(_)
            | Self::NotGzip
            | Self::Decompress(_)
            | Self::Json(_)
            | Self::NotAnObject
            | Self::MissingField(_) => ErrorHandling::convert(NotificationGatewayApiError::Other {
                reason: self.to_string(),
            })
            .log_info(),
            Self::MalformedPayload => ErrorHandling::convert(NotificationGatewayApiError::Other {
                reason: self.to_string(),
            })
            .log_warning(),
            Self::Sdk(e) | Self::Storage(e) | Self::BackgroundBridge(e) => {
                ErrorHandling::convert(e.clone()).log_warning()
            }
            Self::UpdateApplication(_) | Self::UpdateTimeout(_) => {
                ErrorHandling::convert(NotificationGatewayApiError::Other {
                    reason: self.to_string(),
                })
                .report_error("notification-gateway-update-application")
            }
            Self::Navigation(_) => ErrorHandling::convert(NotificationGatewayApiError::Other {
                reason: self.to_string(),
            })
            .report_error("notification-gateway-navigation"),
        }
    }
}

/// Log/report an error that ends the current operation.
pub(crate) fn handle_error(e: Error) {
    let _: NotificationGatewayApiError = convert_log_report_error(e);
}
