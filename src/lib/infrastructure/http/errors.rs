//! API error-handling module

use std::fmt;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use utoipa::ToSchema;

use crate::domain::{communication::DispatchError, enquiries::EnquiryValidationError};

/// An error response
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Always `"error"`
    #[schema(example = "error")]
    pub status: String,

    /// The error message
    #[schema(example = "Mail server unavailable or failed: connection refused")]
    pub message: String,
}

/// How an [`ApiError`] is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorFormat {
    /// An [`ErrorResponse`] JSON object
    Json,

    /// The bare message as `text/plain`
    PlainText,
}

/// An error raised in the API
#[derive(Debug)]
pub struct ApiError {
    /// The status code
    pub status: StatusCode,

    /// The error message
    pub message: String,

    /// The body format
    pub format: ErrorFormat,
}

impl ApiError {
    /// Create a new API error
    pub fn new(status: StatusCode, message: &str) -> Self {
        Self {
            status,
            message: message.to_string(),
            format: ErrorFormat::Json,
        }
    }

    /// Create a new bad request error
    pub fn new_400(message: &str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Create a new unauthorized error
    pub fn new_401(message: &str) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    /// Create new internal server error
    pub fn new_500(message: &str) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Create a new service unavailable error
    pub fn new_503(message: &str) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }

    /// Render this error as plain text instead of JSON
    pub fn plain_text(self) -> Self {
        Self {
            format: ErrorFormat::PlainText,
            ..self
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.format {
            ErrorFormat::Json => (
                self.status,
                Json(ErrorResponse {
                    status: "error".to_string(),
                    message: self.message,
                }),
            )
                .into_response(),
            ErrorFormat::PlainText => (self.status, self.message).into_response(),
        }
    }
}

impl From<EnquiryValidationError> for ApiError {
    fn from(err: EnquiryValidationError) -> Self {
        ApiError::new_400(&err.to_string()).plain_text()
    }
}

impl From<DispatchError> for ApiError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::ConfigInvalid(detail) => {
                error!("mail is misconfigured: {detail}");

                ApiError::new_500("Mail service is not configured correctly.")
            }
            DispatchError::AuthFailed(detail) => {
                warn!("mail server rejected the credentials: {detail}");

                ApiError::new_401(&format!(
                    "SMTP authentication failed. Verify username/API key and that the credential is active. {detail}"
                ))
            }
            DispatchError::TransportUnavailable(detail) => {
                warn!("mail server unavailable: {detail}");

                ApiError::new_503(&format!("Mail server unavailable or failed: {detail}"))
            }
            DispatchError::UnknownFailure(err) => {
                error!("unexpected error while sending mail: {err:?}");

                ApiError::new_500("Unexpected error while sending mail.")
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::new(rejection.status(), &rejection.body_text()).plain_text()
    }
}
