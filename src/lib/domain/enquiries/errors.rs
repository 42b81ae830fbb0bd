//! Enquiry validation errors

use thiserror::Error;

/// Reasons an enquiry is rejected. Checked in declaration order; the first failure wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EnquiryValidationError {
    /// No payload was submitted
    #[error("request body required")]
    MissingBody,

    /// At least one of the six fields is absent or blank
    #[error("all fields are required")]
    MissingFields,

    /// The email address is malformed
    #[error("invalid email")]
    InvalidEmail,

    /// The phone number has too few or too many digits
    #[error("invalid phone number")]
    InvalidPhoneNumber,
}
