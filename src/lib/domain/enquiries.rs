//! Customer enquiries module.

mod enquiry;
mod errors;

pub use enquiry::{validate, Enquiry, EnquiryPayload};
pub use errors::EnquiryValidationError;
