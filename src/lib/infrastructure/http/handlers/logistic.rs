//! Logistic enquiry handlers

pub mod enquiry;
pub mod info;
