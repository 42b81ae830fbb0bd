//! Direct mail dispatch handlers

pub mod send;
pub mod status;
