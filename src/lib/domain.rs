//! Domain logic: enquiries and the notification mail they trigger

pub mod communication;
pub mod enquiries;
