//! Notification mail: configuration, composition and the mailer interface

mod config;
mod errors;
mod mailer;
mod message;

pub use config::{MailConfig, MailTransport};
pub use errors::DispatchError;
pub use mailer::Mailer;
pub use message::OutboundMessage;

#[cfg(test)]
pub mod tests {
    pub use super::config::tests::test_config;
    pub use super::mailer::MockMailer;
}
