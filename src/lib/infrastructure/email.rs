//! Mail transports

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use crate::domain::communication::{
    DispatchError, MailConfig, MailTransport, Mailer, OutboundMessage,
};

pub mod sendgrid;
pub mod smtp;

pub use sendgrid::SendGridMailer;
pub use smtp::SMTPMailer;

/// The mailer selected by the `transport` setting
#[derive(Debug, Clone)]
pub enum ConfiguredMailer {
    /// Authenticated SMTP session
    Smtp(SMTPMailer),

    /// SendGrid HTTP API
    SendGrid(SendGridMailer),
}

impl ConfiguredMailer {
    /// Builds the mailer for `config.transport`.
    pub fn new(config: Arc<MailConfig>) -> Result<Self> {
        debug!("using {:?} mail transport", config.transport);

        Ok(match config.transport {
            MailTransport::Smtp => Self::Smtp(SMTPMailer::new(config)),
            MailTransport::SendGrid => Self::SendGrid(SendGridMailer::new(config)?),
        })
    }
}

/// Checks that the configured sender and recipient are valid mailboxes.
///
/// With the SendGrid SMTP relay the username is `apikey`, so the sender must be set
/// explicitly.
pub fn check_addresses(config: &MailConfig) -> Result<(), DispatchError> {
    smtp::mailbox(config.sender(), "sender")?;
    smtp::mailbox(&config.to_address, "recipient")?;

    Ok(())
}

#[async_trait]
impl Mailer for ConfiguredMailer {
    async fn send(&self, message: &OutboundMessage) -> Result<(), DispatchError> {
        match self {
            Self::Smtp(mailer) => mailer.send(message).await,
            Self::SendGrid(mailer) => mailer.send(message).await,
        }
    }

    async fn check_connection(&self) -> Result<(), DispatchError> {
        match self {
            Self::Smtp(mailer) => mailer.check_connection().await,
            Self::SendGrid(mailer) => mailer.check_connection().await,
        }
    }
}
