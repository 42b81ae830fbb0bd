//! SendGrid HTTP API mailer

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Serialize;
use tracing::info;

use crate::domain::communication::{DispatchError, MailConfig, Mailer, OutboundMessage};

#[derive(Debug, Serialize)]
struct Address<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct Personalization<'a> {
    to: [Address<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    value: &'a str,
}

/// Body of a v3 `mail/send` request
#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    personalizations: [Personalization<'a>; 1],
    from: Address<'a>,
    subject: &'a str,
    content: [Content<'a>; 1],
}

impl<'a> From<&'a OutboundMessage> for SendRequest<'a> {
    fn from(message: &'a OutboundMessage) -> Self {
        Self {
            personalizations: [Personalization {
                to: [Address { email: &message.to }],
            }],
            from: Address {
                email: &message.from,
            },
            subject: &message.subject,
            content: [Content {
                kind: "text/plain",
                value: &message.body,
            }],
        }
    }
}

/// Mailer posting to the SendGrid HTTP API
///
/// The provider does not tell credential problems apart from delivery problems, so every
/// failure after the credential check is reported as [`DispatchError::UnknownFailure`].
/// [`Mailer::check_connection`] asks the scopes endpoint whether the API key is accepted.
#[derive(Debug, Clone)]
pub struct SendGridMailer {
    config: Arc<MailConfig>,
    client: Client,
}

impl SendGridMailer {
    /// Create a new SendGrid mailer
    pub fn new(config: Arc<MailConfig>) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self { config, client })
    }

    async fn ensure_success(&self, response: Response) -> Result<(), DispatchError> {
        let status = response.status();

        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();

        Err(anyhow!(
            "SendGrid responded with {status}: {}",
            self.config.redact(&body)
        )
        .into())
    }
}

#[async_trait]
impl Mailer for SendGridMailer {
    async fn send(&self, message: &OutboundMessage) -> Result<(), DispatchError> {
        self.config.ensure_credentials()?;

        let response = self
            .client
            .post(&self.config.sendgrid_endpoint)
            .bearer_auth(&self.config.secret_credential)
            .json(&SendRequest::from(message))
            .send()
            .await
            .context("failed to reach SendGrid")?;

        self.ensure_success(response).await?;

        info!(to = %message.to, "enquiry notification sent through SendGrid");

        Ok(())
    }

    async fn check_connection(&self) -> Result<(), DispatchError> {
        self.config.ensure_credentials()?;

        let response = self
            .client
            .get(&self.config.sendgrid_check_endpoint)
            .bearer_auth(&self.config.secret_credential)
            .send()
            .await
            .context("failed to reach SendGrid")?;

        self.ensure_success(response).await
    }
}
