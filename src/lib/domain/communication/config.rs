//! Mail configuration

use std::{fmt, time::Duration};

use clap::{ArgAction, Parser, ValueEnum};

use super::DispatchError;

/// How notifications leave the process
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum MailTransport {
    /// An authenticated SMTP session
    #[default]
    Smtp,

    /// The SendGrid v3 HTTP API
    #[value(name = "sendgrid")]
    SendGrid,
}

/// Mail configuration, loaded once at startup
#[derive(Clone, Parser)]
pub struct MailConfig {
    /// The transport used to deliver notifications
    #[arg(long = "mail-transport", env = "MAIL_TRANSPORT", value_enum, default_value_t)]
    pub transport: MailTransport,

    /// The SMTP host
    #[arg(long = "mail-host", env = "MAIL_HOST", default_value = "smtp.sendgrid.net")]
    pub host: String,

    /// The SMTP port
    #[arg(long = "mail-port", env = "MAIL_PORT", default_value_t = 587)]
    pub port: u16,

    /// The SMTP username
    #[arg(long = "mail-username", env = "MAIL_USERNAME", default_value = "")]
    pub username: String,

    /// The SMTP password, or the provider API key
    #[arg(
        long = "mail-password",
        env = "MAIL_PASSWORD",
        default_value = "",
        hide_env_values = true,
        hide_default_value = true
    )]
    pub secret_credential: String,

    /// Upgrade the connection with STARTTLS when the server offers it
    #[arg(long = "mail-starttls", env = "MAIL_STARTTLS", default_value_t = true, action = ArgAction::Set)]
    pub use_starttls: bool,

    /// Refuse to continue when the server does not offer STARTTLS
    #[arg(long = "mail-starttls-required", env = "MAIL_STARTTLS_REQUIRED", default_value_t = false, action = ArgAction::Set)]
    pub require_starttls: bool,

    /// Authenticate with the SMTP server
    #[arg(long = "mail-auth", env = "MAIL_AUTH", default_value_t = true, action = ArgAction::Set)]
    pub require_auth: bool,

    /// Whitespace-separated hosts whose TLS certificates are trusted without
    /// verification, or `*` for any host
    #[arg(long = "mail-ssl-trust", env = "MAIL_SSL_TRUST")]
    pub trusted_ssl_host: Option<String>,

    /// Log every step of the SMTP session
    #[arg(long = "mail-debug", env = "MAIL_DEBUG", default_value_t = false, action = ArgAction::Set)]
    pub debug_logging: bool,

    /// The sender address
    #[arg(long = "mail-from", env = "MAIL_FROM")]
    pub from_address: Option<String>,

    /// The sender address used when `--mail-from` is not set
    #[arg(long = "mail-default-from", env = "MAIL_DEFAULT_FROM")]
    pub default_from_address: Option<String>,

    /// The operational address receiving enquiry notifications
    #[arg(
        long = "mail-to",
        env = "ENQUIRY_NOTIFICATION_RECIPIENT",
        default_value = "contact@sparta.com"
    )]
    pub to_address: String,

    /// Connect and read timeout, in seconds
    #[arg(long = "mail-timeout", env = "MAIL_TIMEOUT", default_value_t = 30)]
    pub timeout_secs: u64,

    /// The SendGrid mail send endpoint
    #[arg(
        long = "sendgrid-endpoint",
        env = "SENDGRID_ENDPOINT",
        default_value = "https://api.sendgrid.com/v3/mail/send"
    )]
    pub sendgrid_endpoint: String,

    /// The SendGrid endpoint used to check the API key
    #[arg(
        long = "sendgrid-check-endpoint",
        env = "SENDGRID_CHECK_ENDPOINT",
        default_value = "https://api.sendgrid.com/v3/scopes"
    )]
    pub sendgrid_check_endpoint: String,
}

impl MailConfig {
    /// The envelope sender: `from_address`, then `default_from_address`, then `username`.
    pub fn sender(&self) -> &str {
        [&self.from_address, &self.default_from_address]
            .into_iter()
            .flatten()
            .map(|address| address.trim())
            .find(|address| !address.is_empty())
            .unwrap_or(self.username.as_str())
    }

    /// Fails when the username or the secret credential is missing.
    pub fn ensure_credentials(&self) -> Result<(), DispatchError> {
        if self.username.is_empty() {
            return Err(DispatchError::ConfigInvalid(
                "mail username is empty".to_string(),
            ));
        }

        if self.secret_credential.is_empty() {
            return Err(DispatchError::ConfigInvalid(
                "mail password / API key is empty".to_string(),
            ));
        }

        Ok(())
    }

    /// The connect and read timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Whether the configured host's certificate is trusted without verification
    pub fn trusts_host(&self) -> bool {
        self.trusted_ssl_host.as_deref().is_some_and(|trusted| {
            trusted
                .split_whitespace()
                .any(|host| host == "*" || host.eq_ignore_ascii_case(&self.host))
        })
    }

    /// Masks the secret credential wherever it appears in `text`.
    pub fn redact(&self, text: &str) -> String {
        if self.secret_credential.is_empty() {
            text.to_string()
        } else {
            text.replace(&self.secret_credential, "********")
        }
    }
}

impl fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailConfig")
            .field("transport", &self.transport)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("secret_credential", &"********")
            .field("use_starttls", &self.use_starttls)
            .field("require_starttls", &self.require_starttls)
            .field("require_auth", &self.require_auth)
            .field("trusted_ssl_host", &self.trusted_ssl_host)
            .field("debug_logging", &self.debug_logging)
            .field("from_address", &self.from_address)
            .field("default_from_address", &self.default_from_address)
            .field("to_address", &self.to_address)
            .field("timeout_secs", &self.timeout_secs)
            .field("sendgrid_endpoint", &self.sendgrid_endpoint)
            .field("sendgrid_check_endpoint", &self.sendgrid_check_endpoint)
            .finish()
    }
}
