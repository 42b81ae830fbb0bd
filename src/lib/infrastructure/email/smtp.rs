//! SMTP mailer implementation

use std::{
    fmt,
    ops::{Deref, DerefMut},
    sync::Arc,
};

use anyhow::Context;
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::{
        authentication::{Credentials, DEFAULT_MECHANISMS},
        client::{SmtpConnection, TlsParameters},
        extension::ClientId,
        Error as SmtpError,
    },
    Message,
};
use tracing::{debug, info, warn};

#[cfg(test)]
use mockall::automock;

use crate::domain::communication::{DispatchError, MailConfig, Mailer, OutboundMessage};

/// Logs a session step at info level when mail debugging is on, debug level otherwise
macro_rules! session_log {
    ($verbose:expr, $($arg:tt)+) => {
        if $verbose {
            info!($($arg)+);
        } else {
            debug!($($arg)+);
        }
    };
}

/// Opens SMTP sessions
#[cfg_attr(test, automock(type Session = MockSmtpSession;))]
pub trait SmtpConnector: Send + Sync + 'static {
    /// The session type produced by this connector
    type Session: SmtpSession;

    /// Connects to the configured host and port and reads the server greeting.
    fn connect(&self, config: &MailConfig) -> Result<Self::Session, DispatchError>;
}

/// An open SMTP session
#[cfg_attr(test, automock)]
pub trait SmtpSession {
    /// Upgrades the session with STARTTLS when the server offers it.
    fn start_tls(&mut self, config: &MailConfig) -> Result<(), DispatchError>;

    /// Authenticates. A rejection from the server is [`DispatchError::AuthFailed`].
    fn authenticate(&mut self, credentials: &Credentials) -> Result<(), DispatchError>;

    /// Sends the message to its envelope recipients.
    fn transmit(&mut self, email: &Message) -> Result<(), DispatchError>;

    /// Ends the session. Errors are ignored.
    fn close(&mut self);
}

/// Closes the wrapped session when dropped
struct SessionGuard<S: SmtpSession>(S);

impl<S: SmtpSession> Deref for SessionGuard<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.0
    }
}

impl<S: SmtpSession> DerefMut for SessionGuard<S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut self.0
    }
}

impl<S: SmtpSession> Drop for SessionGuard<S> {
    fn drop(&mut self) {
        self.0.close();
    }
}

/// SMTP mailer
#[derive(Debug)]
pub struct SMTPMailer<C = LettreConnector> {
    config: Arc<MailConfig>,
    connector: Arc<C>,
}

impl<C> Clone for SMTPMailer<C> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            connector: Arc::clone(&self.connector),
        }
    }
}

impl SMTPMailer {
    /// Create a new SMTP mailer
    pub fn new(config: Arc<MailConfig>) -> Self {
        Self::with_connector(config, LettreConnector)
    }
}

impl<C: SmtpConnector> SMTPMailer<C> {
    /// Create a new SMTP mailer opening its sessions through `connector`
    pub fn with_connector(config: Arc<MailConfig>, connector: C) -> Self {
        Self {
            config,
            connector: Arc::new(connector),
        }
    }

    /// Runs one session on the blocking pool, sending `email` if there is one.
    async fn run_session(&self, email: Option<Message>) -> Result<(), DispatchError> {
        let config = Arc::clone(&self.config);
        let connector = Arc::clone(&self.connector);

        let result = tokio::task::spawn_blocking(move || {
            deliver(connector.as_ref(), &config, email.as_ref())
        })
        .await
        .context("SMTP worker did not complete")?;

        result.map_err(|err| match err {
            DispatchError::AuthFailed(detail) => {
                DispatchError::AuthFailed(self.config.redact(&detail))
            }
            DispatchError::TransportUnavailable(detail) => {
                DispatchError::TransportUnavailable(self.config.redact(&detail))
            }
            err => err,
        })
    }
}

#[async_trait]
impl<C: SmtpConnector> Mailer for SMTPMailer<C> {
    async fn send(&self, message: &OutboundMessage) -> Result<(), DispatchError> {
        self.config.ensure_credentials()?;

        let email = build_email(message)?;

        self.run_session(Some(email)).await?;

        info!(to = %message.to, "enquiry notification sent over SMTP");

        Ok(())
    }

    async fn check_connection(&self) -> Result<(), DispatchError> {
        self.config.ensure_credentials()?;

        self.run_session(None).await
    }
}

/// Parses a configured address, naming its `role` in the error.
pub fn mailbox(address: &str, role: &str) -> Result<Mailbox, DispatchError> {
    address.parse().map_err(|_| {
        DispatchError::ConfigInvalid(format!("invalid {role} address \"{address}\""))
    })
}

fn build_email(message: &OutboundMessage) -> Result<Message, DispatchError> {
    let from = mailbox(&message.from, "sender")?;
    let to = mailbox(&message.to, "recipient")?;

    let email = Message::builder()
        .from(from)
        .to(to)
        .subject(message.subject.clone())
        .header(ContentType::TEXT_PLAIN)
        .body(message.body.clone())
        .context("failed to build email")?;

    Ok(email)
}

fn deliver<C: SmtpConnector>(
    connector: &C,
    config: &MailConfig,
    email: Option<&Message>,
) -> Result<(), DispatchError> {
    let mut session = SessionGuard(connector.connect(config)?);

    if config.use_starttls {
        session.start_tls(config)?;
    }

    if config.require_auth {
        let credentials =
            Credentials::new(config.username.clone(), config.secret_credential.clone());

        session.authenticate(&credentials)?;
    }

    if let Some(email) = email {
        session.transmit(email)?;
    }

    Ok(())
}

/// Opens real SMTP connections with lettre
#[derive(Debug, Clone, Copy, Default)]
pub struct LettreConnector;

/// A lettre SMTP connection
pub struct LettreSession {
    connection: SmtpConnection,
    hello_name: ClientId,
    verbose: bool,
}

impl fmt::Debug for LettreSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LettreSession")
            .field("server", self.connection.server_info())
            .field("verbose", &self.verbose)
            .finish()
    }
}

impl SmtpConnector for LettreConnector {
    type Session = LettreSession;

    fn connect(&self, config: &MailConfig) -> Result<LettreSession, DispatchError> {
        let hello_name = ClientId::default();

        session_log!(
            config.debug_logging,
            "connecting to {}:{}",
            config.host,
            config.port
        );

        let connection = SmtpConnection::connect(
            (config.host.as_str(), config.port),
            Some(config.timeout()),
            &hello_name,
            None,
            None,
        )
        .map_err(transport_error)?;

        session_log!(config.debug_logging, "connected: {}", connection.server_info());

        Ok(LettreSession {
            connection,
            hello_name,
            verbose: config.debug_logging,
        })
    }
}

impl SmtpSession for LettreSession {
    fn start_tls(&mut self, config: &MailConfig) -> Result<(), DispatchError> {
        if !self.connection.can_starttls() {
            if config.require_starttls {
                return Err(DispatchError::TransportUnavailable(format!(
                    "{} does not support STARTTLS",
                    config.host
                )));
            }

            warn!("{} does not support STARTTLS, continuing in plain text", config.host);

            return Ok(());
        }

        let tls_parameters = TlsParameters::builder(config.host.clone())
            .dangerous_accept_invalid_certs(config.trusts_host())
            .build()
            .map_err(transport_error)?;

        self.connection
            .starttls(&tls_parameters, &self.hello_name)
            .map_err(transport_error)?;

        session_log!(self.verbose, "STARTTLS negotiated");

        Ok(())
    }

    fn authenticate(&mut self, credentials: &Credentials) -> Result<(), DispatchError> {
        match self.connection.auth(DEFAULT_MECHANISMS, credentials) {
            Ok(response) => {
                session_log!(self.verbose, "authenticated: {:?}", response.code());

                Ok(())
            }
            Err(err) if err.is_permanent() || err.is_transient() => {
                Err(DispatchError::AuthFailed(err.to_string()))
            }
            Err(err) => Err(transport_error(err)),
        }
    }

    fn transmit(&mut self, email: &Message) -> Result<(), DispatchError> {
        let response = self
            .connection
            .send(email.envelope(), &email.formatted())
            .map_err(transport_error)?;

        session_log!(self.verbose, "message accepted: {:?}", response.code());

        Ok(())
    }

    fn close(&mut self) {
        if let Err(err) = self.connection.quit() {
            debug!("ignoring error while closing SMTP session: {err}");
        }

        session_log!(self.verbose, "session closed");
    }
}

fn transport_error(err: SmtpError) -> DispatchError {
    DispatchError::TransportUnavailable(err.to_string())
}
