//! Mailer service module

use async_trait::async_trait;

#[cfg(test)]
use mockall::mock;

use super::{DispatchError, OutboundMessage};

/// Delivers notification messages to the operational recipient
#[async_trait]
pub trait Mailer: Clone + Send + Sync + 'static {
    /// Sends a message.
    ///
    /// No connection is attempted when the credentials are missing. Sending the same
    /// message twice delivers it twice.
    ///
    /// # Arguments
    /// * `message` - The composed [`OutboundMessage`].
    ///
    /// # Returns
    /// [`Ok`] once the message has been accepted, or the [`DispatchError`] describing
    /// why it was not.
    async fn send(&self, message: &OutboundMessage) -> Result<(), DispatchError>;

    /// Opens (and authenticates) a session with the mail server, then closes it
    /// without sending anything.
    async fn check_connection(&self) -> Result<(), DispatchError>;
}

#[cfg(test)]
mock! {
    pub Mailer {}

    impl Clone for Mailer {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl Mailer for Mailer {
        async fn send(&self, message: &OutboundMessage) -> Result<(), DispatchError>;
        async fn check_connection(&self) -> Result<(), DispatchError>;
    }
}
