//! Application state module

use std::{fmt, sync::Arc};

use chrono::{DateTime, Utc};

use crate::domain::communication::{MailConfig, Mailer};

/// Global application state
#[derive(Clone)]
pub struct AppState<M: Mailer> {
    /// The time the server started
    pub start_time: DateTime<Utc>,

    /// The mail configuration
    pub mail: Arc<MailConfig>,

    /// The mailer dispatching enquiry notifications
    pub mailer: Arc<M>,
}

impl<M: Mailer> AppState<M> {
    /// Create a new application state
    pub fn new(mail: Arc<MailConfig>, mailer: M) -> Self {
        Self {
            start_time: Utc::now(),
            mail,
            mailer: Arc::new(mailer),
        }
    }
}

impl<M: Mailer> fmt::Debug for AppState<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("start_time", &self.start_time)
            .field("mail", &self.mail)
            .field("mailer", &"Mailer")
            .finish()
    }
}

#[cfg(test)]
pub mod tests {
    use crate::domain::communication::tests::{test_config, MockMailer};

    use super::*;

    pub fn test_state(mailer: Option<MockMailer>) -> AppState<MockMailer> {
        AppState::new(
            Arc::new(test_config()),
            mailer.unwrap_or_else(MockMailer::new),
        )
    }
}
