//! Mail dispatch errors

use thiserror::Error;

/// Why a notification could not be dispatched
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The mail configuration is unusable, e.g. missing credentials
    #[error("mail configuration is invalid: {0}")]
    ConfigInvalid(String),

    /// The mail server rejected the configured credentials
    #[error("mail server rejected the credentials: {0}")]
    AuthFailed(String),

    /// The mail server could not be reached or refused the message
    #[error("mail server unavailable: {0}")]
    TransportUnavailable(String),

    /// Anything else. The cause is kept for logging only.
    #[error("unexpected error while sending mail")]
    UnknownFailure(#[source] anyhow::Error),
}

impl From<anyhow::Error> for DispatchError {
    fn from(err: anyhow::Error) -> Self {
        DispatchError::UnknownFailure(err)
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;

    use super::*;

    #[test]
    fn test_unknown_failure_hides_its_cause() {
        let err = DispatchError::from(anyhow!("stack trace at line 42"));

        assert_eq!(err.to_string(), "unexpected error while sending mail");
    }
}
