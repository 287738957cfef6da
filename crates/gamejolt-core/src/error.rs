/// Failure kinds surfaced by the protocol layer and the client built on it.
///
/// A well-formed negative answer from the service (`success:"false"`, a
/// `FAILURE` status line) is never an `Error`; it is returned as `false` or
/// `None` by the operation that received it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A user-scoped operation was attempted before a successful verification.
    #[error("no verified user; call verify_user with a valid username and token first")]
    Unverified,
    #[error("{0}")]
    InvalidArgument(String),
    /// The service answered with a non-OK HTTP status.
    #[error("server error ({0})")]
    Status(u16),
    /// The response body could not be mapped to any outcome.
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("{0}")]
    Transport(String),
}

impl Error {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Error::Malformed(msg.into())
    }

    /// True for the two protocol-level kinds: bad status or unreadable body.
    pub fn is_protocol(&self) -> bool {
        matches!(self, Error::Status(_) | Error::Malformed(_))
    }

    /// Misuse and precondition failures. These always reach the caller, even
    /// from inside a batch operation.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Unverified | Error::InvalidArgument(_))
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        assert!(Error::Unverified.is_fatal());
        assert!(Error::InvalidArgument("x".into()).is_fatal());
        assert!(Error::Status(500).is_protocol());
        assert!(Error::malformed("bad").is_protocol());
        assert!(!Error::Transport("refused".into()).is_protocol());
        assert!(!Error::Transport("refused".into()).is_fatal());
    }

    #[test]
    fn status_display() {
        assert_eq!(Error::Status(404).to_string(), "server error (404)");
        assert_eq!(
            Error::malformed("missing id").to_string(),
            "malformed response: missing id"
        );
    }
}
