use thiserror::Error;

/// Error taxonomy shared by every layer of the client.
///
/// A zero-pending claim is not an error; see [`crate::ClaimOutcome::Skipped`].
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed percentage, slippage out of range, wrong-length path or
    /// referral chain, non-address identifier. Raised before any remote call.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// No account could be resolved (recipient, signer identity, configured
    /// contract address).
    #[error("missing context: {0}")]
    MissingContext(String),

    /// The remote query or state-changing call failed. `message` is the
    /// remote's own diagnostic, unmodified.
    #[error("remote call `{operation}` failed: {message}")]
    RemoteCallFailure { operation: String, message: String },

    /// Configuration file could not be read or parsed.
    #[error("config error: {0}")]
    Config(String),
}

impl Error {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    pub fn missing(msg: impl Into<String>) -> Self {
        Error::MissingContext(msg.into())
    }

    pub fn remote(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Error::RemoteCallFailure {
            operation: operation.into(),
            message: message.into(),
        }
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::InvalidArgument(_))
    }

    pub fn is_missing_context(&self) -> bool {
        matches!(self, Error::MissingContext(_))
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Error::RemoteCallFailure { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
