//! Gateway error types.

use thiserror::Error;

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Errors that happen before a generation stream is established. Failures
/// after that point arrive in-band as [`crate::GatewayEvent::Error`].
#[derive(Debug, Error)]
pub enum GatewayError {
    /// No API credential was configured.
    #[error("missing API key: set {env_var}")]
    MissingApiKey { env_var: &'static str },

    /// The upstream rejected the credential.
    #[error("model API rejected the credential (status {status})")]
    Unauthorized { status: u16 },

    /// The upstream returned a non-success status before streaming.
    #[error("model API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The upstream could not be reached.
    #[error("model API unreachable: {message}")]
    Connection { message: String },

    /// The upstream sent output we could not make sense of.
    #[error("model API protocol error: {message}")]
    Protocol { message: String },
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::Connection {
            message: err.to_string(),
        }
    }
}
