//! Error types for the request handler.

use iac_secrets::SecretError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HandlerError {
    /// A requested secret could not be resolved. The invocation fails as a whole.
    #[error(transparent)]
    Secret(#[from] SecretError),

    /// The Fibonacci computation could not run to completion.
    #[error("Compute error for number {number}: {message}")]
    Compute { number: u32, message: String },

    /// The response payload could not be encoded.
    #[error("Encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Result type alias for handler operations.
pub type Result<T> = std::result::Result<T, HandlerError>;
