//! Error types for the local adapter.

use iac_handler::HandlerError;
use iac_secrets::SecretError;
use std::net::SocketAddr;
use thiserror::Error;

/// Main error type for the adapter.
#[derive(Error, Debug)]
pub enum AdapterError {
    /// The listener could not be bound (port in use, insufficient permission).
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors (invalid route prefix)
    #[error("Configuration error: {0}")]
    Config(String),

    /// The HTTP server stopped with an error after startup
    #[error("Runtime error: {0}")]
    Runtime(#[source] std::io::Error),

    /// Secret store setup errors
    #[error(transparent)]
    Secrets(#[from] SecretError),

    /// Handler invocation errors
    #[error(transparent)]
    Handler(#[from] HandlerError),
}

/// Result type alias for adapter operations.
pub type Result<T> = std::result::Result<T, AdapterError>;
