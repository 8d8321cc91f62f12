//! Error types for secret resolution.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SecretError {
    /// The store has no secret with this name.
    #[error("Secret not found: {name}")]
    NotFound { name: String },

    /// Transport, authentication or payload failures while reading a secret.
    #[error("Secret access error for '{name}': {message}")]
    Access { name: String, message: String },

    /// Invalid local secret configuration (secrets file).
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SecretError {
    /// Name of the secret the error refers to, when there is one.
    #[must_use]
    pub fn secret_name(&self) -> Option<&str> {
        match self {
            Self::NotFound { name } | Self::Access { name, .. } => Some(name),
            Self::Config(_) => None,
        }
    }
}

/// Result type alias for secret operations.
pub type Result<T> = std::result::Result<T, SecretError>;
