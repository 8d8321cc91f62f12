//! In-memory secret store, optionally seeded from a `secrets.json` file.

use crate::error::{Result, SecretError};
use crate::SecretResolver;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct StaticSecretResolver {
    values: HashMap<String, String>,
}

impl StaticSecretResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Load secrets from a JSON object of `name -> value`. See [`Self::from_json`].
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            SecretError::Config(format!("read secrets file {}: {e}", path.display()))
        })?;
        let doc: Value = serde_json::from_slice(&bytes).map_err(|e| {
            SecretError::Config(format!("parse secrets file {}: {e}", path.display()))
        })?;
        Self::from_json(doc).map_err(|e| match e {
            SecretError::Config(msg) => {
                SecretError::Config(format!("{msg} (in {})", path.display()))
            }
            other => other,
        })
    }

    /// Build the store from a JSON object of `name -> value`.
    ///
    /// String values are used as-is; other values are kept as their compact JSON encoding.
    /// This differs from a Secrets Manager store seeded from the same file: provisioning writes
    /// every value JSON-encoded, so `"text"` resolves to `text` here but to `"text"` (quotes
    /// included) there. Structured values resolve identically through both.
    pub fn from_json(doc: Value) -> Result<Self> {
        let Value::Object(map) = doc else {
            return Err(SecretError::Config(
                "secrets document must be a JSON object".to_string(),
            ));
        };

        let values = map
            .into_iter()
            .map(|(name, value)| {
                let value = match value {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                (name, value)
            })
            .collect();
        Ok(Self { values })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[async_trait]
impl SecretResolver for StaticSecretResolver {
    async fn resolve(&self, name: &str) -> Result<String> {
        tracing::debug!(secret = %name, "resolving secret from static store");
        self.values
            .get(name)
            .cloned()
            .ok_or_else(|| SecretError::NotFound {
                name: name.to_string(),
            })
    }
}
