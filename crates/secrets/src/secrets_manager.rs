//! AWS Secrets Manager backend.
//!
//! Local stacks (LocalStack) are reached by overriding the endpoint:
//! - `LOCALSTACK_SECRETS_MANAGER_URL` takes precedence,
//! - otherwise `LOCALSTACK_URL`.
//!
//! Region and credentials always come from the default AWS provider chain.

use crate::error::{Result, SecretError};
use crate::SecretResolver;
use async_trait::async_trait;
use aws_sdk_secretsmanager::Client;
use aws_sdk_secretsmanager::error::DisplayErrorContext;

pub const SECRETS_MANAGER_URL_VAR: &str = "LOCALSTACK_SECRETS_MANAGER_URL";
pub const LOCALSTACK_URL_VAR: &str = "LOCALSTACK_URL";

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Endpoint override for local secret stores, if any is configured.
#[must_use]
pub fn endpoint_override() -> Option<String> {
    non_empty_var(SECRETS_MANAGER_URL_VAR).or_else(|| non_empty_var(LOCALSTACK_URL_VAR))
}

#[derive(Debug, Clone)]
pub struct SecretsManagerResolver {
    client: Client,
}

impl SecretsManagerResolver {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from the default AWS configuration, honoring the LocalStack overrides.
    ///
    /// SDK retries are disabled: every lookup is a single attempt.
    pub async fn from_env() -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .retry_config(aws_config::retry::RetryConfig::disabled());
        if let Some(endpoint) = endpoint_override() {
            tracing::info!(%endpoint, "using secret store endpoint override");
            loader = loader.endpoint_url(endpoint);
        }
        let config = loader.load().await;
        Self::new(Client::new(&config))
    }
}

#[async_trait]
impl SecretResolver for SecretsManagerResolver {
    async fn resolve(&self, name: &str) -> Result<String> {
        tracing::debug!(secret = %name, "resolving secret from Secrets Manager");

        let output = match self.client.get_secret_value().secret_id(name).send().await {
            Ok(output) => output,
            Err(e) => {
                let service_err = e.into_service_error();
                if service_err.is_resource_not_found_exception() {
                    return Err(SecretError::NotFound {
                        name: name.to_string(),
                    });
                }
                return Err(SecretError::Access {
                    name: name.to_string(),
                    message: DisplayErrorContext(&service_err).to_string(),
                });
            }
        };

        output
            .secret_string()
            .map(str::to_string)
            .ok_or_else(|| SecretError::Access {
                name: name.to_string(),
                message: "secret has no string value".to_string(),
            })
    }
}
