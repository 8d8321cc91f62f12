//! Secret resolution for the Fibonacci function.
//!
//! Every lookup goes to the backing store; nothing is cached between calls. Multiple names
//! are resolved concurrently with [`resolve_all`], which fails as a whole if any single name
//! fails.

pub mod error;
pub mod secrets_manager;
pub mod static_store;

pub use error::{Result, SecretError};
pub use secrets_manager::SecretsManagerResolver;
pub use static_store::StaticSecretResolver;

use async_trait::async_trait;
use std::collections::BTreeMap;

/// Name of the secret the function reads when nothing else is configured.
pub const DEFAULT_SECRET_NAME: &str = "secret_example";

#[async_trait]
pub trait SecretResolver: Send + Sync {
    /// Fetch the current plaintext value of `name`.
    async fn resolve(&self, name: &str) -> Result<String>;
}

/// Resolve every name concurrently.
///
/// The first failure aborts the whole set; callers never see a partial map.
pub async fn resolve_all<R>(resolver: &R, names: &[String]) -> Result<BTreeMap<String, String>>
where
    R: SecretResolver + ?Sized,
{
    let lookups = names.iter().map(|name| async move {
        let value = resolver.resolve(name).await?;
        Ok::<_, SecretError>((name.clone(), value))
    });
    let resolved = futures::future::try_join_all(lookups).await?;
    Ok(resolved.into_iter().collect())
}
