//! Local execution adapter for the Fibonacci function.
//!
//! The same [`RequestHandler`] that runs under the managed Lambda runtime is exposed over a
//! plain HTTP listener for interactive debugging:
//!
//! 1. At startup the environment is resolved once. Only `Local` enters debugging mode.
//! 2. Debugging mode waits on the [`gate::DebuggerGate`] until a debugger attaches, then
//!    [`proxy::serve`]s `GET /<route-prefix>` until the process exits.
//! 3. Any other environment performs a single mock invocation and exits.

pub mod config;
pub mod error;
pub mod gate;
pub mod proxy;

pub use config::Cli;
pub use error::{AdapterError, Result};

use iac_env::EnvironmentResolver;
use iac_handler::handler::NUMBER_PARAM;
use iac_handler::{HandlerConfig, NativeEvent, NativeResponse, RequestHandler};
use iac_secrets::{SecretResolver, SecretsManagerResolver, StaticSecretResolver};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// Secret store for local runs: a JSON file when given, Secrets Manager otherwise.
pub async fn secret_resolver(secrets_file: Option<&Path>) -> Result<Arc<dyn SecretResolver>> {
    Ok(match secrets_file {
        Some(path) => {
            let store = StaticSecretResolver::from_json_file(path)?;
            tracing::info!(path = %path.display(), secrets = store.len(), "using secrets file");
            Arc::new(store)
        }
        None => Arc::new(SecretsManagerResolver::from_env().await),
    })
}

/// Event used for the non-debugging mock invocation.
#[must_use]
pub fn mock_event(route_prefix: &str, number: Option<u32>) -> NativeEvent {
    let query = number
        .map(|n| BTreeMap::from([(NUMBER_PARAM.to_string(), n.to_string())]))
        .unwrap_or_default();
    let path = format!("/{}", route_prefix.trim().trim_matches('/'));
    NativeEvent::new(path, proxy::FORWARDED_METHOD, query)
}

pub async fn mock_invocation(
    handler: &RequestHandler,
    route_prefix: &str,
    number: Option<u32>,
) -> Result<NativeResponse> {
    let event = mock_event(route_prefix, number);
    tracing::info!(params = ?event.query_string_parameters(), "running mock invocation");
    Ok(handler.handle(&event).await?)
}

/// Run the local process as configured by `cli`.
///
/// Debugging mode never returns unless startup fails.
pub async fn run(cli: &Cli, env: EnvironmentResolver) -> Result<Option<NativeResponse>> {
    let environment = env.current();
    let debugging = environment.is_debugging();
    tracing::info!(%environment, debugging, "starting fib-local");

    let secrets = secret_resolver(cli.secrets_file.as_deref()).await?;
    let handler = RequestHandler::new(env, secrets, HandlerConfig::from_env());

    if !debugging {
        return mock_invocation(&handler, &cli.route_prefix, cli.number)
            .await
            .map(Some);
    }

    // Fail on a bad prefix before blocking on the debugger.
    proxy::route_path(&cli.route_prefix)?;

    if cli.no_wait_for_debugger {
        tracing::info!("not waiting for a debugger");
    } else {
        gate::DebuggerGate::new(gate::ProcStatusProbe)
            .wait(gate::POLL_INTERVAL)
            .await;
    }

    proxy::serve(Arc::new(handler), &cli.route_prefix, cli.port).await?;
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use iac_handler::ResponsePayload;

    #[test]
    fn mock_event_shape() {
        let event = mock_event("/fibonacci/", Some(7));
        assert_eq!(event.path(), "/fibonacci");
        assert_eq!(event.http_method(), "POST");
        assert_eq!(event.query_param("number"), Some("7"));

        let bare = mock_event("fibonacci", None);
        assert!(bare.query_string_parameters().is_empty());
    }

    #[tokio::test]
    async fn secrets_file_backs_the_resolver() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("secrets.json");
        std::fs::write(&path, r#"{"secret_example": "local-value"}"#).expect("write");

        let resolver = secret_resolver(Some(&path)).await.expect("resolver");
        assert_eq!(
            resolver.resolve("secret_example").await.expect("resolve"),
            "local-value"
        );
    }

    #[tokio::test]
    async fn unreadable_secrets_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let res = secret_resolver(Some(&dir.path().join("missing.json"))).await;
        assert!(matches!(res, Err(AdapterError::Secrets(_))));
    }

    #[tokio::test]
    async fn mock_invocation_without_number_uses_handler_default() {
        let handler = RequestHandler::new(
            EnvironmentResolver::fixed("production"),
            Arc::new(StaticSecretResolver::new().with("secret_example", "v")),
            HandlerConfig::default(),
        );
        let resp = mock_invocation(&handler, "fibonacci", None)
            .await
            .expect("invoke");
        let payload: ResponsePayload = serde_json::from_str(resp.body()).expect("payload");
        assert_eq!(payload.number, 10);
        assert_eq!(payload.result, 89);
    }
}
