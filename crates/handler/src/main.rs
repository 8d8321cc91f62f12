//! Managed-mode entry point: serves invocations from the Lambda runtime API.

use iac_env::EnvironmentResolver;
use iac_handler::logging::{self, LogFormat};
use iac_handler::{HandlerConfig, NativeEvent, NativeResponse, RequestHandler};
use iac_secrets::SecretsManagerResolver;
use lambda_runtime::{LambdaEvent, service_fn};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    logging::init("info", LogFormat::Json)?;

    let env = EnvironmentResolver::from_process();
    let config = HandlerConfig::from_env();
    tracing::info!(environment = %env.current(), secrets = ?config.secret_names, "starting fib-lambda");

    let secrets = Arc::new(SecretsManagerResolver::from_env().await);
    let handler = RequestHandler::new(env, secrets, config);

    lambda_runtime::run(service_fn(|event: LambdaEvent<NativeEvent>| {
        let handler = handler.clone();
        async move {
            let request_id = event.context.request_id.clone();
            match handler.handle(&event.payload).await {
                Ok(resp) => Ok::<NativeResponse, lambda_runtime::Error>(resp),
                Err(e) => {
                    tracing::error!(%request_id, error = %e, "invocation failed");
                    Err(e.into())
                }
            }
        }
    }))
    .await
}
