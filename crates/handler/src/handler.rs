use crate::error::Result;
use crate::event::{NativeEvent, NativeResponse};
use crate::fibonacci;
use iac_env::{EnvironmentResolver, EnvironmentTag};
use iac_secrets::{DEFAULT_SECRET_NAME, SecretResolver, resolve_all};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

pub const NUMBER_PARAM: &str = "number";
pub const DEFAULT_NUMBER: u32 = 10;

/// Comma-separated list of secret names to resolve per invocation.
pub const SECRET_NAMES_VAR: &str = "IAC_SECRET_NAMES";

pub const DEVELOPMENT_NOTE: &str = "Running in development mode: extra logs enabled.";
pub const PRODUCTION_NOTE: &str = "Running in production mode: optimized settings.";

fn csv_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerConfig {
    pub secret_names: Vec<String>,
    pub default_number: u32,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            secret_names: vec![DEFAULT_SECRET_NAME.to_string()],
            default_number: DEFAULT_NUMBER,
        }
    }
}

impl HandlerConfig {
    /// Defaults, with the secret list overridden by `IAC_SECRET_NAMES` when it is set.
    ///
    /// An explicitly empty list means "resolve no secrets".
    #[must_use]
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(raw) = std::env::var(SECRET_NAMES_VAR) {
            cfg.secret_names = csv_list(&raw);
        }
        cfg
    }

    #[must_use]
    pub fn with_secret_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.secret_names = names.into_iter().map(Into::into).collect();
        self
    }
}

/// JSON body returned for every successful invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponsePayload {
    pub number: u32,
    pub result: u64,
    pub environment: EnvironmentTag,
    pub secrets: BTreeMap<String, String>,
    pub notes: Vec<String>,
}

fn notes_for(env: EnvironmentTag) -> Vec<String> {
    let mut notes = Vec::new();
    if env.is_development() {
        notes.push(DEVELOPMENT_NOTE.to_string());
    }
    if env.is_production() {
        notes.push(PRODUCTION_NOTE.to_string());
    }
    notes
}

/// Stateless orchestration for one invocation.
///
/// Clones share the same collaborators, so a single handler can serve concurrent requests.
#[derive(Clone)]
pub struct RequestHandler {
    env: EnvironmentResolver,
    secrets: Arc<dyn SecretResolver>,
    config: Arc<HandlerConfig>,
}

impl RequestHandler {
    #[must_use]
    pub fn new(
        env: EnvironmentResolver,
        secrets: Arc<dyn SecretResolver>,
        config: HandlerConfig,
    ) -> Self {
        Self {
            env,
            secrets,
            config: Arc::new(config),
        }
    }

    #[must_use]
    pub fn config(&self) -> &HandlerConfig {
        &self.config
    }

    /// The `number` query parameter, or the configured default when it is absent or not a
    /// non-negative integer.
    #[must_use]
    pub fn parse_number(&self, event: &NativeEvent) -> u32 {
        let Some(raw) = event.query_param(NUMBER_PARAM) else {
            return self.config.default_number;
        };
        match raw.trim().parse::<u32>() {
            Ok(n) => n,
            Err(e) => {
                tracing::debug!(raw = %raw, error = %e, "unparsable number, using default");
                self.config.default_number
            }
        }
    }

    pub async fn handle(&self, event: &NativeEvent) -> Result<NativeResponse> {
        let number = self.parse_number(event);
        let result = fibonacci::compute(number).await?;
        let environment = self.env.current();

        if environment.is_development() {
            tracing::info!(number, result, %environment, path = %event.path(), "computed fibonacci");
        } else {
            tracing::debug!(number, result, %environment, "computed fibonacci");
        }

        let secrets = resolve_all(self.secrets.as_ref(), &self.config.secret_names).await?;

        let payload = ResponsePayload {
            number,
            result,
            environment,
            secrets,
            notes: notes_for(environment),
        };
        let body = serde_json::to_string(&payload)?;
        Ok(NativeResponse::json_ok(body))
    }
}
