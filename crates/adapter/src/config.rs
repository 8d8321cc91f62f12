use crate::proxy::{DEFAULT_PORT, DEFAULT_ROUTE_PREFIX};
use clap::Parser;
use iac_handler::logging::LogFormat;
use std::path::PathBuf;

/// Local runner for the Fibonacci function.
///
/// With `IAC_ENVIRONMENT=local` it waits for a debugger, then serves
/// `GET /<route-prefix>?number=N` over HTTP. In any other environment it performs one mock
/// invocation, prints the response and exits.
#[derive(Debug, Clone, Parser)]
#[command(name = "fib-local", version, about)]
pub struct Cli {
    /// TCP port for the local listener (bound on all interfaces).
    #[arg(long, env = "IAC_LOCAL_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Route the function is exposed under.
    #[arg(long, env = "IAC_LOCAL_ROUTE_PREFIX", default_value = DEFAULT_ROUTE_PREFIX)]
    pub route_prefix: String,

    /// `number` for the mock invocation (omitted: the handler default applies).
    #[arg(long, env = "IAC_MOCK_NUMBER")]
    pub number: Option<u32>,

    /// Serve immediately instead of waiting for a debugger to attach.
    #[arg(long, env = "IAC_NO_WAIT_FOR_DEBUGGER")]
    pub no_wait_for_debugger: bool,

    /// Resolve secrets from a JSON file (`{"name": value}`) instead of Secrets Manager.
    #[arg(long, env = "IAC_SECRETS_FILE")]
    pub secrets_file: Option<PathBuf>,

    /// Log level used when `RUST_LOG` is not set.
    #[arg(long, env = "IAC_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    #[arg(long, env = "IAC_LOG_FORMAT", default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}
