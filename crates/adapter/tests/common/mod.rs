#![allow(dead_code)]

use anyhow::Context as _;
use std::path::Path;
use std::process::{Child, Command};

pub use iac_test_support::{
    KillOnDrop, pick_unused_port, wait_for_exit, wait_http_ok, write_secrets_file,
};

/// `fib-local` with a clean, explicit environment.
pub fn fib_local(environment: &str, secrets_file: &Path) -> Command {
    let bin = env!("CARGO_BIN_EXE_fib-local");
    let mut cmd = Command::new(bin);
    for var in [
        "RUST_LOG",
        "IAC_SECRET_NAMES",
        "IAC_LOCAL_PORT",
        "IAC_LOCAL_ROUTE_PREFIX",
        "IAC_MOCK_NUMBER",
        "IAC_NO_WAIT_FOR_DEBUGGER",
        "IAC_SECRETS_FILE",
        "IAC_LOG_FORMAT",
    ] {
        cmd.env_remove(var);
    }
    cmd.env("IAC_ENVIRONMENT", environment)
        .arg("--secrets-file")
        .arg(secrets_file)
        .arg("--log-level")
        .arg("info");
    cmd
}

/// Start the local proxy in debugging mode without waiting for a debugger.
pub fn spawn_local_proxy(
    secrets_file: &Path,
    port: u16,
    secret_names: Option<&str>,
) -> anyhow::Result<Child> {
    let mut cmd = fib_local("local", secrets_file);
    cmd.arg("--no-wait-for-debugger")
        .arg("--port")
        .arg(port.to_string());
    if let Some(names) = secret_names {
        cmd.env("IAC_SECRET_NAMES", names);
    }
    cmd.spawn().context("spawn fib-local")
}
