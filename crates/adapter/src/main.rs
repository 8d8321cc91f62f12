use anyhow::Context as _;
use clap::Parser as _;
use iac_env::EnvironmentResolver;
use iac_handler::logging;
use iac_local_adapter::{Cli, run};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_level, cli.log_format).context("initialize logging")?;

    let env = EnvironmentResolver::from_process();
    if let Some(resp) = run(&cli, env).await? {
        let out = serde_json::to_string_pretty(&resp).context("encode response")?;
        println!("{out}");
    }
    Ok(())
}
