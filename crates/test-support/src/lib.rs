use anyhow::Context as _;
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::process::{Child, ExitStatus};
use std::time::{Duration, Instant};

/// Child process that is killed (and reaped) when dropped.
pub struct KillOnDrop(pub Child);

impl Drop for KillOnDrop {
    fn drop(&mut self) {
        let _ = self.0.kill();
        let _ = self.0.wait();
    }
}

/// Ask the OS for a free loopback port for `fib-local --port`.
///
/// The listener is closed before returning, so a racing process can still take the port.
///
/// # Errors
///
/// Fails when no ephemeral loopback port can be bound.
pub fn pick_unused_port() -> anyhow::Result<u16> {
    let addr = TcpListener::bind(("127.0.0.1", 0))
        .and_then(|listener| listener.local_addr())
        .context("reserve ephemeral loopback port")?;
    Ok(addr.port())
}

/// Retry `GET url` until it answers 2xx, e.g. the local proxy's `/health`.
///
/// # Errors
///
/// Fails with the last observed outcome once `deadline` has passed.
pub async fn wait_http_ok(url: &str, deadline: Duration) -> anyhow::Result<()> {
    let client = reqwest::Client::new();
    let started = Instant::now();
    let mut last = String::from("no attempt made");
    while started.elapsed() <= deadline {
        match client.get(url).send().await {
            Ok(resp) if resp.status().is_success() => return Ok(()),
            Ok(resp) => last = format!("status {}", resp.status()),
            Err(e) => last = e.to_string(),
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    anyhow::bail!("{url} not ready after {deadline:?}: {last}")
}

/// Poll a child until it exits.
///
/// # Errors
///
/// Returns an error if the child is still running after `timeout_dur` or cannot be polled.
pub async fn wait_for_exit(child: &mut Child, timeout_dur: Duration) -> anyhow::Result<ExitStatus> {
    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait().context("poll child")? {
            return Ok(status);
        }
        if start.elapsed() > timeout_dur {
            anyhow::bail!("child did not exit within {timeout_dur:?}");
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

/// Write a `secrets.json` (`{"name": value}`) into `dir`.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_secrets_file(dir: &Path, secrets: &serde_json::Value) -> anyhow::Result<PathBuf> {
    let path = dir.join("secrets.json");
    let bytes = serde_json::to_vec_pretty(secrets).context("serialize secrets")?;
    std::fs::write(&path, bytes).with_context(|| format!("write {}", path.display()))?;
    Ok(path)
}
