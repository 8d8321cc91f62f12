mod common;

use anyhow::Context as _;
use serde_json::{Value, json};
use std::time::Duration;
use tempfile::tempdir;

use common::{KillOnDrop, pick_unused_port, spawn_local_proxy, wait_http_ok, write_secrets_file};

async fn start_proxy(
    dir: &tempfile::TempDir,
    secret_names: Option<&str>,
) -> anyhow::Result<(String, KillOnDrop)> {
    let secrets = write_secrets_file(
        dir.path(),
        &json!({ "secret_example": "local-secret", "db": { "user": "app" } }),
    )?;
    let port = pick_unused_port()?;
    let child = KillOnDrop(spawn_local_proxy(&secrets, port, secret_names)?);

    let base_url = format!("http://127.0.0.1:{port}");
    wait_http_ok(&format!("{base_url}/health"), Duration::from_secs(20)).await?;
    Ok((base_url, child))
}

#[tokio::test]
async fn get_fibonacci_reports_result_environment_and_secrets() -> anyhow::Result<()> {
    let dir = tempdir().context("create temp dir")?;
    let (base_url, _proxy) = start_proxy(&dir, None).await?;

    let resp = reqwest::get(format!("{base_url}/fibonacci?number=5")).await?;
    anyhow::ensure!(resp.status() == 200, "status {}", resp.status());
    let content_type = resp
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    anyhow::ensure!(content_type.as_deref() == Some("application/json"));

    let body: Value = resp.json().await?;
    anyhow::ensure!(body["number"] == json!(5), "body {body}");
    anyhow::ensure!(body["result"] == json!(8), "body {body}");
    anyhow::ensure!(body["environment"] == json!("Local"), "body {body}");
    anyhow::ensure!(body["secrets"] == json!({ "secret_example": "local-secret" }));
    anyhow::ensure!(
        body["notes"] == json!(["Running in development mode: extra logs enabled."]),
        "body {body}"
    );
    Ok(())
}

#[tokio::test]
async fn missing_number_defaults_to_one() -> anyhow::Result<()> {
    let dir = tempdir().context("create temp dir")?;
    let (base_url, _proxy) = start_proxy(&dir, None).await?;

    let body: Value = reqwest::get(format!("{base_url}/fibonacci"))
        .await?
        .json()
        .await?;
    anyhow::ensure!(body["number"] == json!(1), "body {body}");
    anyhow::ensure!(body["result"] == json!(1), "body {body}");

    let body: Value = reqwest::get(format!("{base_url}/fibonacci?number=oops"))
        .await?
        .json()
        .await?;
    anyhow::ensure!(body["number"] == json!(10), "handler default applies: {body}");
    anyhow::ensure!(body["result"] == json!(89), "body {body}");
    Ok(())
}

#[tokio::test]
async fn structured_secret_values_are_json_encoded() -> anyhow::Result<()> {
    let dir = tempdir().context("create temp dir")?;
    let (base_url, _proxy) = start_proxy(&dir, Some("db,secret_example")).await?;

    let body: Value = reqwest::get(format!("{base_url}/fibonacci?number=2"))
        .await?
        .json()
        .await?;
    let db = body["secrets"]["db"]
        .as_str()
        .context("db secret is a string")?;
    let db: Value = serde_json::from_str(db)?;
    anyhow::ensure!(db == json!({ "user": "app" }));
    anyhow::ensure!(body["secrets"]["secret_example"] == json!("local-secret"));
    Ok(())
}

#[tokio::test]
async fn unresolvable_secret_fails_the_request() -> anyhow::Result<()> {
    let dir = tempdir().context("create temp dir")?;
    let (base_url, _proxy) = start_proxy(&dir, Some("secret_example,not_in_store")).await?;

    let resp = reqwest::get(format!("{base_url}/fibonacci?number=4")).await?;
    anyhow::ensure!(resp.status() == 500, "status {}", resp.status());
    let body: Value = resp.json().await?;
    anyhow::ensure!(body.get("secrets").is_none(), "no partial payload: {body}");
    anyhow::ensure!(
        body["error"]
            .as_str()
            .is_some_and(|m| m.contains("not_in_store")),
        "body {body}"
    );
    Ok(())
}

#[tokio::test]
async fn non_get_methods_are_rejected() -> anyhow::Result<()> {
    let dir = tempdir().context("create temp dir")?;
    let (base_url, _proxy) = start_proxy(&dir, None).await?;

    let resp = reqwest::Client::new()
        .post(format!("{base_url}/fibonacci?number=5"))
        .send()
        .await?;
    anyhow::ensure!(resp.status() == 405, "status {}", resp.status());
    Ok(())
}

#[tokio::test]
async fn large_number_keeps_the_process_serving() -> anyhow::Result<()> {
    let dir = tempdir().context("create temp dir")?;
    let (base_url, mut proxy) = start_proxy(&dir, None).await?;

    let in_flight = tokio::spawn(reqwest::get(format!("{base_url}/fibonacci?number=1000000")));
    tokio::time::sleep(Duration::from_millis(500)).await;

    let resp = tokio::time::timeout(
        Duration::from_secs(5),
        reqwest::get(format!("{base_url}/health")),
    )
    .await
    .context("health timed out")??;
    anyhow::ensure!(resp.status() == 200, "status {}", resp.status());
    anyhow::ensure!(proxy.0.try_wait()?.is_none(), "fib-local exited");

    let body: Value = reqwest::get(format!("{base_url}/fibonacci?number=5&number=7"))
        .await?
        .json()
        .await?;
    anyhow::ensure!(body["number"] == json!(5), "first value wins: {body}");

    in_flight.abort();
    Ok(())
}
