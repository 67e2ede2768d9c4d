//! simulate-attacks - demo traffic for a running FlowGuard server
//!
//! Usage: `simulate-attacks [submit_url]` (default `http://127.0.0.1:5000/submit`,
//! or `FLOWGUARD_URL`). Posts five brute-force style flows 300 ms apart,
//! then one DDoS style flow, and prints each verdict.

use std::time::Duration;

use anyhow::Context;
use serde_json::{json, Value};

const DEFAULT_SUBMIT_URL: &str = "http://127.0.0.1:5000/submit";
const BRUTE_FORCE_ROUNDS: usize = 5;
const PAUSE: Duration = Duration::from_millis(300);

/// Short login attempts with many failures
fn brute_force_flow() -> Value {
    json!({
        "duration": 2.0,
        "src_bytes": 10,
        "dst_bytes": 5,
        "pkt_rate": 0.5,
        "failed_logins": 6,
        "note": "simulated brute"
    })
}

/// High packet rate, large upstream volume
fn ddos_flow() -> Value {
    json!({
        "duration": 1.0,
        "src_bytes": 5000,
        "dst_bytes": 10,
        "pkt_rate": 1200,
        "failed_logins": 0,
        "note": "simulated ddos"
    })
}

async fn submit(client: &reqwest::Client, url: &str, flow: &Value) -> anyhow::Result<()> {
    let response = client
        .post(url)
        .json(flow)
        .send()
        .await
        .with_context(|| format!("POST {} failed", url))?;

    let status = response.status();
    let body: Value = response.json().await.context("response is not JSON")?;
    tracing::info!(%status, verdict = %body, "{}", flow["note"].as_str().unwrap_or("-"));
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let url = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("FLOWGUARD_URL").ok())
        .unwrap_or_else(|| DEFAULT_SUBMIT_URL.to_string());

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .context("failed to create HTTP client")?;

    for _ in 0..BRUTE_FORCE_ROUNDS {
        submit(&client, &url, &brute_force_flow()).await?;
        tokio::time::sleep(PAUSE).await;
    }
    submit(&client, &url, &ddos_flow()).await?;

    Ok(())
}
