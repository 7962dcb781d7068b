//! `scout` command: free-tier score lookup against a geoscout server.

use std::time::Duration;

use anyhow::Context;
use geoscout_core::{AppConfig, GeoLiteResult};
use reqwest::Url;

use crate::render::Card;

pub(crate) async fn run_scout(
    config: &AppConfig,
    server_url: &str,
    brand: &str,
    json: bool,
) -> anyhow::Result<()> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .user_agent(config.user_agent.as_str())
        .build()
        .context("failed to build HTTP client")?;

    let result = fetch_geo_free(&client, server_url, brand).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!(
            "{}",
            Card {
                brand: brand.trim(),
                result: &result,
            }
        );
    }
    Ok(())
}

/// Calls `GET {server_url}/api/geo-free?brand={brand}`.
///
/// # Errors
///
/// Returns the server's `error` message for a non-2xx response that carries
/// one, otherwise a transport or decoding error.
pub(crate) async fn fetch_geo_free(
    client: &reqwest::Client,
    server_url: &str,
    brand: &str,
) -> anyhow::Result<GeoLiteResult> {
    let mut url = Url::parse(&format!(
        "{}/api/geo-free",
        server_url.trim_end_matches('/')
    ))
    .with_context(|| format!("invalid server URL '{server_url}'"))?;
    url.query_pairs_mut().append_pair("brand", brand);

    tracing::debug!(url = %url, "requesting free-tier score");
    let response = client
        .get(url)
        .send()
        .await
        .context("free-tier request failed")?;

    let status = response.status();
    let body = response
        .text()
        .await
        .context("failed to read free-tier response")?;

    if !status.is_success() {
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_owned));
        match message {
            Some(message) => anyhow::bail!("{message}"),
            None => anyhow::bail!("server returned {status}"),
        }
    }

    serde_json::from_str(&body).context("failed to decode free-tier response")
}

#[cfg(test)]
#[path = "scout_test.rs"]
mod tests;
