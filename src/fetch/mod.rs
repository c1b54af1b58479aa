// src/fetch/mod.rs
use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};
use url::Url;

use crate::config::Config;
use crate::snapshot::Snapshot;
use crate::table::{load::read_table, Table, TableKind};

const RETRY_DELAY: Duration = Duration::from_secs(1);

/// URL of `kind`'s CSV under `base_url`.
pub fn table_url(base_url: &str, kind: TableKind) -> Result<Url> {
    // without the trailing slash `join` would replace the last segment
    let base = if base_url.ends_with('/') {
        Url::parse(base_url)
    } else {
        Url::parse(&format!("{}/", base_url))
    }
    .with_context(|| format!("parsing base URL {}", base_url))?;
    base.join(&kind.file_name())
        .with_context(|| format!("joining {} onto {}", kind.file_name(), base))
}

/// GET the CSV body for `kind`, retrying transport errors and non-success
/// statuses up to `attempts` times.
#[tracing::instrument(level = "info", skip(client))]
pub async fn fetch_table_csv(
    client: &Client,
    base_url: &str,
    kind: TableKind,
    attempts: usize,
) -> Result<String> {
    let url = table_url(base_url, kind)?;
    let mut attempt = 0;

    loop {
        attempt += 1;

        let err = match client.get(url.clone()).send().await {
            Ok(resp) if resp.status().is_success() => match resp.text().await {
                Ok(body) => {
                    info!(%url, bytes = body.len(), "downloaded");
                    return Ok(body);
                }
                Err(e) => anyhow::Error::from(e),
            },
            Ok(resp) => anyhow!("HTTP error: {}", resp.status()),
            Err(e) => anyhow::Error::from(e),
        };

        if attempt >= attempts {
            return Err(err.context(format!("GET {} failed after {} attempts", url, attempt)));
        }
        warn!(%url, attempt, error = %err, "retrying");
        sleep(RETRY_DELAY).await;
    }
}

async fn fetch_table(client: &Client, config: &Config, kind: TableKind) -> Result<Table> {
    let body = fetch_table_csv(client, &config.base_url, kind, config.fetch_retries).await?;
    read_table(kind, body.as_bytes()).with_context(|| format!("parsing downloaded {} table", kind))
}

/// Download and parse all three tables.
pub async fn fetch_snapshot(client: &Client, config: &Config) -> Result<Snapshot> {
    let (confirmed, deaths, recovered) = tokio::try_join!(
        fetch_table(client, config, TableKind::Confirmed),
        fetch_table(client, config, TableKind::Deaths),
        fetch_table(client, config, TableKind::Recovered),
    )?;
    let snapshot = Snapshot::new(confirmed, deaths, recovered)
        .context("downloaded tables do not line up")?;
    snapshot.log_summary();
    Ok(snapshot)
}

/// Local directory if configured, otherwise the network.
pub async fn load_snapshot(client: &Client, config: &Config) -> Result<Snapshot> {
    match &config.data_dir {
        Some(dir) => {
            info!(dir = %dir.display(), "loading tables from disk");
            let dir = dir.clone();
            tokio::task::spawn_blocking(move || Snapshot::load_dir(dir)).await?
        }
        None => {
            info!(base = %config.base_url, "fetching tables");
            fetch_snapshot(client, config).await
        }
    }
}
