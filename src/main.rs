use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use covidstats::{config::Config, fetch, snapshot::date_from_dmy, QueryError};
use reqwest::Client;
use std::env;
use tracing::{debug, error, info};
use tracing_subscriber::{fmt, EnvFilter};

const REGION: &str = "Poland";
const TOP_N: usize = 5;

/// `D/M/YYYY`, the order the reference scripts take their arguments in.
fn parse_date_arg(arg: &str) -> Result<NaiveDate> {
    let parts: Vec<&str> = arg.trim().split('/').collect();
    if parts.len() != 3 {
        bail!("expected D/M/YYYY, got `{}`", arg);
    }
    let day: u32 = parts[0].parse().with_context(|| format!("day in `{}`", arg))?;
    let month: u32 = parts[1].parse().with_context(|| format!("month in `{}`", arg))?;
    let year: i32 = parts[2].parse().with_context(|| format!("year in `{}`", arg))?;
    Ok(date_from_dmy(day, month, year)?)
}

/// Print a query result, or log why it has none.
fn report<T: std::fmt::Debug>(label: &str, result: Result<T, QueryError>) {
    match result {
        Ok(v) => println!("{}: {:?}", label, v),
        Err(e @ QueryError::KeyNotFound { .. }) => {
            info!("{}: not reported yet ({})", label, e);
            println!("{}: n/a", label);
        }
        Err(e) => {
            error!("{}: {}", label, e);
            println!("{}: error", label);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) config + logging ─────────────────────────────────────────
    let config = Config::from_env()?;
    let env = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();
    info!("startup");
    debug!(?config, "configuration");

    // ─── 2) query date ───────────────────────────────────────────────
    let date = match env::args().nth(1) {
        Some(arg) => parse_date_arg(&arg)?,
        None => date_from_dmy(27, 3, 2020)?,
    };
    info!(%date, "query date");

    // ─── 3) load the snapshot once ───────────────────────────────────
    let client = Client::new();
    let snapshot = fetch::load_snapshot(&client, &config).await?;

    // ─── 4) run queries ──────────────────────────────────────────────
    report(
        &format!("{} confirmed cases", REGION),
        snapshot.cases_for_region(REGION, date),
    );
    report(
        &format!("Top {} countries", TOP_N),
        snapshot.top_regions(date, TOP_N),
    );
    report(
        "Unchanged since previous day",
        snapshot.unchanged_from_previous_day(date),
    );
    report(
        "Cases but no deaths",
        snapshot.no_deaths_with_cases(date),
    );
    report(
        "More recovered than deaths",
        snapshot.more_recovered_than_deaths(date),
    );

    info!("all done");
    Ok(())
}
