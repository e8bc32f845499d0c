use anyhow::{Context, Result};
use countrysync::{update_geonames_data_with, SyncConfig};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .with_writer(std::io::stderr)
        .init();
    info!("startup");

    // ─── 2) configure from env ───────────────────────────────────────
    let config = SyncConfig::from_env().context("reading configuration")?;
    info!(
        source = %config.source_url,
        store = %config.store_path.display(),
        "configured"
    );

    // ─── 3) fetch, parse, upsert ─────────────────────────────────────
    let stats = update_geonames_data_with(&config)
        .await
        .context("updating countries from geonames")?;

    println!("{}", serde_json::to_string(&stats)?);
    Ok(())
}
