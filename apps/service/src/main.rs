use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use sitewatch_service::{Config, HttpProber, MonitorScheduler, MonitorSettings, SystemClock, open_store};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Run the SiteWatch monitor without the HTTP API.
#[derive(Debug, Parser)]
#[command(name = "sitewatch-monitor", version, about)]
struct Args {
    /// Path to the TOML config file (created with defaults if missing)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run a single cycle, log the report and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    logger::init_tracing();

    let args = Args::parse();
    let config = Config::from_config(args.config.as_deref())?.with_env_overrides()?;
    config.validate()?;
    tracing::debug!("{}", config);

    let store = open_store(&config.store).await?;
    let settings = MonitorSettings::from(&config.monitor);
    let prober = HttpProber::new(settings.probe_timeout).context("failed to build HTTP client")?;
    let scheduler = MonitorScheduler::new(store, Arc::new(prober), Arc::new(SystemClock), settings);

    let cancel = CancellationToken::new();

    if args.once {
        let report = scheduler.run_cycle(&cancel).await?;
        info!("Cycle finished: {}", report);
        return Ok(());
    }

    let handle = scheduler.spawn(cancel.clone());

    tokio::signal::ctrl_c().await.context("failed to listen for ctrl-c")?;
    info!("Shutdown requested, finishing in-flight probes");
    cancel.cancel();

    // Each in-flight probe has its own deadline, so this join is bounded.
    handle.await.context("monitor task ended abnormally")?;

    Ok(())
}
