#![warn(clippy::all, clippy::pedantic)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use clap::Parser;
use sitewatch_service::monitoring::Clock;
use sitewatch_service::{
    Config, HttpProber, MonitorScheduler, MonitorSettings, SiteRegistry, SystemClock, open_store,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

mod error;
mod routes;

use error::AppError;
use logger::init_tracing;

/// SiteWatch HTTP API with the monitor running in-process.
#[derive(Debug, Parser)]
#[command(name = "sitewatch-server", version, about)]
struct Args {
    /// Path to the TOML config file (created with defaults if missing)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[actix_web::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let args = Args::parse();
    let config = Config::from_config(args.config.as_deref())?.with_env_overrides()?;
    config.validate()?;
    debug!("{config}");

    let store = open_store(&config.store).await.map_err(AppError::Startup)?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let settings = MonitorSettings::from(&config.monitor);
    let prober = HttpProber::new(settings.probe_timeout).map_err(AppError::Startup)?;
    let cancel = CancellationToken::new();
    let monitor = MonitorScheduler::new(store.clone(), Arc::new(prober), clock.clone(), settings)
        .spawn(cancel.clone());

    let registry =
        web::Data::new(SiteRegistry::new(store, clock, config.security.delete_secret.clone()));
    let addr: SocketAddr = format!("{}:{}", config.server.bind, config.server.port).parse()?;
    let served = run_server(addr, registry).await;

    info!("HTTP server stopped, shutting down monitor");
    cancel.cancel();
    if let Err(e) = monitor.await {
        warn!("Monitor task ended abnormally: {e}");
    }

    served
}

async fn run_server(addr: SocketAddr, registry: web::Data<SiteRegistry>) -> Result<(), AppError> {
    info!("Listening on http://{addr}");

    HttpServer::new(move || App::new().app_data(registry.clone()).configure(routes::routes))
        .bind(addr)?
        .run()
        .await?;

    Ok(())
}
