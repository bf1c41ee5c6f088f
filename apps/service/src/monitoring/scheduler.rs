use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use futures::stream;
use tokio::time::{sleep, timeout};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::checker::Prober;
use super::clock::Clock;
use super::types::{CycleReport, ProbeOutcome, SiteCheck};
use crate::config::MonitorConfig;
use crate::database::{Site, SiteUpdate, StatusStore, StoreError, WriteOutcome};

/// Slack on top of the probe timeout before the scheduler gives up on a prober.
const PROBE_GRACE: Duration = Duration::from_secs(1);

/// Timing and fan-out of the monitor loop
#[derive(Debug, Clone)]
pub struct MonitorSettings {
    /// Pause between the end of one cycle and the start of the next.
    pub interval: Duration,
    pub probe_timeout: Duration,
    pub max_concurrent_probes: usize,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
            probe_timeout: Duration::from_secs(10),
            max_concurrent_probes: 16,
        }
    }
}

impl From<&MonitorConfig> for MonitorSettings {
    fn from(config: &MonitorConfig) -> Self {
        Self {
            interval: Duration::from_secs(config.interval_seconds),
            probe_timeout: Duration::from_secs(config.probe_timeout_seconds),
            max_concurrent_probes: config.max_concurrent_probes,
        }
    }
}

/// Monitoring scheduler - periodically probes every stored site and
/// writes back the ones whose status flipped.
pub struct MonitorScheduler {
    store: Arc<dyn StatusStore>,
    prober: Arc<dyn Prober>,
    clock: Arc<dyn Clock>,
    settings: MonitorSettings,
}

impl MonitorScheduler {
    pub fn new(
        store: Arc<dyn StatusStore>,
        prober: Arc<dyn Prober>,
        clock: Arc<dyn Clock>,
        settings: MonitorSettings,
    ) -> Self {
        Self { store, prober, clock, settings }
    }

    /// Run one fetch → probe → write-back pass.
    ///
    /// Fails only when the snapshot cannot be read. Once `cancel` fires no
    /// further probes start; probes already running finish and are written.
    pub async fn run_cycle(&self, cancel: &CancellationToken) -> Result<CycleReport, StoreError> {
        let snapshot = self.store.list_all().await?;

        let mut report = CycleReport { checked: snapshot.len(), ..Default::default() };
        if snapshot.is_empty() {
            debug!("No sites registered, nothing to probe");
            return Ok(report);
        }

        let checks: Vec<SiteCheck> = stream::iter(snapshot)
            .take_until(cancel.cancelled())
            .map(|site| self.check_site(site))
            .buffer_unordered(self.settings.max_concurrent_probes.max(1))
            .collect()
            .await;

        for check in checks {
            report.record(check);
        }
        report.skipped = report.checked - report.probed();

        Ok(report)
    }

    async fn check_site(&self, site: Site) -> SiteCheck {
        let deadline = self.settings.probe_timeout + PROBE_GRACE;
        let outcome = timeout(deadline, self.prober.probe(&site.url))
            .await
            .unwrap_or(ProbeOutcome::Timeout);

        let status = outcome.is_up();
        if status == site.status {
            debug!("{} ({}) unchanged: {}", site.url, site.id, outcome);
            return SiteCheck::Unchanged;
        }

        // Stamped once the probe has settled, never earlier than the site itself.
        let last_changed = self.clock.now().max(site.last_changed);
        let update = SiteUpdate { status, last_changed };
        match self.store.update(site.id, update).await {
            Ok(WriteOutcome::Applied) => {
                info!(
                    "{} ({}) is now {}: {}",
                    site.url,
                    site.id,
                    if status { "UP" } else { "DOWN" },
                    outcome
                );
                SiteCheck::Changed
            }
            Ok(WriteOutcome::Missing) => {
                debug!("{} ({}) was removed before its status could be written", site.url, site.id);
                SiteCheck::Stale
            }
            Err(e) => {
                warn!("Failed to write status for {} ({}): {}", site.url, site.id, e);
                SiteCheck::WriteFailed
            }
        }
    }

    /// Loop until cancelled. Store outages skip a cycle, never end the loop.
    pub async fn run(self, cancel: CancellationToken) {
        info!(
            "Monitor started (interval {:?}, probe timeout {:?}, concurrency {})",
            self.settings.interval, self.settings.probe_timeout, self.settings.max_concurrent_probes
        );

        while !cancel.is_cancelled() {
            match self.run_cycle(&cancel).await {
                Ok(report) if report.changed + report.stale + report.write_failures > 0 => {
                    info!("Monitor cycle finished: {}", report);
                }
                Ok(report) => debug!("Monitor cycle finished: {}", report),
                Err(e) => warn!("Monitor cycle skipped, will retry next cycle: {}", e),
            }

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = sleep(self.settings.interval) => {}
            }
        }

        info!("Monitor stopped");
    }

    /// Spawn [`run`](Self::run) as a background task.
    pub fn spawn(self, cancel: CancellationToken) -> tokio::task::JoinHandle<()> {
        tokio::spawn(self.run(cancel))
    }
}
