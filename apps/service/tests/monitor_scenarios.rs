//! End-to-end monitor scenarios against both store backends.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use sitewatch_service::config::{StoreBackend, StoreConfig};
use sitewatch_service::database::StatusStore;
use sitewatch_service::monitoring::{ManualClock, ProbeOutcome, Prober};
use sitewatch_service::registry::RegistryError;
use sitewatch_service::{MonitorScheduler, MonitorSettings, SiteRegistry, open_store};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

const OK: ProbeOutcome = ProbeOutcome::Up { status_code: 200, latency_ms: 3 };

/// Answers each URL with whatever outcome is currently configured for it.
#[derive(Default)]
struct StubProber {
    outcomes: Mutex<HashMap<String, ProbeOutcome>>,
    delay: Option<Duration>,
}

impl StubProber {
    fn set(&self, url: &str, outcome: ProbeOutcome) {
        self.outcomes.lock().unwrap().insert(url.to_string(), outcome);
    }
}

#[async_trait]
impl Prober for StubProber {
    async fn probe(&self, url: &str) -> ProbeOutcome {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.outcomes.lock().unwrap().get(url).cloned().unwrap_or(OK)
    }
}

struct Harness {
    store: Arc<dyn StatusStore>,
    registry: SiteRegistry,
    scheduler: MonitorScheduler,
    prober: Arc<StubProber>,
    clock: Arc<ManualClock>,
    _dir: TempDir,
}

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap()
}

async fn harness(backend: StoreBackend, prober: StubProber) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig { backend, path: dir.path().join("sites.db"), pool_size: 4 };
    let store = open_store(&config).await.unwrap();
    let prober = Arc::new(prober);
    let clock = Arc::new(ManualClock::new(t0()));

    let registry = SiteRegistry::new(store.clone(), clock.clone(), "s3cret");
    let scheduler =
        MonitorScheduler::new(store.clone(), prober.clone(), clock.clone(), MonitorSettings::default());

    Harness { store, registry, scheduler, prober, clock, _dir: dir }
}

async fn cycle(h: &Harness) {
    h.scheduler.run_cycle(&CancellationToken::new()).await.unwrap();
}

async fn flip_flop_scenario(backend: StoreBackend) {
    let h = harness(backend, StubProber::default()).await;
    let a = h.registry.add_site(Some("http://ok.example")).await.unwrap();
    let b = h.registry.add_site(Some("http://b.example")).await.unwrap();

    // First cycle: A answers 200, B times out.
    h.prober.set("http://b.example", ProbeOutcome::Timeout);
    let first_cycle = t0() + chrono::Duration::seconds(30);
    h.clock.set(first_cycle);
    cycle(&h).await;

    let sites = h.store.list_all().await.unwrap();
    assert_eq!(sites[0].id, a.id);
    assert!(sites[0].status);
    assert_eq!(sites[0].last_changed, t0(), "unchanged status must not restamp");
    assert_eq!(sites[1].id, b.id);
    assert!(!sites[1].status);
    assert_eq!(sites[1].last_changed, first_cycle);

    // Second cycle: B recovers.
    h.prober.set("http://b.example", OK);
    let second_cycle = first_cycle + chrono::Duration::seconds(30);
    h.clock.set(second_cycle);
    cycle(&h).await;

    let sites = h.store.list_all().await.unwrap();
    assert!(sites[1].status);
    assert_eq!(sites[1].last_changed, second_cycle);
    assert_eq!(sites[0].last_changed, t0());
}

#[tokio::test]
async fn test_flip_flop_memory() {
    flip_flop_scenario(StoreBackend::Memory).await;
}

#[tokio::test]
async fn test_flip_flop_libsql() {
    flip_flop_scenario(StoreBackend::Libsql).await;
}

#[tokio::test]
async fn test_down_site_keeps_its_timestamp_across_cycles() {
    let h = harness(StoreBackend::Libsql, StubProber::default()).await;
    h.registry.add_site(Some("http://down.example")).await.unwrap();
    h.prober.set("http://down.example", ProbeOutcome::connection_error("refused"));

    let went_down = t0() + chrono::Duration::seconds(30);
    h.clock.set(went_down);
    cycle(&h).await;

    for _ in 0..5 {
        h.clock.advance(chrono::Duration::seconds(30));
        cycle(&h).await;
    }

    let site = &h.store.list_all().await.unwrap()[0];
    assert!(!site.status);
    assert_eq!(site.last_changed, went_down);
}

#[tokio::test]
async fn test_wrong_secret_is_forbidden_and_mutates_nothing() {
    let h = harness(StoreBackend::Libsql, StubProber::default()).await;
    h.registry.add_site(Some("http://keep.example")).await.unwrap();
    let before = h.store.list_all().await.unwrap();

    let result = h.registry.delete_site(Some("http://keep.example"), Some("wrong")).await;

    assert!(matches!(result, Err(RegistryError::Forbidden)));
    assert_eq!(h.store.list_all().await.unwrap(), before);
}

/// Removes the site through the registry while its probe is still running.
struct DeletingProber {
    registry: SiteRegistry,
}

#[async_trait]
impl Prober for DeletingProber {
    async fn probe(&self, url: &str) -> ProbeOutcome {
        self.registry.delete_site(Some(url), Some("s3cret")).await.unwrap();
        ProbeOutcome::Timeout
    }
}

#[tokio::test]
async fn test_deleted_site_is_dropped_from_later_cycles() {
    let h = harness(StoreBackend::Libsql, StubProber::default()).await;
    h.registry.add_site(Some("http://gone.example")).await.unwrap();
    let prober = DeletingProber { registry: SiteRegistry::new(h.store.clone(), h.clock.clone(), "s3cret") };
    let scheduler =
        MonitorScheduler::new(h.store.clone(), Arc::new(prober), h.clock.clone(), MonitorSettings::default());

    let report = scheduler.run_cycle(&CancellationToken::new()).await.unwrap();
    assert_eq!(report.stale, 1);
    assert_eq!(report.changed, 0);
    assert!(h.store.list_all().await.unwrap().is_empty());

    let report = scheduler.run_cycle(&CancellationToken::new()).await.unwrap();
    assert_eq!(report.checked, 0);
}

/// Readers listing sites while a cycle writes must see each record either
/// before (up, t0) or after (down, cycle time), never a mix.
async fn no_torn_reads(backend: StoreBackend) {
    let prober = StubProber { delay: Some(Duration::from_millis(2)), ..Default::default() };
    let h = harness(backend, prober).await;
    for i in 0..20 {
        let url = format!("http://site{i}.example");
        h.registry.add_site(Some(url.as_str())).await.unwrap();
        h.prober.set(&url, ProbeOutcome::Timeout);
    }
    let cycle_time = t0() + chrono::Duration::seconds(30);
    h.clock.set(cycle_time);

    let h = Arc::new(h);
    let reader = {
        let h = h.clone();
        tokio::spawn(async move {
            let mut observed = 0;
            for _ in 0..50 {
                for site in h.registry.list_sites().await.unwrap() {
                    observed += 1;
                    let full = h
                        .store
                        .list_all()
                        .await
                        .unwrap()
                        .into_iter()
                        .find(|s| s.id == site.id)
                        .unwrap();
                    let consistent = (full.status && full.last_changed == t0())
                        || (!full.status && full.last_changed == cycle_time);
                    assert!(consistent, "torn record: {full:?}");
                }
                tokio::task::yield_now().await;
            }
            observed
        })
    };

    h.scheduler.run_cycle(&CancellationToken::new()).await.unwrap();
    assert!(reader.await.unwrap() > 0);
    assert!(h.store.list_all().await.unwrap().iter().all(|s| !s.status));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_no_torn_reads_memory() {
    no_torn_reads(StoreBackend::Memory).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_no_torn_reads_libsql() {
    no_torn_reads(StoreBackend::Libsql).await;
}
