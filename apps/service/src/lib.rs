//! SiteWatch service - website uptime tracking core
//!
//! A background [`MonitorScheduler`](monitoring::MonitorScheduler) probes every
//! registered site on a fixed period and writes back only status changes to
//! a [`StatusStore`](database::StatusStore). The
//! [`SiteRegistry`](registry::SiteRegistry) adds, removes and lists sites
//! concurrently with it.

pub mod config;
pub mod database;
pub mod monitoring;
pub mod pool;
pub mod registry;
pub mod validation;

pub use config::Config;
pub use database::{StatusStore, open_store};
pub use monitoring::{HttpProber, MonitorScheduler, MonitorSettings, SystemClock};
pub use registry::SiteRegistry;
