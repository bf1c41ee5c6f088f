/// Monitoring engine module - keeps every stored site's status current
///
/// This module is responsible for:
/// - Probing URLs with a bounded timeout (`checker`)
/// - Running the periodic fetch → probe → write-back cycle (`scheduler`)
/// - Stamping status transitions with an injectable clock (`clock`)
pub mod checker;
pub mod clock;
pub mod scheduler;
pub mod types;

pub use checker::{HttpProber, Prober};
pub use clock::{Clock, ManualClock, SystemClock};
pub use scheduler::{MonitorScheduler, MonitorSettings};
pub use types::{CycleReport, ProbeOutcome};
