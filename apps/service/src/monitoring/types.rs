use std::fmt;

/// Classified result of a single probe.
///
/// Only the projection [`ProbeOutcome::is_up`] reaches the store; the
/// variants are kept for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Up { status_code: u16, latency_ms: u64 },
    Timeout,
    ConnectionError { reason: String },
    UnexpectedStatus { status_code: u16 },
}

impl ProbeOutcome {
    pub fn connection_error(reason: impl Into<String>) -> Self {
        ProbeOutcome::ConnectionError { reason: reason.into() }
    }

    pub fn is_up(&self) -> bool {
        matches!(self, ProbeOutcome::Up { .. })
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeOutcome::Up { status_code, latency_ms } => {
                write!(f, "up ({status_code}, {latency_ms} ms)")
            }
            ProbeOutcome::Timeout => write!(f, "timed out"),
            ProbeOutcome::ConnectionError { reason } => write!(f, "connection error: {reason}"),
            ProbeOutcome::UnexpectedStatus { status_code } => {
                write!(f, "unexpected status {status_code}")
            }
        }
    }
}

/// What happened to one site during a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteCheck {
    Unchanged,
    Changed,
    /// Status flipped but the record was deleted before the write-back.
    Stale,
    WriteFailed,
}

/// Tally of one monitor cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Sites in the snapshot.
    pub checked: usize,
    pub unchanged: usize,
    pub changed: usize,
    pub stale: usize,
    pub write_failures: usize,
    /// Sites not probed because the monitor was cancelled mid-cycle.
    pub skipped: usize,
}

impl CycleReport {
    pub(crate) fn record(&mut self, check: SiteCheck) {
        match check {
            SiteCheck::Unchanged => self.unchanged += 1,
            SiteCheck::Changed => self.changed += 1,
            SiteCheck::Stale => self.stale += 1,
            SiteCheck::WriteFailed => self.write_failures += 1,
        }
    }

    /// Number of sites that actually received a probe.
    pub fn probed(&self) -> usize {
        self.unchanged + self.changed + self.stale + self.write_failures
    }
}

impl fmt::Display for CycleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} sites: {} unchanged, {} changed, {} stale, {} write failures, {} skipped",
            self.checked, self.unchanged, self.changed, self.stale, self.write_failures, self.skipped
        )
    }
}
