use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Opaque identifier assigned by the store when a site is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SiteId(Uuid);

impl SiteId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for SiteId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// One monitored URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    pub id: SiteId,
    pub url: String,
    /// `true` when the last probe succeeded.
    pub status: bool,
    /// Time of the last status transition, or creation time before the first one.
    pub last_changed: DateTime<Utc>,
}

/// Input for [`StatusStore::create`](super::StatusStore::create).
#[derive(Debug, Clone)]
pub struct NewSite {
    pub url: String,
    pub created_at: DateTime<Utc>,
}

impl NewSite {
    pub fn new(url: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self { url: url.into(), created_at }
    }
}

/// The only mutation the monitor performs: status and its timestamp, together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiteUpdate {
    pub status: bool,
    pub last_changed: DateTime<Utc>,
}

/// Result of a write aimed at a single record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Applied,
    /// The record no longer exists; nothing was written.
    Missing,
}

impl WriteOutcome {
    pub fn is_applied(self) -> bool {
        matches!(self, WriteOutcome::Applied)
    }
}

/// Convert a timestamp to the millisecond integer the SQL schema stores.
pub fn timestamp_to_millis(time: DateTime<Utc>) -> i64 {
    time.timestamp_millis()
}

/// Inverse of [`timestamp_to_millis`].
pub fn millis_to_timestamp(millis: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
}
