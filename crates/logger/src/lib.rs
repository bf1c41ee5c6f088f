//! Process-wide tracing setup shared by the SiteWatch binaries.

mod tracing;

pub use self::tracing::{LogFormat, init, init_tracing};
