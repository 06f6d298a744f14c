//! Injected dependencies that are not storage.

use chrono::{DateTime, Utc};

/// Source of the current time.
///
/// Services take a `Clock` instead of calling `Utc::now()` so tests can pin
/// `created_at` timestamps.
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
