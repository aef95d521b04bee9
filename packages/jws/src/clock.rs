//! Wall-clock source for `iat` and time-window checks

use chrono::Utc;
use std::fmt::Debug;

/// Source of the current Unix time in seconds
pub trait Clock: Debug + Send + Sync + 'static {
    /// Current time, fractional Unix seconds
    fn now(&self) -> f64;
}

/// Calendar time from the system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        let now = Utc::now();
        now.timestamp() as f64 + f64::from(now.timestamp_subsec_micros()) / 1_000_000.0
    }
}

/// Clock frozen at a fixed instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedClock(pub f64);

impl Clock for FixedClock {
    fn now(&self) -> f64 {
        self.0
    }
}
