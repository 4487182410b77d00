//! Testability port for injecting wall-clock time.

use chrono::{DateTime, Local};

// =============================================================================
// Testability Ports
// =============================================================================

/// Wall-clock source read by the RealTime drive and for expiry logging.
#[cfg_attr(test, mockall::automock)]
pub trait ClockPort: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}
