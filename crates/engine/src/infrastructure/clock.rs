//! Wall-clock implementations.

use chrono::{DateTime, Local};

use crate::infrastructure::ports::ClockPort;

/// System clock - uses the host's local time.
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockPort for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Fixed clock for testing.
#[cfg(test)]
pub struct FixedClock(pub DateTime<Local>);

#[cfg(test)]
impl FixedClock {
    /// Today at the given local wall time.
    pub fn at(hour: u32, minute: u32, second: u32) -> Self {
        use chrono::TimeZone;

        let date = Local::now().date_naive();
        let naive = date
            .and_hms_opt(hour, minute, second)
            .unwrap_or_else(|| panic!("invalid test time {hour}:{minute}:{second}"));
        Self(Local.from_local_datetime(&naive).earliest().unwrap_or_else(Local::now))
    }
}

#[cfg(test)]
impl ClockPort for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}
