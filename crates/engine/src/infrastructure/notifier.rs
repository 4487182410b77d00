//! Clock event observers.

use std::sync::Arc;

use crate::infrastructure::ports::{ClockNotifier, ClockPort};

/// Reports clock events through `tracing`, stamped with the wall time.
pub struct TracingNotifier {
    clock: Arc<dyn ClockPort>,
}

impl TracingNotifier {
    pub fn new(clock: Arc<dyn ClockPort>) -> Self {
        Self { clock }
    }

    fn wall_time(&self) -> String {
        self.clock.now().format("%H:%M:%S").to_string()
    }
}

impl ClockNotifier for TracingNotifier {
    fn time_is_set_manually(&self) {
        tracing::info!(wall_time = %self.wall_time(), "Time is set manually");
    }

    fn clock_stopped(&self) {
        tracing::info!(wall_time = %self.wall_time(), "Clock stopped");
    }

    fn count_down_expired(&self) {
        tracing::info!(wall_time = %self.wall_time(), "Countdown expired");
    }
}
