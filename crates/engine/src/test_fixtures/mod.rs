//! Test fixtures and common test helpers.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_fixtures::TestEngine;
//!
//! #[test]
//! fn ticks_forward() {
//!     let mut t = TestEngine::new();
//!     t.engine.start();
//!     t.scheduler.fire(&mut t.engine);
//! }
//! ```

pub mod notifier_mocks;
pub mod scheduler_mocks;

use std::sync::Arc;

use clockwork_domain::TimeComponents;

use crate::infrastructure::clock::FixedClock;
use crate::use_cases::clock::{ClockEngine, ClockEngineConfig};

pub use notifier_mocks::{ClockEvent, RecordingNotifier};
pub use scheduler_mocks::{FakeScheduler, SchedulerCall, SchedulerHandle};

// =============================================================================
// Engine Harness
// =============================================================================

/// Wall time reported by the harness clock.
pub const WALL_TIME: (u32, u32, u32) = (14, 30, 5);

/// An engine wired to a fake scheduler, a fixed clock and a recording notifier.
pub struct TestEngine {
    pub engine: ClockEngine,
    pub scheduler: SchedulerHandle,
    pub notifier: Arc<RecordingNotifier>,
}

impl TestEngine {
    pub fn new() -> Self {
        Self::with_config(ClockEngineConfig::default())
    }

    pub fn with_config(config: ClockEngineConfig) -> Self {
        let (scheduler, handle) = FakeScheduler::new();
        let notifier = Arc::new(RecordingNotifier::new());
        let (hour, minute, second) = WALL_TIME;
        let engine = ClockEngine::new(
            config,
            Box::new(scheduler),
            Arc::new(FixedClock::at(hour, minute, second)),
        )
        .with_notifier(notifier.clone());
        Self {
            engine,
            scheduler: handle,
            notifier,
        }
    }

    /// Engine starting at the given time with manual sets allowed.
    pub fn starting_at(hour: u32, minute: u32, second: u32) -> Self {
        Self::with_config(ClockEngineConfig {
            start_time: hms(hour, minute, second),
            manual_time_set_allowed: true,
            ..ClockEngineConfig::default()
        })
    }

    pub fn fire(&mut self) -> Option<crate::use_cases::clock::TickOutcome> {
        self.scheduler.fire(&mut self.engine)
    }

    pub fn fire_many(&mut self, count: usize) -> Vec<crate::use_cases::clock::TickOutcome> {
        self.scheduler.fire_many(&mut self.engine, count)
    }

    pub fn time(&self) -> String {
        self.engine.time().to_string()
    }
}

impl Default for TestEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Shorthand for a valid triple.
pub fn hms(hour: u32, minute: u32, second: u32) -> TimeComponents {
    TimeComponents::new(hour, minute, second)
        .unwrap_or_else(|e| panic!("invalid fixture time: {e}"))
}
