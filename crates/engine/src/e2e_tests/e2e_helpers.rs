//! E2E test helpers for constructing the full application stack.
//!
//! Provides a fully-wired `ClockApp` (tokio scheduler and tick driver) plus a
//! wall clock that follows tokio's paused time, so real-time scenarios are
//! deterministic.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone};
use tokio::time::Instant;

use crate::api::ClockCommand;
use crate::app::{ClockApp, CommandOutcome};
use crate::infrastructure::ports::ClockPort;
use crate::infrastructure::settings::ClockSettings;
use crate::test_fixtures::RecordingNotifier;

// =============================================================================
// Paused Wall Clock
// =============================================================================

/// Wall clock that starts at a fixed local time and advances with tokio time.
pub struct PausedWallClock {
    base: DateTime<Local>,
    origin: Instant,
}

impl PausedWallClock {
    /// Today at the given local time, from the current tokio instant.
    pub fn starting_at(hour: u32, minute: u32, second: u32) -> Self {
        let naive = Local::now()
            .date_naive()
            .and_hms_opt(hour, minute, second)
            .expect("valid wall time");
        let base = Local
            .from_local_datetime(&naive)
            .earliest()
            .expect("unambiguous local time");
        Self {
            base,
            origin: Instant::now(),
        }
    }
}

impl ClockPort for PausedWallClock {
    fn now(&self) -> DateTime<Local> {
        let elapsed = chrono::Duration::from_std(self.origin.elapsed())
            .unwrap_or_else(|_| chrono::Duration::zero());
        self.base + elapsed
    }
}

// =============================================================================
// Test Context
// =============================================================================

/// A running `ClockApp` with a recording notifier attached.
pub struct E2EClockContext {
    pub app: ClockApp,
    pub notifier: Arc<RecordingNotifier>,
}

impl E2EClockContext {
    pub fn setup(settings: ClockSettings, clock: Arc<dyn ClockPort>) -> Self {
        let notifier = Arc::new(RecordingNotifier::new());
        let app = ClockApp::new(&settings, clock, Some(notifier.clone()))
            .expect("valid settings");
        Self { app, notifier }
    }

    /// Parse and execute host command lines in order, panicking on any failure.
    pub async fn run(&self, lines: &[&str]) -> Vec<CommandOutcome> {
        let mut outcomes = Vec::with_capacity(lines.len());
        for line in lines {
            let command: ClockCommand = line
                .parse()
                .unwrap_or_else(|e| panic!("command '{line}' should parse: {e}"));
            let outcome = self
                .app
                .execute(command)
                .await
                .unwrap_or_else(|e| panic!("command '{line}' should succeed: {e}"));
            outcomes.push(outcome);
        }
        outcomes
    }

    pub async fn time(&self) -> String {
        self.app.snapshot().await.time.to_string()
    }
}
