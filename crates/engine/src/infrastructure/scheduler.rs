//! Tokio-backed tick scheduling.
//!
//! `TokioTickScheduler` is the engine-side handle: it only publishes the
//! current schedule on a watch channel and never blocks. `run_tick_driver`
//! is the background task that owns the timer, re-arming it whenever the
//! published schedule changes and delivering ticks to the engine.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex};
use tokio::time::{Instant, MissedTickBehavior};

use crate::infrastructure::ports::{TickScheduler, TickTicket};
use crate::use_cases::clock::{ClockEngine, TickOutcome};

/// Shortest period the driver will arm a timer with.
pub const MIN_TICK_PERIOD: Duration = Duration::from_millis(1);

/// The schedule currently requested by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSchedule {
    pub ticket: TickTicket,
    pub interval: Duration,
}

pub struct TokioTickScheduler {
    tx: watch::Sender<Option<TickSchedule>>,
}

impl TokioTickScheduler {
    /// Create a scheduler and the receiver its driver listens on.
    pub fn new() -> (Self, watch::Receiver<Option<TickSchedule>>) {
        let (tx, rx) = watch::channel(None);
        (Self { tx }, rx)
    }
}

impl TickScheduler for TokioTickScheduler {
    fn schedule(&mut self, ticket: TickTicket, interval: Duration) {
        self.tx.send_replace(Some(TickSchedule { ticket, interval }));
    }

    fn cancel(&mut self, ticket: TickTicket) {
        // A cancel for a schedule that was already replaced must not clear the new one
        self.tx.send_if_modified(|current| match current {
            Some(schedule) if schedule.ticket == ticket => {
                *current = None;
                true
            }
            _ => false,
        });
    }
}

/// Deliver ticks to `engine` according to the schedules published on `schedules`.
///
/// Runs until the scheduler handle is dropped. The first tick of a schedule
/// fires one full interval after it was published; late ticks are delayed
/// rather than bunched up.
pub async fn run_tick_driver(
    engine: Arc<Mutex<ClockEngine>>,
    mut schedules: watch::Receiver<Option<TickSchedule>>,
) {
    tracing::info!("Starting tick driver");

    loop {
        let current = *schedules.borrow_and_update();

        let Some(schedule) = current else {
            if schedules.changed().await.is_err() {
                break;
            }
            continue;
        };

        let period = schedule.interval.max(MIN_TICK_PERIOD);
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tracing::debug!(
            ticket = %schedule.ticket,
            period_ms = period.as_millis() as u64,
            "Tick timer armed"
        );

        loop {
            tokio::select! {
                biased;
                changed = schedules.changed() => {
                    if changed.is_err() {
                        tracing::info!("Tick driver stopped");
                        return;
                    }
                    break;
                }
                _ = ticker.tick() => {
                    let outcome = engine.lock().await.on_tick(schedule.ticket);
                    if outcome == TickOutcome::Expired {
                        tracing::debug!(ticket = %schedule.ticket, "Tick schedule ended by countdown expiry");
                    }
                }
            }
        }
    }

    tracing::info!("Tick driver stopped");
}
