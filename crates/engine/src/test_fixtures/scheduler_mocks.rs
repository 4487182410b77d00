//! Fake tick scheduler for deterministic engine tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::infrastructure::ports::{TickScheduler, TickTicket};
use crate::use_cases::clock::{ClockEngine, TickOutcome};

/// One call the engine made on the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerCall {
    Schedule(TickTicket, Duration),
    Cancel(TickTicket),
}

#[derive(Debug, Default)]
struct SchedulerLog {
    calls: Vec<SchedulerCall>,
    live: Option<(TickTicket, Duration)>,
    /// Interval of the schedule each fired tick belonged to
    fired: Vec<Duration>,
}

/// Scheduler that never fires by itself; tests fire ticks through the paired handle.
pub struct FakeScheduler {
    log: Arc<Mutex<SchedulerLog>>,
}

/// Test-side view of a `FakeScheduler` after it was moved into an engine.
#[derive(Clone)]
pub struct SchedulerHandle {
    log: Arc<Mutex<SchedulerLog>>,
}

impl FakeScheduler {
    pub fn new() -> (Self, SchedulerHandle) {
        let log = Arc::new(Mutex::new(SchedulerLog::default()));
        (
            Self { log: log.clone() },
            SchedulerHandle { log },
        )
    }
}

impl TickScheduler for FakeScheduler {
    fn schedule(&mut self, ticket: TickTicket, interval: Duration) {
        let mut log = self.log.lock().unwrap();
        log.calls.push(SchedulerCall::Schedule(ticket, interval));
        log.live = Some((ticket, interval));
    }

    fn cancel(&mut self, ticket: TickTicket) {
        let mut log = self.log.lock().unwrap();
        log.calls.push(SchedulerCall::Cancel(ticket));
        if matches!(log.live, Some((live, _)) if live == ticket) {
            log.live = None;
        }
    }
}

impl SchedulerHandle {
    pub fn calls(&self) -> Vec<SchedulerCall> {
        self.log.lock().unwrap().calls.clone()
    }

    pub fn live(&self) -> Option<(TickTicket, Duration)> {
        self.log.lock().unwrap().live
    }

    pub fn live_ticket(&self) -> Option<TickTicket> {
        self.live().map(|(ticket, _)| ticket)
    }

    pub fn live_interval(&self) -> Option<Duration> {
        self.live().map(|(_, interval)| interval)
    }

    /// Intervals of the schedules every fired tick was delivered under.
    pub fn fired_intervals(&self) -> Vec<Duration> {
        self.log.lock().unwrap().fired.clone()
    }

    /// Fire one tick of the live schedule, as a timer would.
    ///
    /// Returns `None` when nothing is scheduled.
    pub fn fire(&self, engine: &mut ClockEngine) -> Option<TickOutcome> {
        let (ticket, interval) = self.live()?;
        self.log.lock().unwrap().fired.push(interval);
        Some(engine.on_tick(ticket))
    }

    /// Fire up to `count` ticks, stopping early once nothing is scheduled.
    pub fn fire_many(&self, engine: &mut ClockEngine, count: usize) -> Vec<TickOutcome> {
        (0..count).map_while(|_| self.fire(engine)).collect()
    }
}
