//! Ports the clock engine drives: the tick source and the event observer.

use std::time::Duration;

// =============================================================================
// Tick Scheduling
// =============================================================================

/// Identifies one scheduled run of periodic ticks.
///
/// A fresh ticket is issued every time ticking (re)starts. The engine only
/// accepts ticks carrying the current ticket, so a tick that was already in
/// flight when the schedule changed is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TickTicket(u64);

impl TickTicket {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn next(&self) -> TickTicket {
        TickTicket(self.0.wrapping_add(1))
    }
}

impl std::fmt::Display for TickTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Periodic tick source owned by the engine.
///
/// Implementations deliver `ClockEngine::on_tick(ticket)` every `interval`
/// until the ticket is cancelled or replaced. At most one ticket is live.
pub trait TickScheduler: Send {
    /// Start delivering `ticket` every `interval`, replacing any live ticket.
    fn schedule(&mut self, ticket: TickTicket, interval: Duration);

    /// Stop delivering `ticket`. Unknown or already replaced tickets are ignored.
    fn cancel(&mut self, ticket: TickTicket);
}

// =============================================================================
// Clock Events
// =============================================================================

/// Observer for the events a UI layer reacts to.
///
/// Called synchronously while the engine is being mutated; implementations
/// must not call back into the engine.
#[cfg_attr(test, mockall::automock)]
pub trait ClockNotifier: Send + Sync {
    /// Once per successful manual time set.
    fn time_is_set_manually(&self);

    /// Once per Running -> Stopped transition.
    fn clock_stopped(&self);

    /// Once when a countdown reaches 00:00:00, after `clock_stopped`.
    fn count_down_expired(&self);
}
