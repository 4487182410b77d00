//! Clock use cases.
//!
//! `ClockEngine` owns the displayed time, the rate and the drive modes and is
//! the only component with a running/stopped lifecycle. It handles:
//! - Starting and stopping periodic ticks
//! - Advancing time on each tick (wall clock, countdown or free running)
//! - Rate changes, restarting the tick so the new interval applies at once
//! - Mode switches and manual time sets

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use clockwork_domain::{
    ClockError, Direction, DriveMode, ModeController, RateBounds, RateConfig, TimeComponents,
    TimeState,
};

use crate::infrastructure::ports::{ClockNotifier, ClockPort, TickScheduler, TickTicket};


// =============================================================================
// Engine Types
// =============================================================================

/// Running/stopped lifecycle of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockLifecycle {
    Stopped,
    Running,
}

impl std::fmt::Display for ClockLifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClockLifecycle::Stopped => write!(f, "stopped"),
            ClockLifecycle::Running => write!(f, "running"),
        }
    }
}

/// Initial state for a new engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockEngineConfig {
    pub rate_bounds: RateBounds,
    pub start_time: TimeComponents,
    /// Start value used when the countdown switch is turned on
    pub countdown_start: TimeComponents,
    pub manual_time_set_allowed: bool,
}

impl Default for ClockEngineConfig {
    fn default() -> Self {
        Self {
            rate_bounds: RateBounds::default(),
            start_time: TimeComponents::MIDNIGHT,
            countdown_start: TimeComponents::from_seconds_of_day(5),
            manual_time_set_allowed: false,
        }
    }
}

/// A drive or permission change applied through `ClockEngine::reconfigure_mode`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModeChange {
    /// Switch the RealTime drive on or off
    RealTime(bool),
    /// Enter Countdown starting at the given time
    EnableCountdown(TimeComponents),
    /// Leave Countdown without expiring it
    DisableCountdown,
    /// Toggle the manual-set permission
    ManualTimeSetAllowed(bool),
}

/// What a delivered tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Stale or unexpected ticket; nothing changed
    Ignored,
    /// Time moved (or was synced) to the contained value
    Advanced(TimeComponents),
    /// Countdown reached 00:00:00 and the engine stopped itself
    Expired,
}

/// Queryable engine state for the UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockSnapshot {
    pub time: TimeComponents,
    pub drive: DriveMode,
    pub direction: Direction,
    pub signed_rate: f64,
    pub manual_time_set_allowed: bool,
    pub lifecycle: ClockLifecycle,
}

// =============================================================================
// Clock Engine
// =============================================================================

/// Timer-driven clock state machine.
///
/// All mutating calls, including `on_tick`, must be serialized by the owner
/// (see `ClockApp`, which keeps the engine behind a single async mutex).
pub struct ClockEngine {
    time: TimeState,
    rate: RateConfig,
    modes: ModeController,
    /// Ticket of the live schedule; `None` while stopped
    running: Option<TickTicket>,
    last_ticket: TickTicket,
    countdown_start: TimeComponents,
    scheduler: Box<dyn TickScheduler>,
    clock: Arc<dyn ClockPort>,
    notifier: Option<Arc<dyn ClockNotifier>>,
}

impl ClockEngine {
    pub fn new(
        config: ClockEngineConfig,
        scheduler: Box<dyn TickScheduler>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            time: TimeState::new(config.start_time),
            rate: RateConfig::new(config.rate_bounds),
            modes: ModeController::new(config.manual_time_set_allowed),
            running: None,
            last_ticket: TickTicket::new(0),
            countdown_start: config.countdown_start,
            scheduler,
            clock,
            notifier: None,
        }
    }

    /// Register the observer, replacing any previous one.
    pub fn with_notifier(mut self, notifier: Arc<dyn ClockNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn set_notifier(&mut self, notifier: Option<Arc<dyn ClockNotifier>>) {
        self.notifier = notifier;
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn time(&self) -> TimeComponents {
        self.time.to_components()
    }

    pub fn rate(&self) -> &RateConfig {
        &self.rate
    }

    pub fn modes(&self) -> &ModeController {
        &self.modes
    }

    pub fn lifecycle(&self) -> ClockLifecycle {
        if self.running.is_some() {
            ClockLifecycle::Running
        } else {
            ClockLifecycle::Stopped
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    pub fn snapshot(&self) -> ClockSnapshot {
        ClockSnapshot {
            time: self.time(),
            drive: self.modes.drive(),
            direction: self.rate.direction(),
            signed_rate: self.rate.signed_rate(),
            manual_time_set_allowed: self.modes.manual_allowed(),
            lifecycle: self.lifecycle(),
        }
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Begin ticking at the current interval. No-op while running.
    pub fn start(&mut self) {
        if self.running.is_some() {
            return;
        }
        let ticket = self.schedule_ticks();
        tracing::info!(
            ticket = %ticket,
            time = %self.time,
            rate = %self.rate,
            drive = %self.modes.drive(),
            "Clock started"
        );
    }

    /// Cancel ticking and notify `clock_stopped`. No-op while stopped.
    pub fn stop(&mut self) {
        let Some(ticket) = self.running.take() else {
            return;
        };
        self.scheduler.cancel(ticket);
        tracing::info!(ticket = %ticket, time = %self.time, "Clock stopped");
        if let Some(notifier) = &self.notifier {
            notifier.clock_stopped();
        }
    }

    /// Start/stop button: flips the lifecycle and returns the new state.
    pub fn toggle(&mut self) -> ClockLifecycle {
        if self.running.is_some() {
            self.stop();
        } else {
            self.start();
        }
        self.lifecycle()
    }

    // -------------------------------------------------------------------------
    // Ticks
    // -------------------------------------------------------------------------

    /// Handle one scheduled tick.
    ///
    /// Ticks carrying anything but the live ticket are dropped, so nothing
    /// scheduled before the last stop or rate change can move the clock.
    pub fn on_tick(&mut self, ticket: TickTicket) -> TickOutcome {
        if self.running != Some(ticket) {
            tracing::debug!(ticket = %ticket, live = ?self.running, "Dropping stale tick");
            return TickOutcome::Ignored;
        }

        match self.modes.drive() {
            DriveMode::RealTime => {
                let now = self.clock.now();
                self.time
                    .set_components(TimeComponents::from_timelike(&now));
            }
            DriveMode::Countdown if self.rate.direction() == Direction::Reverse => {
                if self.time.count_down(self.rate.tick_step()) {
                    self.expire_countdown();
                    return TickOutcome::Expired;
                }
            }
            DriveMode::Countdown | DriveMode::FreeRunning => {
                self.time
                    .advance(self.rate.tick_step(), self.rate.direction());
            }
        }

        tracing::debug!(time = %self.time, "Tick");
        TickOutcome::Advanced(self.time())
    }

    fn expire_countdown(&mut self) {
        self.stop();
        self.modes.expire_countdown(&mut self.rate);
        tracing::info!(
            expired_at = %self.clock.now().format("%H:%M:%S%.9f"),
            "Countdown timer expired"
        );
        if let Some(notifier) = &self.notifier {
            notifier.count_down_expired();
        }
    }

    // -------------------------------------------------------------------------
    // Reconfiguration
    // -------------------------------------------------------------------------

    /// Apply a new signed rate.
    ///
    /// Zero is resolved by the mode controller first. A rate change leaves
    /// RealTime, since RealTime is pinned to forward 1x. While running, the
    /// tick restarts so the old interval never fires again.
    pub fn reconfigure_rate(&mut self, signed_rate: f64) -> Result<(), ClockError> {
        let resolved = if signed_rate == 0.0 {
            let resolved = self.modes.on_rate_step_to_zero(self.rate.direction());
            tracing::debug!(resolved, "Resolved zero rate request");
            resolved
        } else {
            signed_rate
        };

        if let Err(e) = self.rate.set_rate(resolved) {
            let bounds = self.rate.bounds();
            tracing::warn!(
                requested = signed_rate,
                min_magnitude = bounds.min_magnitude(),
                max_magnitude = bounds.max_magnitude(),
                error = %e,
                "Rejected rate change"
            );
            return Err(e);
        }
        self.leave_real_time("rate change");

        tracing::info!(rate = %self.rate, interval_secs = self.rate.tick_interval(), "Rate changed");
        self.restart_if_running();
        Ok(())
    }

    /// Apply a drive or permission change.
    pub fn reconfigure_mode(&mut self, change: ModeChange) {
        match change {
            ModeChange::RealTime(true) => {
                self.modes.enable_real_time(&mut self.rate);
                let now = self.clock.now();
                self.time
                    .set_components(TimeComponents::from_timelike(&now));
                self.restart_if_running();
            }
            ModeChange::RealTime(false) => self.modes.disable_real_time(),
            ModeChange::EnableCountdown(start_at) => {
                self.modes
                    .enable_countdown(start_at, &mut self.rate, &mut self.time);
                self.restart_if_running();
            }
            ModeChange::DisableCountdown => self.modes.disable_countdown(),
            ModeChange::ManualTimeSetAllowed(allowed) => self.modes.set_manual_allowed(allowed),
        }
        tracing::info!(
            change = ?change,
            drive = %self.modes.drive(),
            rate = %self.rate,
            manual_time_set_allowed = self.modes.manual_allowed(),
            "Mode changed"
        );
    }

    /// Set the displayed time directly.
    ///
    /// Requires the manual-set permission. Drops RealTime, since the shown
    /// time no longer follows the wall clock.
    pub fn set_time_manually(
        &mut self,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> Result<(), ClockError> {
        if let Err(e) = self.modes.ensure_manual_allowed() {
            tracing::warn!(hour, minute, second, "Manual time set rejected: not allowed");
            return Err(e);
        }
        self.time.set(hour, minute, second)?;
        self.leave_real_time("manual time set");

        tracing::info!(time = %self.time, "Time set manually");
        if let Some(notifier) = &self.notifier {
            notifier.time_is_set_manually();
        }
        Ok(())
    }

    fn leave_real_time(&mut self, cause: &'static str) {
        if self.modes.is_real_time() {
            self.modes.disable_real_time();
            tracing::info!(cause, "Left real time");
        }
    }

    // -------------------------------------------------------------------------
    // Configuration surface
    // -------------------------------------------------------------------------

    /// RealTime switch. Turning it on also starts a stopped clock.
    pub fn set_display_real_time(&mut self, enabled: bool) {
        self.reconfigure_mode(ModeChange::RealTime(enabled));
        if enabled {
            self.start();
        }
    }

    pub fn set_rate(&mut self, signed_rate: f64) -> Result<(), ClockError> {
        self.reconfigure_rate(signed_rate)
    }

    /// Countdown switch. Always stops the clock first; turning it on loads
    /// the configured countdown start at reverse 1x.
    pub fn set_count_down_timer(&mut self, enabled: bool) {
        self.stop();
        if enabled {
            self.reconfigure_mode(ModeChange::EnableCountdown(self.countdown_start));
        } else {
            self.reconfigure_mode(ModeChange::DisableCountdown);
        }
    }

    pub fn set_manual_time_set_allowed(&mut self, allowed: bool) {
        self.reconfigure_mode(ModeChange::ManualTimeSetAllowed(allowed));
    }

    pub fn set_local_time(&mut self, hour: u32, minute: u32, second: u32) -> Result<(), ClockError> {
        self.set_time_manually(hour, minute, second)
    }

    // -------------------------------------------------------------------------
    // Scheduling
    // -------------------------------------------------------------------------

    fn schedule_ticks(&mut self) -> TickTicket {
        let ticket = self.last_ticket.next();
        self.last_ticket = ticket;
        self.scheduler.schedule(ticket, self.rate.tick_duration());
        self.running = Some(ticket);
        ticket
    }

    /// Cancel the live ticket and schedule a fresh one at the current interval.
    fn restart_if_running(&mut self) {
        let Some(old) = self.running.take() else {
            return;
        };
        self.scheduler.cancel(old);
        let ticket = self.schedule_ticks();
        tracing::debug!(
            old = %old,
            new = %ticket,
            interval_secs = self.rate.tick_interval(),
            "Tick restarted"
        );
    }
}
