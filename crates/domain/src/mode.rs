use serde::{Deserialize, Serialize};

use crate::error::ClockError;
use crate::rate::RateConfig;
use crate::time_state::{Direction, TimeComponents, TimeState};

// =============================================================================
// Drive Mode
// =============================================================================

/// Which source governs how the displayed time evolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DriveMode {
    /// Mirrors the wall clock, forward at 1x.
    RealTime,
    /// Runs in reverse and expires when the time reaches 00:00:00.
    Countdown,
    /// Moves at the configured rate, independent of the wall clock.
    #[default]
    FreeRunning,
}

impl DriveMode {
    pub fn display_name(&self) -> &'static str {
        match self {
            DriveMode::RealTime => "Real time",
            DriveMode::Countdown => "Countdown",
            DriveMode::FreeRunning => "Free running",
        }
    }
}

impl std::fmt::Display for DriveMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// =============================================================================
// Mode Controller
// =============================================================================

/// Holds the drive mode and the manual-set permission, and applies the
/// side effects each mode switch has on rate and time in one step.
///
/// - RealTime forces forward 1x and clears Countdown.
/// - Countdown forces reverse 1x, turns the manual-set permission on and
///   clears RealTime.
/// - The manual-set permission is otherwise independent of the drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModeController {
    drive: DriveMode,
    manual_allowed: bool,
}

impl ModeController {
    pub fn new(manual_allowed: bool) -> Self {
        Self {
            drive: DriveMode::FreeRunning,
            manual_allowed,
        }
    }

    pub fn drive(&self) -> DriveMode {
        self.drive
    }

    pub fn is_real_time(&self) -> bool {
        self.drive == DriveMode::RealTime
    }

    pub fn is_countdown(&self) -> bool {
        self.drive == DriveMode::Countdown
    }

    pub fn manual_allowed(&self) -> bool {
        self.manual_allowed
    }

    pub fn enable_real_time(&mut self, rate: &mut RateConfig) {
        self.drive = DriveMode::RealTime;
        rate.reset(Direction::Forward);
    }

    /// Leaves RealTime for FreeRunning. Other drives are untouched.
    pub fn disable_real_time(&mut self) {
        if self.drive == DriveMode::RealTime {
            self.drive = DriveMode::FreeRunning;
        }
    }

    pub fn enable_countdown(
        &mut self,
        start_at: TimeComponents,
        rate: &mut RateConfig,
        time: &mut TimeState,
    ) {
        self.drive = DriveMode::Countdown;
        self.manual_allowed = true;
        rate.reset(Direction::Reverse);
        time.set_components(start_at);
    }

    /// Leaves Countdown for FreeRunning. Direction and rate stay as they are.
    pub fn disable_countdown(&mut self) {
        if self.drive == DriveMode::Countdown {
            self.drive = DriveMode::FreeRunning;
        }
    }

    /// Countdown reached zero: back to FreeRunning, forward at 1x.
    pub fn expire_countdown(&mut self, rate: &mut RateConfig) {
        self.drive = DriveMode::FreeRunning;
        rate.reset(Direction::Forward);
    }

    pub fn set_manual_allowed(&mut self, allowed: bool) {
        self.manual_allowed = allowed;
    }

    pub fn ensure_manual_allowed(&self) -> Result<(), ClockError> {
        if self.manual_allowed {
            Ok(())
        } else {
            Err(ClockError::ManualSetNotAllowed)
        }
    }

    /// Resolve a requested rate of zero into a signed unit rate.
    ///
    /// During Countdown the clock keeps running in reverse at 1x. Otherwise
    /// the direction flips and the magnitude snaps to 1.
    pub fn on_rate_step_to_zero(&self, current_direction: Direction) -> f64 {
        if self.is_countdown() {
            Direction::Reverse.signum()
        } else {
            current_direction.flipped().signum()
        }
    }
}
