//! Playback rate: a signed speed multiplier split into magnitude and direction.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ClockError;
use crate::time_state::Direction;

// =============================================================================
// Rate Bounds
// =============================================================================

/// Smallest magnitude any bounds may allow. Keeps the tick interval
/// (`1 / magnitude`) within a representable `Duration`.
pub const MIN_RATE_FLOOR: f64 = 1e-3;

/// Accepted range for the rate magnitude.
///
/// Always contains `1.0`, because mode changes snap the rate to 1x.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawRateBounds")]
pub struct RateBounds {
    min_magnitude: f64,
    max_magnitude: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRateBounds {
    min_magnitude: f64,
    max_magnitude: f64,
}

impl TryFrom<RawRateBounds> for RateBounds {
    type Error = ClockError;

    fn try_from(raw: RawRateBounds) -> Result<Self, Self::Error> {
        RateBounds::new(raw.min_magnitude, raw.max_magnitude)
    }
}

impl Default for RateBounds {
    fn default() -> Self {
        Self {
            min_magnitude: 0.1,
            max_magnitude: 10.0,
        }
    }
}

impl RateBounds {
    pub fn new(min_magnitude: f64, max_magnitude: f64) -> Result<Self, ClockError> {
        if !min_magnitude.is_finite() || min_magnitude < MIN_RATE_FLOOR || min_magnitude > 1.0 {
            return Err(ClockError::invalid_rate(min_magnitude));
        }
        if !max_magnitude.is_finite() || max_magnitude < 1.0 {
            return Err(ClockError::invalid_rate(max_magnitude));
        }
        Ok(Self {
            min_magnitude,
            max_magnitude,
        })
    }

    pub fn min_magnitude(&self) -> f64 {
        self.min_magnitude
    }

    pub fn max_magnitude(&self) -> f64 {
        self.max_magnitude
    }

    pub fn contains(&self, magnitude: f64) -> bool {
        magnitude >= self.min_magnitude && magnitude <= self.max_magnitude
    }
}

// =============================================================================
// Rate Config
// =============================================================================

/// Current rate. The magnitude is never zero; the sign lives in `direction`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateConfig {
    magnitude: f64,
    direction: Direction,
    bounds: RateBounds,
}

impl Default for RateConfig {
    fn default() -> Self {
        Self::new(RateBounds::default())
    }
}

impl RateConfig {
    /// Forward at 1x within `bounds`.
    pub fn new(bounds: RateBounds) -> Self {
        Self {
            magnitude: 1.0,
            direction: Direction::Forward,
            bounds,
        }
    }

    /// Split a signed rate into magnitude and direction.
    ///
    /// Zero is rejected here; callers resolve it first (see
    /// `ModeController::on_rate_step_to_zero`).
    pub fn set_rate(&mut self, signed_rate: f64) -> Result<(), ClockError> {
        let magnitude = signed_rate.abs();
        if !magnitude.is_finite() || magnitude == 0.0 || !self.bounds.contains(magnitude) {
            return Err(ClockError::invalid_rate(signed_rate));
        }
        self.magnitude = magnitude;
        self.direction = Direction::from_sign(signed_rate);
        Ok(())
    }

    /// Snap to 1x in `direction`.
    pub fn reset(&mut self, direction: Direction) {
        self.magnitude = 1.0;
        self.direction = direction;
    }

    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn bounds(&self) -> RateBounds {
        self.bounds
    }

    pub fn signed_rate(&self) -> f64 {
        self.magnitude * self.direction.signum()
    }

    /// Real seconds between ticks: `1 / magnitude`, always positive.
    pub fn tick_interval(&self) -> f64 {
        1.0 / self.magnitude
    }

    pub fn tick_duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.tick_interval()).unwrap_or(Duration::MAX)
    }

    /// Clock seconds covered by one tick: the real interval scaled by the rate.
    pub fn tick_step(&self) -> f64 {
        self.tick_interval() * self.magnitude
    }
}

/// Renders the stepper label, e.g. `3X`, `-1X`, `0.5X`.
impl std::fmt::Display for RateConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rate = self.signed_rate();
        if rate.fract() == 0.0 {
            write!(f, "{}X", rate as i64)
        } else {
            write!(f, "{}X", rate)
        }
    }
}
