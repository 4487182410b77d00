use std::str::FromStr;

use chrono::Timelike;
use serde::{Deserialize, Serialize};

use crate::error::{ClockError, TimeParseError};

const SECONDS_PER_DAY: u64 = 86_400;

/// Float noise tolerated when deciding that the carry completed a second.
const CARRY_TOLERANCE: f64 = 1e-9;

// =============================================================================
// Direction
// =============================================================================

/// Which way the clock moves on each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Forward,
    Reverse,
}

impl Direction {
    /// Direction implied by the sign of a rate. Zero counts as forward.
    pub fn from_sign(value: f64) -> Self {
        if value < 0.0 {
            Direction::Reverse
        } else {
            Direction::Forward
        }
    }

    pub fn flipped(&self) -> Direction {
        match self {
            Direction::Forward => Direction::Reverse,
            Direction::Reverse => Direction::Forward,
        }
    }

    /// `1.0` for forward, `-1.0` for reverse.
    pub fn signum(&self) -> f64 {
        match self {
            Direction::Forward => 1.0,
            Direction::Reverse => -1.0,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Forward => write!(f, "forward"),
            Direction::Reverse => write!(f, "reverse"),
        }
    }
}

// =============================================================================
// Time Components
// =============================================================================

/// A validated hour/minute/second triple.
///
/// Only constructible through validating paths, including deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "RawTimeComponents")]
pub struct TimeComponents {
    hour: u8,
    minute: u8,
    second: u8,
}

/// Unchecked wire shape, validated into `TimeComponents`.
#[derive(Deserialize)]
struct RawTimeComponents {
    hour: u32,
    minute: u32,
    second: u32,
}

impl TryFrom<RawTimeComponents> for TimeComponents {
    type Error = ClockError;

    fn try_from(raw: RawTimeComponents) -> Result<Self, Self::Error> {
        TimeComponents::new(raw.hour, raw.minute, raw.second)
    }
}

impl TimeComponents {
    pub const MIDNIGHT: TimeComponents = TimeComponents {
        hour: 0,
        minute: 0,
        second: 0,
    };

    /// Validates ranges: hour 0-23, minute and second 0-59.
    pub fn new(hour: u32, minute: u32, second: u32) -> Result<Self, ClockError> {
        if hour > 23 || minute > 59 || second > 59 {
            return Err(ClockError::invalid_time_value(hour, minute, second));
        }
        Ok(Self {
            hour: hour as u8,
            minute: minute as u8,
            second: second as u8,
        })
    }

    /// Reads the wall-clock triple off any chrono time value.
    /// Leap seconds collapse onto second 59.
    pub fn from_timelike<T: Timelike>(value: &T) -> Self {
        Self {
            hour: value.hour() as u8,
            minute: value.minute() as u8,
            second: value.second().min(59) as u8,
        }
    }

    pub fn hour(&self) -> u32 {
        self.hour.into()
    }

    pub fn minute(&self) -> u32 {
        self.minute.into()
    }

    pub fn second(&self) -> u32 {
        self.second.into()
    }

    pub fn seconds_of_day(&self) -> u32 {
        self.hour as u32 * 3600 + self.minute as u32 * 60 + self.second as u32
    }

    /// Wall time `seconds` after midnight, wrapping at 24 hours.
    pub fn from_seconds_of_day(seconds: u64) -> Self {
        let seconds = seconds % SECONDS_PER_DAY;
        Self {
            hour: (seconds / 3600) as u8,
            minute: ((seconds % 3600) / 60) as u8,
            second: (seconds % 60) as u8,
        }
    }

    pub fn is_midnight(&self) -> bool {
        *self == Self::MIDNIGHT
    }
}

impl std::fmt::Display for TimeComponents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
    }
}

impl FromStr for TimeComponents {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut parts = trimmed.split(':');
        let mut next = || -> Result<u32, TimeParseError> {
            parts
                .next()
                .and_then(|part| part.trim().parse::<u32>().ok())
                .ok_or_else(|| TimeParseError::Malformed(trimmed.to_string()))
        };
        let (hour, minute, second) = (next()?, next()?, next()?);
        if parts.next().is_some() {
            return Err(TimeParseError::Malformed(trimmed.to_string()));
        }
        Ok(TimeComponents::new(hour, minute, second)?)
    }
}

// =============================================================================
// Time State
// =============================================================================

/// The clock's displayed time plus the sub-second movement not yet shown.
///
/// The triple only ever changes by whole seconds. Fractional steps collect in
/// a carry until they add up to a full second, so slow or uneven
/// steps never drift. The carry belongs to one direction and is dropped when
/// the direction changes or the time is set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimeState {
    components: TimeComponents,
    carry_seconds: f64,
    carry_direction: Direction,
}

impl TimeState {
    pub fn new(components: TimeComponents) -> Self {
        Self {
            components,
            carry_seconds: 0.0,
            carry_direction: Direction::Forward,
        }
    }

    /// Move by `by_seconds` in `direction`, wrapping at 24:00:00 both ways.
    ///
    /// Non-positive or non-finite amounts are ignored.
    pub fn advance(&mut self, by_seconds: f64, direction: Direction) {
        let Some(whole) = self.accumulate(by_seconds, direction) else {
            return;
        };
        let current = self.components.seconds_of_day() as u64;
        let delta = whole % SECONDS_PER_DAY;
        let next = match direction {
            Direction::Forward => current + delta,
            Direction::Reverse => current + SECONDS_PER_DAY - delta,
        };
        self.components = TimeComponents::from_seconds_of_day(next);
    }

    /// Move toward 00:00:00 without wrapping past it.
    ///
    /// A decrement larger than the remaining time clamps to zero. Returns
    /// `true` when the triple is 00:00:00 after the step.
    pub fn count_down(&mut self, by_seconds: f64) -> bool {
        if let Some(whole) = self.accumulate(by_seconds, Direction::Reverse) {
            let current = self.components.seconds_of_day() as u64;
            if whole >= current {
                self.components = TimeComponents::MIDNIGHT;
                self.carry_seconds = 0.0;
            } else {
                self.components = TimeComponents::from_seconds_of_day(current - whole);
            }
        }
        self.components.is_midnight()
    }

    /// Replace the triple after validating every field.
    pub fn set(&mut self, hour: u32, minute: u32, second: u32) -> Result<(), ClockError> {
        let components = TimeComponents::new(hour, minute, second)?;
        self.set_components(components);
        Ok(())
    }

    pub fn set_components(&mut self, components: TimeComponents) {
        self.components = components;
        self.carry_seconds = 0.0;
    }

    pub fn to_components(&self) -> TimeComponents {
        self.components
    }

    pub fn is_midnight(&self) -> bool {
        self.components.is_midnight()
    }

    /// Adds the step to the carry and returns how many whole seconds are due.
    fn accumulate(&mut self, by_seconds: f64, direction: Direction) -> Option<u64> {
        if !by_seconds.is_finite() || by_seconds <= 0.0 {
            return None;
        }
        if direction != self.carry_direction {
            self.carry_seconds = 0.0;
            self.carry_direction = direction;
        }
        let total = self.carry_seconds + by_seconds;
        let whole = (total + CARRY_TOLERANCE).floor();
        self.carry_seconds = (total - whole).max(0.0);
        // `as` saturates, so absurdly large steps cannot overflow here
        Some(whole as u64)
    }
}

impl std::fmt::Display for TimeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.components.fmt(f)
    }
}
