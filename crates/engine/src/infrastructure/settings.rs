//! Clock settings loaded from environment variables.
//!
//! # Environment Variables
//!
//! - `CLOCK_MIN_RATE` - Smallest accepted rate magnitude, at least 0.001 (default: 0.1)
//! - `CLOCK_MAX_RATE` - Largest accepted rate magnitude (default: 10)
//! - `CLOCK_COUNTDOWN_START` - Countdown start, `HH:MM:SS` (default: 00:00:05)
//! - `CLOCK_START_TIME` - Initial displayed time, `HH:MM:SS` (default: 00:00:00)
//! - `CLOCK_REALTIME_STARTUP_DELAY_MS` - Delay before the host switches into
//!   real time and starts; 0 disables the switch (default: 1000)
//! - `CLOCK_MANUAL_TIME_SET_ALLOWED` - Initial manual-set permission (default: false)
//!
//! Missing variables fall back to the defaults. Present but unparseable
//! values are rejected so a typo never silently changes behaviour.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use clockwork_domain::{ClockError, RateBounds, TimeComponents};

use crate::use_cases::clock::ClockEngineConfig;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SettingsError {
    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },

    #[error("Invalid rate bounds {min}..{max}: {source}")]
    InvalidRateBounds {
        min: f64,
        max: f64,
        #[source]
        source: ClockError,
    },
}

impl SettingsError {
    fn invalid_value(key: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            key,
            value: value.into(),
        }
    }
}

/// Host configuration for the clock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockSettings {
    pub min_rate: f64,
    pub max_rate: f64,
    pub countdown_start: TimeComponents,
    pub start_time: TimeComponents,
    pub realtime_startup_delay_ms: u64,
    pub manual_time_set_allowed: bool,
}

impl Default for ClockSettings {
    fn default() -> Self {
        Self {
            min_rate: 0.1,
            max_rate: 10.0,
            countdown_start: TimeComponents::from_seconds_of_day(5),
            start_time: TimeComponents::MIDNIGHT,
            realtime_startup_delay_ms: 1000,
            manual_time_set_allowed: false,
        }
    }
}

impl ClockSettings {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` to resolve each variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let settings = Self {
            min_rate: parse_or(&lookup, "CLOCK_MIN_RATE", defaults.min_rate)?,
            max_rate: parse_or(&lookup, "CLOCK_MAX_RATE", defaults.max_rate)?,
            countdown_start: parse_or(&lookup, "CLOCK_COUNTDOWN_START", defaults.countdown_start)?,
            start_time: parse_or(&lookup, "CLOCK_START_TIME", defaults.start_time)?,
            realtime_startup_delay_ms: parse_or(
                &lookup,
                "CLOCK_REALTIME_STARTUP_DELAY_MS",
                defaults.realtime_startup_delay_ms,
            )?,
            manual_time_set_allowed: parse_or(
                &lookup,
                "CLOCK_MANUAL_TIME_SET_ALLOWED",
                defaults.manual_time_set_allowed,
            )?,
        };
        settings.rate_bounds()?;
        Ok(settings)
    }

    pub fn rate_bounds(&self) -> Result<RateBounds, SettingsError> {
        RateBounds::new(self.min_rate, self.max_rate).map_err(|source| {
            SettingsError::InvalidRateBounds {
                min: self.min_rate,
                max: self.max_rate,
                source,
            }
        })
    }

    /// `None` when the startup switch into real time is disabled.
    pub fn realtime_startup_delay(&self) -> Option<Duration> {
        (self.realtime_startup_delay_ms > 0)
            .then(|| Duration::from_millis(self.realtime_startup_delay_ms))
    }

    pub fn engine_config(&self) -> Result<ClockEngineConfig, SettingsError> {
        Ok(ClockEngineConfig {
            rate_bounds: self.rate_bounds()?,
            start_time: self.start_time,
            countdown_start: self.countdown_start,
            manual_time_set_allowed: self.manual_time_set_allowed,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, SettingsError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| SettingsError::invalid_value(key, raw)),
        _ => Ok(default),
    }
}
