//! Configuration options and host commands.
//!
//! Options are the four keys a UI layer may change:
//! `displayRealTime`, `rate`, `countDownTimer` and `manualTimeSetAllowed`.
//! Commands are the line-oriented requests the terminal host accepts.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use clockwork_domain::{ClockError, TimeComponents};

use crate::use_cases::clock::ClockEngine;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandParseError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command '{0}'")]
    UnknownCommand(String),

    #[error("Unknown option '{0}'")]
    UnknownOption(String),

    #[error("Invalid value '{value}' for {key}")]
    InvalidValue { key: String, value: String },

    #[error("Missing argument for '{0}'")]
    MissingArgument(&'static str),
}

impl CommandParseError {
    fn invalid_value(key: &str, value: &str) -> Self {
        Self::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

// =============================================================================
// Options
// =============================================================================

/// One recognised configuration option with its value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "option", content = "value", rename_all = "camelCase")]
pub enum ClockOption {
    DisplayRealTime(bool),
    Rate(f64),
    CountDownTimer(bool),
    ManualTimeSetAllowed(bool),
}

impl ClockOption {
    pub fn key(&self) -> &'static str {
        match self {
            ClockOption::DisplayRealTime(_) => "displayRealTime",
            ClockOption::Rate(_) => "rate",
            ClockOption::CountDownTimer(_) => "countDownTimer",
            ClockOption::ManualTimeSetAllowed(_) => "manualTimeSetAllowed",
        }
    }

    /// Apply through the engine's configuration surface.
    pub fn apply_to(self, engine: &mut ClockEngine) -> Result<(), ClockError> {
        match self {
            ClockOption::DisplayRealTime(enabled) => engine.set_display_real_time(enabled),
            ClockOption::Rate(rate) => engine.set_rate(rate)?,
            ClockOption::CountDownTimer(enabled) => engine.set_count_down_timer(enabled),
            ClockOption::ManualTimeSetAllowed(allowed) => {
                engine.set_manual_time_set_allowed(allowed)
            }
        }
        Ok(())
    }
}

/// Parses `key=value`.
impl FromStr for ClockOption {
    type Err = CommandParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, value) = s
            .split_once('=')
            .ok_or_else(|| CommandParseError::UnknownCommand(s.trim().to_string()))?;
        let (key, value) = (key.trim(), value.trim());

        let flag = || parse_bool(value).ok_or_else(|| CommandParseError::invalid_value(key, value));
        match key {
            "displayRealTime" => Ok(ClockOption::DisplayRealTime(flag()?)),
            "countDownTimer" => Ok(ClockOption::CountDownTimer(flag()?)),
            "manualTimeSetAllowed" => Ok(ClockOption::ManualTimeSetAllowed(flag()?)),
            "rate" => value
                .parse::<f64>()
                .ok()
                .filter(|rate| rate.is_finite())
                .map(ClockOption::Rate)
                .ok_or_else(|| CommandParseError::invalid_value(key, value)),
            _ => Err(CommandParseError::UnknownOption(key.to_string())),
        }
    }
}

impl std::fmt::Display for ClockOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClockOption::DisplayRealTime(v)
            | ClockOption::CountDownTimer(v)
            | ClockOption::ManualTimeSetAllowed(v) => write!(f, "{}={}", self.key(), v),
            ClockOption::Rate(rate) => write!(f, "{}={}", self.key(), rate),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "on" | "1" => Some(true),
        "false" | "off" | "0" => Some(false),
        _ => None,
    }
}

// =============================================================================
// Commands
// =============================================================================

/// One line of host input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClockCommand {
    Start,
    Stop,
    /// Start/stop button
    Toggle,
    /// Print the current snapshot
    Status,
    /// Manual time set
    Set(TimeComponents),
    Configure(ClockOption),
    Quit,
}

impl FromStr for ClockCommand {
    type Err = CommandParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let line = s.trim();
        if line.is_empty() {
            return Err(CommandParseError::Empty);
        }
        if line.contains('=') {
            return line.parse().map(ClockCommand::Configure);
        }

        let mut parts = line.split_whitespace();
        let verb = parts.next().unwrap_or_default();
        match verb.to_ascii_lowercase().as_str() {
            "start" => Ok(ClockCommand::Start),
            "stop" => Ok(ClockCommand::Stop),
            "toggle" => Ok(ClockCommand::Toggle),
            "status" => Ok(ClockCommand::Status),
            "quit" | "exit" => Ok(ClockCommand::Quit),
            "set" => {
                let arg = parts.next().ok_or(CommandParseError::MissingArgument("set"))?;
                arg.parse()
                    .map(ClockCommand::Set)
                    .map_err(|_| CommandParseError::invalid_value("set", arg))
            }
            _ => Err(CommandParseError::UnknownCommand(line.to_string())),
        }
    }
}
