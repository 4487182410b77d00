//! API layer - the option and command surface exposed to hosts.

pub mod options;

pub use options::{ClockCommand, ClockOption, CommandParseError};
