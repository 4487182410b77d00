//! Clock domain: the displayed time, the playback rate and the drive modes.
//!
//! Everything here is synchronous and free of I/O. Scheduling, the wall
//! clock and event delivery live in `clockwork-engine`.

pub mod error;
pub mod mode;
pub mod rate;
pub mod time_state;

pub use error::{ClockError, TimeParseError};
pub use mode::{DriveMode, ModeController};
pub use rate::{RateBounds, RateConfig, MIN_RATE_FLOOR};
pub use time_state::{Direction, TimeComponents, TimeState};
