//! Clockwork engine library.
//!
//! Drives the clock domain through a running/stopped lifecycle on tokio.
//!
//! ## Structure
//!
//! - `use_cases/` - The `ClockEngine` state machine
//! - `infrastructure/` - External dependency implementations (ports + adapters)
//! - `api/` - Configuration options and host commands
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod infrastructure;
pub mod use_cases;

/// Test fixtures module for engine tests.
#[cfg(test)]
pub mod test_fixtures;

/// End-to-end scenarios through `ClockApp` with tokio's paused clock.
#[cfg(test)]
mod e2e_tests;

pub use app::{ClockApp, CommandOutcome};
