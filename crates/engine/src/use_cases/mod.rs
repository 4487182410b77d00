//! Use cases - User story orchestration.
//!
//! `clock` drives the domain types through the running/stopped lifecycle.

pub mod clock;

pub use clock::{
    ClockEngine, ClockEngineConfig, ClockLifecycle, ClockSnapshot, ModeChange, TickOutcome,
};
