//! Infrastructure implementations.
//!
//! Contains port trait implementations for external dependencies.

pub mod clock;
pub mod notifier;
pub mod ports;
pub mod scheduler;
pub mod settings;
