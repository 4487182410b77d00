//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Wall-clock time (RealTime drive, testing)
//! - Periodic ticks (tokio in production, a fake scheduler in tests)
//! - Event delivery to the UI layer

mod external;
mod testing;

// =============================================================================
// Engine-Driven Ports
// =============================================================================
pub use external::{ClockNotifier, TickScheduler, TickTicket};

#[cfg(test)]
pub use external::MockClockNotifier;

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::ClockPort;

#[cfg(test)]
pub use testing::MockClockPort;
