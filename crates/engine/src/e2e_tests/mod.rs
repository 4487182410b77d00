//! End-to-end clock scenarios.
//!
//! These tests drive a complete `ClockApp` (tokio scheduler, tick driver and
//! engine) through host command lines. They run on tokio's paused clock, so
//! multi-second scenarios finish instantly and deterministically.
//!
//! ```bash
//! cargo test -p clockwork-engine --lib e2e_tests
//! ```

mod e2e_helpers;

pub use e2e_helpers::*;
