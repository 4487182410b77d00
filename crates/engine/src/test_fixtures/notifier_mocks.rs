//! Recording notifier for asserting event order.

use std::sync::Mutex;

use crate::infrastructure::ports::ClockNotifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockEvent {
    TimeIsSetManually,
    ClockStopped,
    CountDownExpired,
}

/// Notifier that keeps every event in arrival order.
#[derive(Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<ClockEvent>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ClockEvent> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: ClockEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl ClockNotifier for RecordingNotifier {
    fn time_is_set_manually(&self) {
        self.push(ClockEvent::TimeIsSetManually);
    }

    fn clock_stopped(&self) {
        self.push(ClockEvent::ClockStopped);
    }

    fn count_down_expired(&self) {
        self.push(ClockEvent::CountDownExpired);
    }
}
