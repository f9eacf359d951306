//! Pointer-move throttling.

/// Drops pointer moves that arrive too soon after the last accepted one.
///
/// Plot frontends throttle move events before they reach tools; this keeps
/// the same cadence for hosts that deliver every raw move.
#[derive(Debug, Clone)]
pub struct MoveThrottle {
    interval_ms: u64,
    last_accepted: Option<u64>,
}

impl MoveThrottle {
    /// Creates a throttle; an interval of 0 accepts every move.
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_accepted: None,
        }
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// Returns whether a move at `time_ms` should be delivered.
    pub fn accept(&mut self, time_ms: u64) -> bool {
        if self.interval_ms == 0 {
            return true;
        }
        match self.last_accepted {
            Some(last) if time_ms.saturating_sub(last) < self.interval_ms => false,
            _ => {
                self.last_accepted = Some(time_ms);
                true
            }
        }
    }

    /// Forgets the last accepted move so the next one always passes.
    pub fn reset(&mut self) {
        self.last_accepted = None;
    }
}
