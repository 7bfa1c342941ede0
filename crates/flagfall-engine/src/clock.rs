//! Per-side clock

use std::time::Duration;

use flagfall_core::ClockTime;

/// One side's time budget
/// INVARIANT: remaining time never underflows; zero means the flag has fallen
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SideClock {
    remaining: ClockTime,
}

impl SideClock {
    pub fn new(initial: ClockTime) -> Self {
        SideClock { remaining: initial }
    }

    pub fn remaining(&self) -> ClockTime {
        self.remaining
    }

    pub fn is_expired(&self) -> bool {
        self.remaining.is_zero()
    }

    /// Burn `dt` of thinking time, clamping at zero.
    /// Returns true only on the call that drives the clock to zero.
    pub fn consume(&mut self, dt: Duration) -> bool {
        if self.is_expired() {
            return false;
        }
        self.remaining = self.remaining.saturating_sub_duration(dt);
        self.remaining.is_zero()
    }

    /// Add increment time. A fallen flag stays fallen.
    pub fn credit(&mut self, amount: ClockTime) {
        if self.is_expired() {
            return;
        }
        self.remaining += amount;
    }

    pub fn reset_to(&mut self, initial: ClockTime) {
        self.remaining = initial;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consume_reports_flag_once() {
        let mut clock = SideClock::new(ClockTime::from_secs(1));

        assert!(!clock.consume(Duration::from_millis(600)));
        assert_eq!(clock.remaining(), ClockTime::from_millis(400));

        assert!(clock.consume(Duration::from_millis(600)));
        assert_eq!(clock.remaining(), ClockTime::ZERO);
        assert!(clock.is_expired());

        // Already down
        assert!(!clock.consume(Duration::from_millis(600)));
        assert_eq!(clock.remaining(), ClockTime::ZERO);
    }

    #[test]
    fn test_credit() {
        let mut clock = SideClock::new(ClockTime::from_secs(10));
        clock.credit(ClockTime::from_secs(3));
        assert_eq!(clock.remaining(), ClockTime::from_secs(13));

        clock.reset_to(ClockTime::ZERO);
        clock.credit(ClockTime::from_secs(3));
        assert!(clock.is_expired());
    }
}
