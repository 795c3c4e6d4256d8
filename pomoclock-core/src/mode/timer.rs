//! Countdown timer for focus and break periods

use crate::clock::Instant;

/// A running countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timer {
    /// When the countdown started
    pub start: Instant,
    /// Length in seconds
    pub duration_s: u32,
}

impl Timer {
    /// Start a countdown at `now`
    pub const fn start(now: Instant, duration_s: u32) -> Self {
        Self {
            start: now,
            duration_s,
        }
    }

    /// Whole seconds elapsed
    pub const fn elapsed_s(&self, now: Instant) -> u32 {
        now.since(self.start) / 1000
    }

    /// Check if the countdown has run out
    pub const fn is_expired(&self, now: Instant) -> bool {
        self.elapsed_s(now) >= self.duration_s
    }

    /// Whole seconds left, 0 once expired
    pub const fn remaining_s(&self, now: Instant) -> u32 {
        self.duration_s.saturating_sub(self.elapsed_s(now))
    }

    /// Elapsed fraction in thousandths, clamped to 1000
    pub fn progress_permille(&self, now: Instant) -> u16 {
        if self.duration_s == 0 {
            return 1000;
        }
        let elapsed = self.elapsed_s(now).min(self.duration_s);
        (u64::from(elapsed) * 1000 / u64::from(self.duration_s)) as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_uses_whole_seconds() {
        let timer = Timer::start(Instant::from_millis(500), 2);
        assert!(!timer.is_expired(Instant::from_millis(2_499)));
        assert!(timer.is_expired(Instant::from_millis(2_500)));
    }

    #[test]
    fn test_remaining_and_progress() {
        let timer = Timer::start(Instant::from_millis(0), 300);
        let now = Instant::from_millis(75_000);
        assert_eq!(timer.remaining_s(now), 225);
        assert_eq!(timer.progress_permille(now), 250);

        let late = Instant::from_millis(900_000);
        assert_eq!(timer.remaining_s(late), 0);
        assert_eq!(timer.progress_permille(late), 1000);
    }
}
