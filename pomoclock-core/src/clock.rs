//! Monotonic millisecond clock
//!
//! Time is a `u32` millisecond counter that wraps after ~49.7 days, the same
//! width as the tick counters on the target chips. All interval math goes
//! through [`Instant::since`], which stays correct across one wraparound.

/// A point on the monotonic millisecond timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Instant(u32);

impl Instant {
    /// Create an instant from a raw millisecond counter
    pub const fn from_millis(ms: u32) -> Self {
        Self(ms)
    }

    /// Raw millisecond counter value
    pub const fn as_millis(self) -> u32 {
        self.0
    }

    /// Milliseconds elapsed from `earlier` to `self`
    ///
    /// Wraparound-safe as long as the real interval is shorter than the
    /// counter period.
    pub const fn since(self, earlier: Instant) -> u32 {
        self.0.wrapping_sub(earlier.0)
    }

    /// The instant `ms` milliseconds later
    pub const fn wrapping_add(self, ms: u32) -> Self {
        Self(self.0.wrapping_add(ms))
    }

    /// The instant `ms` milliseconds earlier
    pub const fn wrapping_sub(self, ms: u32) -> Self {
        Self(self.0.wrapping_sub(ms))
    }

    /// Check whether more than `timeout_ms` has passed since `started`
    pub const fn exceeded(self, started: Instant, timeout_ms: u32) -> bool {
        self.since(started) > timeout_ms
    }
}

/// Monotonic time source with a blocking sleep
///
/// `sleep_ms` is where the board may enter light sleep between scheduling
/// passes.
pub trait Clock {
    /// Current time
    fn now(&self) -> Instant;

    /// Block for `ms` milliseconds
    fn sleep_ms(&mut self, ms: u32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_since_simple() {
        let a = Instant::from_millis(1_000);
        let b = Instant::from_millis(4_500);
        assert_eq!(b.since(a), 3_500);
    }

    #[test]
    fn test_since_across_wraparound() {
        let before = Instant::from_millis(u32::MAX - 99);
        let after = before.wrapping_add(250);
        assert_eq!(after.as_millis(), 150);
        assert_eq!(after.since(before), 250);
    }

    #[test]
    fn test_wrapping_sub_then_since() {
        let now = Instant::from_millis(5_000);
        let earlier = now.wrapping_sub(1_800_000);
        assert_eq!(now.since(earlier), 1_800_000);
    }

    #[test]
    fn test_exceeded_is_strict() {
        let start = Instant::from_millis(0);
        assert!(!Instant::from_millis(15_000).exceeded(start, 15_000));
        assert!(Instant::from_millis(15_001).exceeded(start, 15_000));
    }
}
