//! Authoritative wall-clock time
//!
//! The monotonic clock only measures intervals. Wall time is the epoch
//! reported by the last successful sync plus the monotonic time elapsed
//! since then. A failed sync leaves the anchor untouched.

use time::OffsetDateTime;

use crate::clock::Instant;

/// 2000-01-01T00:00:00Z; a sync result at or before this is rejected
pub const MIN_PLAUSIBLE_EPOCH: u64 = 946_684_800;

/// Anchors older than this are rolled forward so interval math never
/// approaches the monotonic counter period
const REANCHOR_AFTER_MS: u32 = 86_400_000;

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Check a time-service result against the historical sentinel
pub const fn is_plausible(epoch_s: u64) -> bool {
    epoch_s > MIN_PLAUSIBLE_EPOCH
}

/// Broken-down local time for the clock face
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LocalTime {
    /// Hour on a 12-hour dial (1-12)
    pub hour12: u8,
    pub minute: u8,
    pub second: u8,
    /// Afternoon (hour 12-23)
    pub pm: bool,
    /// Day of week, 0 = Sunday
    pub weekday: u8,
    /// Day of month (1-31)
    pub day: u8,
    /// Month (1-12)
    pub month: u8,
}

impl LocalTime {
    fn from_datetime(dt: &OffsetDateTime) -> Self {
        let hour24 = dt.hour();
        let hour12 = match hour24 {
            0 => 12,
            1..=12 => hour24,
            _ => hour24 - 12,
        };
        Self {
            hour12,
            minute: dt.minute(),
            second: dt.second(),
            pm: hour24 >= 12,
            weekday: dt.weekday().number_days_from_sunday(),
            day: dt.day(),
            month: u8::from(dt.month()),
        }
    }

    /// Three-letter weekday name
    pub fn weekday_short(&self) -> &'static str {
        WEEKDAYS[(self.weekday % 7) as usize]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Anchor {
    epoch_s: u64,
    at: Instant,
}

/// Wall-clock offset maintained by time sync
#[derive(Debug, Clone)]
pub struct WallClock {
    anchor: Option<Anchor>,
    utc_offset_s: i32,
}

impl WallClock {
    /// Create an unsynchronized wall clock
    ///
    /// # Arguments
    /// - `utc_offset_s`: Local timezone offset from UTC in seconds
    pub const fn new(utc_offset_s: i32) -> Self {
        Self {
            anchor: None,
            utc_offset_s,
        }
    }

    /// Record a successful sync
    pub fn set(&mut self, epoch_s: u64, now: Instant) {
        self.anchor = Some(Anchor { epoch_s, at: now });
    }

    /// Check if any sync has succeeded
    pub fn is_set(&self) -> bool {
        self.anchor.is_some()
    }

    /// Current UTC seconds since the Unix epoch
    pub fn epoch_seconds(&self, now: Instant) -> Option<u64> {
        self.anchor
            .map(|a| a.epoch_s + u64::from(now.since(a.at) / 1000))
    }

    /// Roll the anchor forward by whole seconds once it gets old
    ///
    /// Called once per pass; keeps wall time correct when syncs keep failing
    /// for longer than the monotonic counter period.
    pub fn refresh(&mut self, now: Instant) {
        if let Some(anchor) = self.anchor.as_mut() {
            let elapsed_ms = now.since(anchor.at);
            if elapsed_ms >= REANCHOR_AFTER_MS {
                let whole_s = elapsed_ms / 1000;
                anchor.epoch_s += u64::from(whole_s);
                anchor.at = anchor.at.wrapping_add(whole_s * 1000);
            }
        }
    }

    /// Current local time, `None` until the first successful sync
    pub fn local_time(&self, now: Instant) -> Option<LocalTime> {
        let epoch = self.epoch_seconds(now)?;
        let local = i64::try_from(epoch).ok()? + i64::from(self.utc_offset_s);
        let dt = OffsetDateTime::from_unix_timestamp(local).ok()?;
        Some(LocalTime::from_datetime(&dt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IST: i32 = 19_800;

    #[test]
    fn test_plausibility_sentinel() {
        assert!(!is_plausible(0));
        assert!(!is_plausible(MIN_PLAUSIBLE_EPOCH));
        assert!(is_plausible(MIN_PLAUSIBLE_EPOCH + 1));
    }

    #[test]
    fn test_unset_has_no_time() {
        let wall = WallClock::new(IST);
        assert!(!wall.is_set());
        assert_eq!(wall.epoch_seconds(Instant::from_millis(10)), None);
        assert_eq!(wall.local_time(Instant::from_millis(10)), None);
    }

    #[test]
    fn test_epoch_advances_with_monotonic_time() {
        let mut wall = WallClock::new(0);
        wall.set(1_700_000_000, Instant::from_millis(2_000));
        assert_eq!(wall.epoch_seconds(Instant::from_millis(2_999)), Some(1_700_000_000));
        assert_eq!(wall.epoch_seconds(Instant::from_millis(3_000)), Some(1_700_000_001));
    }

    #[test]
    fn test_local_time_with_offset() {
        // 2023-11-14T22:13:20Z is 2023-11-15 03:43:20 at UTC+5:30 (a Wednesday)
        let mut wall = WallClock::new(IST);
        wall.set(1_700_000_000, Instant::from_millis(0));
        let t = wall.local_time(Instant::from_millis(0)).unwrap();
        assert_eq!((t.hour12, t.minute, t.second, t.pm), (3, 43, 20, false));
        assert_eq!((t.day, t.month), (15, 11));
        assert_eq!(t.weekday_short(), "Wed");
    }

    #[test]
    fn test_noon_and_midnight_on_twelve_hour_dial() {
        let mut wall = WallClock::new(0);
        // 2024-01-01T00:00:00Z
        wall.set(1_704_067_200, Instant::from_millis(0));
        let midnight = wall.local_time(Instant::from_millis(0)).unwrap();
        assert_eq!((midnight.hour12, midnight.pm), (12, false));

        let noon = wall.local_time(Instant::from_millis(12 * 3_600_000)).unwrap();
        assert_eq!((noon.hour12, noon.pm), (12, true));
    }

    #[test]
    fn test_refresh_keeps_time_across_counter_wrap() {
        let mut wall = WallClock::new(0);
        let start = Instant::from_millis(u32::MAX - 1_000);
        wall.set(1_700_000_000, start);

        // Refresh daily for 60 days; the raw counter wraps on the way
        let mut now = start;
        for _ in 0..60 {
            now = now.wrapping_add(REANCHOR_AFTER_MS);
            wall.refresh(now);
        }
        assert_eq!(
            wall.epoch_seconds(now),
            Some(1_700_000_000 + 60 * 86_400)
        );
    }
}
