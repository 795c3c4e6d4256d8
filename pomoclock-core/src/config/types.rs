//! Configuration type definitions
//!
//! Defaults match the stock desk clock: 25/5 minute Pomodoro, 24 sessions
//! before the counter wraps, time sync every 30 minutes, UTC+5:30.

use heapless::String;

use crate::mode::TimerDurations;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum webhook URL length
pub const MAX_URL_LEN: usize = 128;

/// Maximum time server host name length
pub const MAX_HOST_LEN: usize = 64;

/// Default time server
pub const DEFAULT_TIME_SERVER: &str = "pool.ntp.org";

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A duration or interval that must be positive is zero
    ZeroDuration,
    /// Long-press threshold must be above the debounce time
    LongPressNotAboveDebounce,
    /// Session maximum leaves no room to detect an erased store byte
    MaxSessionsTooLarge,
    /// Focus length must be whole minutes (it is logged in minutes)
    FocusNotWholeMinutes,
    /// Sync interval must exceed the connect timeout
    SyncIntervalTooShort,
    /// Timezone offset outside ±24h
    OffsetOutOfRange,
    /// Time server host name is empty
    MissingTimeServer,
}

/// Webhook endpoints; an empty URL disables that notification
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Endpoints {
    /// GET to turn do-not-disturb on
    pub dnd_on: String<MAX_URL_LEN>,
    /// GET to turn do-not-disturb off
    pub dnd_off: String<MAX_URL_LEN>,
    /// POST target for completed sessions
    pub session_log: String<MAX_URL_LEN>,
}

/// Scheduling pass cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cadence {
    /// Pass period while showing the clock
    pub clock_pass_ms: u32,
    /// Delay after each pass while a timer runs
    pub interactive_pass_ms: u32,
    /// Sub-tick period inside the clock pass while the network is quiet
    pub idle_sub_tick_ms: u32,
    /// Sub-tick period while time sync is in progress
    pub busy_sub_tick_ms: u32,
}

impl Default for Cadence {
    fn default() -> Self {
        Self {
            clock_pass_ms: 1000,
            interactive_pass_ms: 10,
            idle_sub_tick_ms: 50,
            busy_sub_tick_ms: 10,
        }
    }
}

/// Cold-start sequence settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BootConfig {
    /// Link polls before giving up on Wi-Fi
    pub wifi_attempts: u8,
    /// Time queries before giving up on sync
    pub ntp_attempts: u8,
    /// Delay between polls/queries
    pub retry_delay_ms: u32,
    /// After a failed boot sync, background sync retries this soon
    pub failure_retry_ms: u32,
    /// How long a failure message stays on screen
    pub status_hold_ms: u32,
    /// Poll period while waiting for the boot button to be released
    pub release_poll_ms: u32,
}

impl Default for BootConfig {
    fn default() -> Self {
        Self {
            wifi_attempts: 30,
            ntp_attempts: 10,
            retry_delay_ms: 500,
            failure_retry_ms: 10_000,
            status_hold_ms: 1000,
            release_poll_ms: 10,
        }
    }
}

/// Complete clock configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClockConfig {
    /// Session counter wraps to 0 past this value
    pub max_sessions: u8,
    /// Store address of the session counter byte
    pub store_address: u16,
    /// Presses held at least this long are long presses
    pub long_press_ms: u32,
    /// Presses this short or shorter are ignored
    pub debounce_ms: u32,
    /// Focus period length
    pub focus_seconds: u32,
    /// Break period length
    pub break_seconds: u32,
    /// Background time sync period
    pub sync_interval_ms: u32,
    /// Radio association timeout
    pub connect_timeout_ms: u32,
    /// Local timezone offset from UTC
    pub utc_offset_seconds: i32,
    /// Time server host
    pub time_server: String<MAX_HOST_LEN>,
    pub endpoints: Endpoints,
    pub cadence: Cadence,
    pub boot: BootConfig,
}

impl Default for ClockConfig {
    fn default() -> Self {
        let mut time_server = String::new();
        let _ = time_server.push_str(DEFAULT_TIME_SERVER);

        Self {
            max_sessions: 24,
            store_address: 0,
            long_press_ms: 500,
            debounce_ms: 50,
            focus_seconds: 25 * 60,
            break_seconds: 5 * 60,
            sync_interval_ms: 30 * 60 * 1000,
            connect_timeout_ms: 15_000,
            utc_offset_seconds: 19_800,
            time_server,
            endpoints: Endpoints::default(),
            cadence: Cadence::default(),
            boot: BootConfig::default(),
        }
    }
}

impl ClockConfig {
    /// Check the configuration for values the scheduler cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let durations = [
            self.long_press_ms,
            self.focus_seconds,
            self.break_seconds,
            self.sync_interval_ms,
            self.connect_timeout_ms,
            self.cadence.clock_pass_ms,
            self.cadence.interactive_pass_ms,
            self.cadence.idle_sub_tick_ms,
            self.cadence.busy_sub_tick_ms,
            self.boot.release_poll_ms,
        ];
        if durations.contains(&0) {
            return Err(ConfigError::ZeroDuration);
        }
        if self.long_press_ms <= self.debounce_ms {
            return Err(ConfigError::LongPressNotAboveDebounce);
        }
        if self.max_sessions == u8::MAX {
            return Err(ConfigError::MaxSessionsTooLarge);
        }
        if self.focus_seconds % 60 != 0 || self.focus_seconds / 60 > u32::from(u16::MAX) {
            return Err(ConfigError::FocusNotWholeMinutes);
        }
        if self.sync_interval_ms <= self.connect_timeout_ms {
            return Err(ConfigError::SyncIntervalTooShort);
        }
        if self.utc_offset_seconds.unsigned_abs() >= 86_400 {
            return Err(ConfigError::OffsetOutOfRange);
        }
        if self.time_server.is_empty() {
            return Err(ConfigError::MissingTimeServer);
        }
        Ok(())
    }

    /// Focus length in minutes, as reported to the session log
    pub fn focus_minutes(&self) -> u16 {
        (self.focus_seconds / 60) as u16
    }

    /// Timer lengths for the mode machine
    pub fn timer_durations(&self) -> TimerDurations {
        TimerDurations {
            focus_s: self.focus_seconds,
            break_s: self.break_seconds,
        }
    }
}
