//! Cold start
//!
//! Runs once before the scheduling loop and is allowed to block: bring the
//! radio up, get the time, power the radio back down. Failures are shown on
//! screen for a moment and leave the background sync to retry shortly.

use pomoclock_hal::InputPin;

use super::board::Board;
use super::driver::DeskClock;
use crate::clock::{Clock, Instant};
use crate::error::Fault;
use crate::log::{info, warn};
use crate::radio::RadioUser;
use crate::traits::{Display, TimeService};
use crate::wall_clock::is_plausible;

/// Shown while the radio associates
pub const STATUS_STARTING: &str = "STARTING CLOCK...";
/// Shown while querying the time server
pub const STATUS_SYNCING: &str = "SYNCING TIME";
/// Shown when the radio never associated
pub const STATUS_WIFI_FAILED: &str = "WiFi Failed!";
/// Shown when no plausible time was received
pub const STATUS_NTP_FAILED: &str = "NTP Failed!";

/// Result of the boot-time sync
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ColdStartOutcome {
    /// Wall clock set
    Synced { epoch_s: u64 },
    /// Radio did not associate within the attempt budget
    WifiFailed,
    /// Connected, but no query returned a plausible time
    TimeFailed,
}

impl ColdStartOutcome {
    /// Fault to log, if the clock is still unset
    pub fn fault(&self) -> Option<Fault> {
        match self {
            ColdStartOutcome::Synced { .. } => None,
            ColdStartOutcome::WifiFailed => Some(Fault::RadioTimeout),
            ColdStartOutcome::TimeFailed => Some(Fault::SyncRejected),
        }
    }
}

/// What happened during boot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BootReport {
    pub sync: ColdStartOutcome,
    /// Set when the stored session count was out of range
    pub store_fault: Option<Fault>,
    /// Session count after loading
    pub sessions: u8,
}

impl<B: Board> DeskClock<B> {
    /// Blocking boot-time sync
    ///
    /// # Returns
    /// The outcome and the `last_sync` stamp for the background scheduler.
    /// On failure the stamp is back-dated so the next background attempt
    /// comes `failure_retry_ms` after boot instead of a full interval.
    pub(super) fn cold_start(&mut self) -> (ColdStartOutcome, Instant) {
        self.show_status(STATUS_STARTING);

        let outcome = self.cold_sync();
        let now = self.clock.now();
        let last_sync = match outcome {
            ColdStartOutcome::Synced { epoch_s } => {
                info!("Boot sync ok: {}", epoch_s);
                now
            }
            ColdStartOutcome::WifiFailed | ColdStartOutcome::TimeFailed => {
                let text = if outcome == ColdStartOutcome::WifiFailed {
                    STATUS_WIFI_FAILED
                } else {
                    STATUS_NTP_FAILED
                };
                warn!("Boot sync failed: {}", text);
                let back = self
                    .config
                    .sync_interval_ms
                    .saturating_sub(self.config.boot.failure_retry_ms);
                self.show_status(text);
                self.clock.sleep_ms(self.config.boot.status_hold_ms);
                now.wrapping_sub(back)
            }
        };

        // The press that woke the board must not start a timer
        while self.button_pin.is_low() {
            self.clock.sleep_ms(self.config.boot.release_poll_ms);
        }

        (outcome, last_sync)
    }

    fn cold_sync(&mut self) -> ColdStartOutcome {
        let Some(token) = self.radio.try_acquire(RadioUser::ColdStart) else {
            warn!("Radio owned at boot");
            return ColdStartOutcome::WifiFailed;
        };
        self.radio.power_on(&token);

        let boot = self.config.boot;
        let mut attempts = 0;
        while !self.radio.is_connected() && attempts < boot.wifi_attempts {
            self.clock.sleep_ms(boot.retry_delay_ms);
            attempts += 1;
        }

        let outcome = if self.radio.is_connected() {
            self.show_status(STATUS_SYNCING);
            self.query_boot_time()
        } else {
            ColdStartOutcome::WifiFailed
        };

        self.radio.release(token);
        outcome
    }

    fn query_boot_time(&mut self) -> ColdStartOutcome {
        let boot = self.config.boot;
        for attempt in 0..boot.ntp_attempts {
            match self.time.query() {
                Ok(epoch_s) if is_plausible(epoch_s) => {
                    self.wall.set(epoch_s, self.clock.now());
                    return ColdStartOutcome::Synced { epoch_s };
                }
                Ok(epoch_s) => warn!("Boot query {}: implausible {}", attempt, epoch_s),
                Err(e) => warn!("Boot query {}: {}", attempt, e),
            }
            self.clock.sleep_ms(boot.retry_delay_ms);
        }
        ColdStartOutcome::TimeFailed
    }

    fn show_status(&mut self, text: &str) {
        if let Err(e) = self.display.show_status(text) {
            warn!("Status display failed: {}", e);
        }
    }
}
