//! Background time sync
//!
//! ```text
//!   Idle ──(interval elapsed, radio free)──► Connecting ──(connected)──► Updating
//!    ▲                                          │                          │
//!    └──────────── timeout ─────────────────────┘                          │
//!    └──────────────────────────── one query ──────────────────────────────┘
//! ```
//!
//! Every return to Idle stamps `last_sync` with the current time, success or
//! not, so an unreachable network costs at most one connect attempt per
//! interval.

use crate::clock::Instant;
use crate::error::Fault;
use crate::log::{debug, info, warn};
use crate::radio::{RadioLink, RadioToken, RadioUser};
use crate::traits::{RadioDriver, TimeError, TimeService};
use crate::wall_clock::{is_plausible, WallClock};

/// Observable sync stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NetSyncState {
    Idle,
    /// Radio powered, waiting for association
    Connecting,
    /// Link up; the query runs on the next tick
    Updating,
}

/// How a sync attempt ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncOutcome {
    /// Wall clock updated
    Synced { epoch_s: u64 },
    /// Time service answered with an implausible timestamp
    Rejected { epoch_s: u64 },
    /// Query failed
    Failed(TimeError),
    /// Radio did not associate in time
    TimedOut,
}

impl SyncOutcome {
    /// Fault to log, if the attempt did not update the clock
    pub fn fault(&self) -> Option<Fault> {
        match self {
            SyncOutcome::Synced { .. } => None,
            SyncOutcome::Rejected { .. } | SyncOutcome::Failed(_) => Some(Fault::SyncRejected),
            SyncOutcome::TimedOut => Some(Fault::RadioTimeout),
        }
    }
}

#[derive(Debug)]
enum Stage {
    Idle,
    Connecting { token: RadioToken, started: Instant },
    Updating { token: RadioToken },
}

/// Periodic time sync with radio power-cycling
#[derive(Debug)]
pub struct NetworkSyncScheduler {
    stage: Stage,
    last_sync: Instant,
    interval_ms: u32,
    connect_timeout_ms: u32,
}

impl NetworkSyncScheduler {
    /// Create an idle scheduler
    ///
    /// # Arguments
    /// - `last_sync`: When the previous attempt ended (cold start sets this)
    /// - `interval_ms`: Time between attempts
    /// - `connect_timeout_ms`: Association timeout per attempt
    pub fn new(last_sync: Instant, interval_ms: u32, connect_timeout_ms: u32) -> Self {
        Self {
            stage: Stage::Idle,
            last_sync,
            interval_ms,
            connect_timeout_ms,
        }
    }

    /// Current stage
    pub fn state(&self) -> NetSyncState {
        match self.stage {
            Stage::Idle => NetSyncState::Idle,
            Stage::Connecting { .. } => NetSyncState::Connecting,
            Stage::Updating { .. } => NetSyncState::Updating,
        }
    }

    /// When the last attempt ended
    pub fn last_sync(&self) -> Instant {
        self.last_sync
    }

    /// Check if an attempt is in progress
    pub fn is_busy(&self) -> bool {
        !matches!(self.stage, Stage::Idle)
    }

    /// Check if the interval has elapsed
    pub fn is_due(&self, now: Instant) -> bool {
        now.since(self.last_sync) >= self.interval_ms
    }

    /// Advance the sync state machine
    ///
    /// Only the Updating stage blocks, for one time-service query.
    ///
    /// # Returns
    /// The outcome when an attempt finishes this tick.
    pub fn tick<R: RadioDriver, T: TimeService>(
        &mut self,
        now: Instant,
        radio: &mut RadioLink<R>,
        time: &mut T,
        wall: &mut WallClock,
    ) -> Option<SyncOutcome> {
        match core::mem::replace(&mut self.stage, Stage::Idle) {
            Stage::Idle => {
                if !self.is_due(now) {
                    return None;
                }
                // Radio busy with a webhook: stay Idle and check again next tick
                let Some(token) = radio.try_acquire(RadioUser::TimeSync) else {
                    debug!("Sync due but radio busy");
                    return None;
                };
                info!("Starting time sync");
                radio.power_on(&token);
                self.stage = Stage::Connecting {
                    token,
                    started: now,
                };
                None
            }
            Stage::Connecting { token, started } => {
                if radio.is_connected() {
                    self.stage = Stage::Updating { token };
                    None
                } else if now.exceeded(started, self.connect_timeout_ms) {
                    warn!("Radio did not connect within {} ms", self.connect_timeout_ms);
                    Some(self.finish(now, radio, token, SyncOutcome::TimedOut))
                } else {
                    self.stage = Stage::Connecting { token, started };
                    None
                }
            }
            Stage::Updating { token } => {
                let outcome = match time.query() {
                    Ok(epoch_s) if is_plausible(epoch_s) => {
                        wall.set(epoch_s, now);
                        info!("Time synced: {}", epoch_s);
                        SyncOutcome::Synced { epoch_s }
                    }
                    Ok(epoch_s) => {
                        warn!("Ignoring implausible time {}", epoch_s);
                        SyncOutcome::Rejected { epoch_s }
                    }
                    Err(e) => {
                        warn!("Time query failed: {}", e);
                        SyncOutcome::Failed(e)
                    }
                };
                Some(self.finish(now, radio, token, outcome))
            }
        }
    }

    fn finish<R: RadioDriver>(
        &mut self,
        now: Instant,
        radio: &mut RadioLink<R>,
        token: RadioToken,
        outcome: SyncOutcome,
    ) -> SyncOutcome {
        radio.release(token);
        self.last_sync = now;
        self.stage = Stage::Idle;
        outcome
    }
}
