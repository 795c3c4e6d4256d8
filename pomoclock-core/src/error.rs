//! Recoverable fault taxonomy
//!
//! Every fault is handled where it happens; none stops the scheduler. The
//! driver only logs them.

/// A locally recovered fault
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Fault {
    /// Radio did not associate within the connect timeout
    RadioTimeout,
    /// Time service gave no usable timestamp; prior time kept
    SyncRejected,
    /// Radio never came up for a queued notification; request dropped
    DispatchAbandoned,
    /// HTTP exchange failed or returned an error status; request dropped
    DeliveryFailed,
    /// Persisted session counter out of range; reset to 0
    StoreCorrupt,
}

impl Fault {
    /// Short label for diagnostics
    pub const fn as_str(self) -> &'static str {
        match self {
            Fault::RadioTimeout => "radio timeout",
            Fault::SyncRejected => "sync rejected",
            Fault::DispatchAbandoned => "dispatch abandoned",
            Fault::DeliveryFailed => "delivery failed",
            Fault::StoreCorrupt => "store corrupt",
        }
    }
}
