//! Network time service

/// Errors that can occur querying the time service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimeError {
    /// No reply (DNS, socket or timeout failure)
    Unreachable,
    /// Reply could not be decoded
    Malformed,
    /// Server answered but refused to give time (e.g. kiss-of-death)
    Refused,
}

/// Trait for a time-sync protocol client
///
/// A query is one bounded network exchange. The scheduler treats it as a
/// single atomic step and applies its own plausibility check to the result.
pub trait TimeService {
    /// Ask the server for the current time
    ///
    /// # Returns
    /// Seconds since the Unix epoch (UTC).
    fn query(&mut self) -> Result<u64, TimeError>;
}
