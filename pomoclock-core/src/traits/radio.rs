//! Network interface power control

/// Association state of the network interface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkStatus {
    /// Radio powered down
    Off,
    /// Powered and joining the access point
    Associating,
    /// Associated with an address
    Connected,
}

/// Trait for the Wi-Fi radio
///
/// All calls return immediately. `power_on` only starts association; the
/// caller polls [`status`](Self::status) on later passes. Credentials are
/// the implementation's concern.
pub trait RadioDriver {
    /// Wake the RF hardware and begin joining the configured network
    fn power_on(&mut self);

    /// Disconnect and put the RF hardware to sleep
    fn power_off(&mut self);

    /// Current link state
    fn status(&self) -> LinkStatus;

    /// Check if the link is up
    fn is_connected(&self) -> bool {
        self.status() == LinkStatus::Connected
    }
}
