//! Datagram transport
//!
//! Blocking, bounded UDP exchange used by the SNTP driver. Every call must
//! return within the implementation's own timeout; the scheduler treats each
//! exchange as one atomic step. Webhooks go through an `embedded-svc` HTTP
//! connection instead (see `pomoclock-drivers::http`).

/// Errors from network transports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NetError {
    /// Link is down (radio off or not associated)
    NotConnected,
    /// Host name could not be resolved
    Dns,
    /// Remote refused the datagram (ICMP unreachable)
    Refused,
    /// No answer within the transport timeout
    Timeout,
    /// Other socket-level failure
    Io,
}

/// One datagram request/response exchange (used for SNTP)
pub trait UdpExchange {
    /// Send `request` to `host:port` and wait for a single reply
    ///
    /// # Returns
    /// The number of bytes written into `response`.
    fn exchange(
        &mut self,
        host: &str,
        port: u16,
        request: &[u8],
        response: &mut [u8],
    ) -> Result<usize, NetError>;
}
