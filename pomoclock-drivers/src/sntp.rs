//! SNTP time client
//!
//! # Packet format (RFC 4330)
//!
//! 48 bytes, big-endian:
//! - Byte 0: leap indicator (2 bits), version (3 bits), mode (3 bits)
//! - Byte 1: stratum (0 = kiss-of-death)
//! - Bytes 40..44: transmit timestamp, whole seconds since 1900-01-01
//!
//! The client sends version 4, mode 3 (client) with every other field zero
//! and only uses the server's transmit seconds.

use heapless::String;
use pomoclock_core::config::MAX_HOST_LEN;
use pomoclock_core::traits::{TimeError, TimeService};
use pomoclock_hal::UdpExchange;

/// SNTP server port
pub const NTP_PORT: u16 = 123;

/// Size of an SNTP packet without extensions
pub const PACKET_LEN: usize = 48;

/// Seconds from 1900-01-01 (NTP epoch) to 1970-01-01 (Unix epoch)
pub const NTP_UNIX_OFFSET: u64 = 2_208_988_800;

/// Leap indicator 0, version 4, mode 3 (client)
const CLIENT_HEADER: u8 = 0b00_100_011;

const MODE_SERVER: u8 = 4;
const MODE_BROADCAST: u8 = 5;
const LEAP_ALARM: u8 = 3;
const TRANSMIT_OFFSET: usize = 40;

/// Build a client request
pub fn request_packet() -> [u8; PACKET_LEN] {
    let mut packet = [0u8; PACKET_LEN];
    packet[0] = CLIENT_HEADER;
    packet
}

/// Extract Unix seconds from a server reply
///
/// Timestamps with the top bit clear are taken to be in NTP era 1 (after
/// 2036-02-07), so the result stays correct across the era rollover.
pub fn parse_response(packet: &[u8]) -> Result<u64, TimeError> {
    if packet.len() < PACKET_LEN {
        return Err(TimeError::Malformed);
    }

    let leap = packet[0] >> 6;
    let mode = packet[0] & 0b111;
    let stratum = packet[1];

    if mode != MODE_SERVER && mode != MODE_BROADCAST {
        return Err(TimeError::Malformed);
    }
    if stratum == 0 || leap == LEAP_ALARM {
        return Err(TimeError::Refused);
    }

    let seconds = u32::from_be_bytes([
        packet[TRANSMIT_OFFSET],
        packet[TRANSMIT_OFFSET + 1],
        packet[TRANSMIT_OFFSET + 2],
        packet[TRANSMIT_OFFSET + 3],
    ]);
    if seconds == 0 {
        return Err(TimeError::Malformed);
    }

    let ntp_seconds = if seconds & 0x8000_0000 == 0 {
        u64::from(seconds) + (1 << 32)
    } else {
        u64::from(seconds)
    };
    Ok(ntp_seconds - NTP_UNIX_OFFSET)
}

/// SNTP client over a UDP transport
pub struct SntpClient<U> {
    udp: U,
    server: String<MAX_HOST_LEN>,
}

impl<U: UdpExchange> SntpClient<U> {
    /// Create a client for `server` (host name or address)
    pub fn new(udp: U, server: String<MAX_HOST_LEN>) -> Self {
        Self { udp, server }
    }

    /// Configured server
    pub fn server(&self) -> &str {
        &self.server
    }

    /// Access the transport
    pub fn udp_mut(&mut self) -> &mut U {
        &mut self.udp
    }
}

impl<U: UdpExchange> TimeService for SntpClient<U> {
    fn query(&mut self) -> Result<u64, TimeError> {
        let request = request_packet();
        let mut response = [0u8; PACKET_LEN];
        let len = self
            .udp
            .exchange(&self.server, NTP_PORT, &request, &mut response)
            .map_err(|_| TimeError::Unreachable)?;
        parse_response(&response[..len.min(PACKET_LEN)])
    }
}
