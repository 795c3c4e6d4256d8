//! Binary configuration storage
//!
//! The configuration is stored as postcard with a magic number and version
//! in front, so a blank or foreign flash region is rejected instead of
//! being decoded into nonsense.

use serde::{Deserialize, Serialize};

use super::types::{ClockConfig, ConfigError};

/// Magic number to identify a stored configuration
pub const CONFIG_MAGIC: u32 = 0x504F_4D4F; // "POMO"

/// Current configuration format version
pub const CONFIG_VERSION: u8 = 1;

/// Errors from encoding or decoding a stored configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PersistError {
    /// Buffer too small or value not encodable
    Serialize,
    /// Bytes are not a postcard-encoded configuration
    Deserialize,
    /// Magic number mismatch (blank or foreign data)
    BadMagic,
    /// Written by an incompatible firmware version
    UnsupportedVersion(u8),
    /// Decoded but failed validation
    Invalid(ConfigError),
}

#[derive(Serialize)]
struct StoredConfigRef<'a> {
    magic: u32,
    version: u8,
    config: &'a ClockConfig,
}

#[derive(Deserialize)]
struct StoredConfig {
    magic: u32,
    version: u8,
    config: ClockConfig,
}

/// Serialize a configuration into `buf`
///
/// # Returns
/// The used prefix of `buf`.
pub fn encode<'a>(config: &ClockConfig, buf: &'a mut [u8]) -> Result<&'a mut [u8], PersistError> {
    let stored = StoredConfigRef {
        magic: CONFIG_MAGIC,
        version: CONFIG_VERSION,
        config,
    };
    postcard::to_slice(&stored, buf).map_err(|_| PersistError::Serialize)
}

/// Deserialize and validate a stored configuration
pub fn decode(bytes: &[u8]) -> Result<ClockConfig, PersistError> {
    let stored: StoredConfig = postcard::from_bytes(bytes).map_err(|_| PersistError::Deserialize)?;
    if stored.magic != CONFIG_MAGIC {
        return Err(PersistError::BadMagic);
    }
    if stored.version != CONFIG_VERSION {
        return Err(PersistError::UnsupportedVersion(stored.version));
    }
    stored.config.validate().map_err(PersistError::Invalid)?;
    Ok(stored.config)
}
