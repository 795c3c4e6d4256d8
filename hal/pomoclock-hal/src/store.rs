//! Persistent byte storage
//!
//! EEPROM-style storage: individually addressable bytes that are staged by
//! `write` and made durable by `commit`. On chips without EEPROM the HAL
//! emulates it on a flash sector.

/// Errors from persistent storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError {
    /// Address outside the emulated region
    OutOfBounds,
    /// Underlying flash/EEPROM operation failed
    Device,
}

/// Byte-addressable persistent store
pub trait ByteStore {
    /// Read one byte
    fn read(&mut self, address: u16) -> Result<u8, StoreError>;

    /// Stage one byte for writing
    ///
    /// The value is only guaranteed to survive a reset after [`commit`](Self::commit).
    fn write(&mut self, address: u16, value: u8) -> Result<(), StoreError>;

    /// Flush staged writes to the backing memory
    fn commit(&mut self) -> Result<(), StoreError>;

    /// Write one byte and commit it immediately
    fn write_through(&mut self, address: u16, value: u8) -> Result<(), StoreError> {
        self.write(address, value)?;
        self.commit()
    }
}
