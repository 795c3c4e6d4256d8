//! Persisted completed-session counter
//!
//! One byte in the persistent store at a fixed address. Loaded once at
//! boot, written through (write + commit) on every change.

use pomoclock_hal::{ByteStore, StoreError};

use crate::error::Fault;
use crate::log::{info, warn};

/// Completed-session count backed by the persistent store
#[derive(Debug)]
pub struct SessionCounter<S> {
    store: S,
    address: u16,
    max: u8,
    count: u8,
}

impl<S: ByteStore> SessionCounter<S> {
    /// Load the counter from the store
    ///
    /// A value above `max` is treated as corruption: the counter resets to 0
    /// (written back) and [`Fault::StoreCorrupt`] is reported. A failed read
    /// also starts from 0 but leaves the store untouched.
    pub fn load(mut store: S, address: u16, max: u8) -> (Self, Option<Fault>) {
        let (count, fault) = match store.read(address) {
            Ok(value) if value <= max => (value, None),
            Ok(value) => {
                warn!("Stored session count {} out of range, resetting", value);
                (0, Some(Fault::StoreCorrupt))
            }
            Err(e) => {
                warn!("Session count read failed: {}", e);
                (0, None)
            }
        };

        let mut counter = Self {
            store,
            address,
            max,
            count,
        };
        if fault.is_some() {
            let _ = counter.persist();
        }
        (counter, fault)
    }

    /// Current count
    pub fn count(&self) -> u8 {
        self.count
    }

    /// Upper bound of the count
    pub fn max(&self) -> u8 {
        self.max
    }

    /// Credit one completed session
    ///
    /// Wraps to 0 past the maximum. The in-memory count changes even if the
    /// write fails.
    pub fn increment(&mut self) -> Result<u8, StoreError> {
        self.count = if self.count >= self.max {
            0
        } else {
            self.count + 1
        };
        info!("Session count now {}", self.count);
        self.persist().map(|_| self.count)
    }

    /// Clear the count to 0
    pub fn reset(&mut self) -> Result<(), StoreError> {
        self.count = 0;
        info!("Session count cleared");
        self.persist()
    }

    /// Access the underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        let result = self.store.write_through(self.address, self.count);
        if let Err(e) = result {
            warn!("Session count write failed: {}", e);
        }
        result
    }
}
