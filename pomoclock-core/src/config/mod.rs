//! Configuration types
//!
//! Board-agnostic configuration. With the `serde` feature the whole
//! [`ClockConfig`] can be stored as postcard binary data.

#[cfg(feature = "serde")]
pub mod persist;
pub mod types;

pub use types::*;
