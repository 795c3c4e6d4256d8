//! Pomoclock Hardware Abstraction Layer
//!
//! This crate defines hardware abstraction traits that can be implemented
//! by chip-specific HALs (ESP8266, RP2040 + CYW43, etc.). The clock logic in
//! `pomoclock-core` and the drivers in `pomoclock-drivers` only see these
//! traits, so the same code runs on the device and in host tests.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (board firmware)           │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ pomoclock-    │       │ pomoclock-    │
//! │    core       │◄──────│   drivers     │
//! └───────────────┘       └───────────────┘
//!         │                       │
//!         └───────────┬───────────┘
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  pomoclock-hal (this crate - traits)    │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O
//! - [`store::ByteStore`] - EEPROM-style persistent bytes
//! - [`net::UdpExchange`] - Single request/response datagram exchange
//!
//! HTTP is not abstracted here: the webhook driver is written against
//! `embedded_svc::http::client::Connection`, which board crates already
//! implement (e.g. `EspHttpConnection`).

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod net;
pub mod store;

// Re-export key traits at crate root for convenience
pub use gpio::{InputPin, OutputPin};
pub use net::{NetError, UdpExchange};
pub use store::{ByteStore, StoreError};
