//! Driver implementations
//!
//! Concrete implementations of the collaborator traits defined in
//! pomoclock-core, built on the pomoclock-hal transports and pins:
//!
//! - Buzzer on a GPIO pin (active or passive piezo)
//! - SNTP time client over UDP
//! - HTTP webhook client over an `embedded-svc` connection, with redirect
//!   following

#![no_std]
#![deny(unsafe_code)]

pub mod buzzer;
pub mod http;
pub mod sntp;

pub use buzzer::{BuzzerDrive, GpioBuzzer};
pub use http::HttpWebhookClient;
pub use sntp::SntpClient;
