//! Cooperative scheduling driver
//!
//! [`DeskClock`] owns every component and advances them from a single loop.
//! [`boot`] holds the one-time blocking cold start that runs before the
//! loop.

pub mod board;
pub mod boot;
pub mod driver;


pub use board::{Board, Peripherals};
pub use boot::{
    BootReport, ColdStartOutcome, STATUS_NTP_FAILED, STATUS_STARTING, STATUS_SYNCING,
    STATUS_WIFI_FAILED,
};
pub use driver::DeskClock;
