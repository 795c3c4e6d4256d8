//! Board-agnostic core logic for the Pomoclock desk clock
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Collaborator traits (radio, time service, webhooks, buzzer, display)
//! - Monotonic clock with wraparound-safe arithmetic
//! - Radio ownership shared by the two network state machines
//! - Button press classification
//! - Clock / Focus / Break mode state machine
//! - Background time sync and webhook dispatch state machines
//! - Persisted session counter
//! - Scheduling driver and cold-start sequence
//! - Configuration type definitions
//!
//! Nothing here blocks except the documented single network exchanges and
//! the one-time cold start.

#![no_std]
#![deny(unsafe_code)]

pub(crate) mod log;

pub mod button;
pub mod clock;
pub mod config;
pub mod error;
pub mod mode;
pub mod net_sync;
pub mod notify;
pub mod radio;
pub mod scheduler;
pub mod session;
pub mod traits;
pub mod wall_clock;
