//! Collaborator traits
//!
//! These traits define the interface between the clock logic and the
//! board-specific implementations of radio, network services, buzzer and
//! display.

pub mod buzzer;
pub mod display;
pub mod radio;
pub mod time_service;
pub mod webhook;

pub use buzzer::{Buzzer, BuzzerPattern, BEEP_GAP_MS};
pub use display::{Display, DisplayError, Frame};
pub use radio::{LinkStatus, RadioDriver};
pub use time_service::{TimeError, TimeService};
pub use webhook::{DeliveryError, Method, WebhookClient, WebhookRequest};
