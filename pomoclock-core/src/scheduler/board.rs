//! Board abstraction
//!
//! A board names the concrete type of every collaborator. The firmware
//! binary implements [`Board`] on a marker type and hands the driver a
//! [`Peripherals`] bundle.

use pomoclock_hal::{ByteStore, InputPin};

use crate::clock::Clock;
use crate::traits::{Buzzer, Display, RadioDriver, TimeService, WebhookClient};

/// Concrete collaborator types of one board
pub trait Board {
    /// Monotonic time and sleep
    type Clock: Clock;
    /// Push-button, active-low
    type Button: InputPin;
    type Buzzer: Buzzer;
    type Display: Display;
    /// Wi-Fi radio power and link state
    type Radio: RadioDriver;
    /// Network time client
    type Time: TimeService;
    /// HTTP client for webhooks
    type Webhooks: WebhookClient;
    /// Byte store holding the session counter
    type Store: ByteStore;
}

/// Initialized peripherals, moved into the driver at boot
pub struct Peripherals<B: Board> {
    pub clock: B::Clock,
    pub button: B::Button,
    pub buzzer: B::Buzzer,
    pub display: B::Display,
    pub radio: B::Radio,
    pub time: B::Time,
    pub webhooks: B::Webhooks,
    pub store: B::Store,
}
