//! GPIO buzzer
//!
//! Plays [`BuzzerPattern`]s on a single output pin. A passive piezo needs a
//! square wave, which is bit-banged with the delay provider; an active
//! buzzer only needs the pin held high.

use embedded_hal::delay::DelayNs;
use pomoclock_core::traits::{Buzzer, BuzzerPattern, BEEP_GAP_MS};
use pomoclock_hal::OutputPin;

/// Default tone for passive buzzers
pub const DEFAULT_TONE_HZ: u32 = 1000;

/// How the pin is driven during a beep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BuzzerDrive {
    /// Pin held high (active buzzer with its own oscillator)
    Level,
    /// Square wave with the given half period (passive piezo)
    Tone { half_period_us: u32 },
}

impl BuzzerDrive {
    /// Square wave at `hz`
    pub const fn tone(hz: u32) -> Self {
        let hz = if hz == 0 { 1 } else { hz };
        BuzzerDrive::Tone {
            half_period_us: 500_000 / hz,
        }
    }
}

/// Buzzer on a GPIO pin
pub struct GpioBuzzer<P, D> {
    pin: P,
    delay: D,
    drive: BuzzerDrive,
}

impl<P: OutputPin, D: DelayNs> GpioBuzzer<P, D> {
    /// Create a buzzer; the pin is driven low
    pub fn new(pin: P, delay: D, drive: BuzzerDrive) -> Self {
        let mut buzzer = Self { pin, delay, drive };
        buzzer.pin.set_low();
        buzzer
    }

    /// Passive piezo at 1 kHz
    pub fn passive(pin: P, delay: D) -> Self {
        Self::new(pin, delay, BuzzerDrive::tone(DEFAULT_TONE_HZ))
    }

    /// Active buzzer
    pub fn active(pin: P, delay: D) -> Self {
        Self::new(pin, delay, BuzzerDrive::Level)
    }

    /// Release the pin and delay
    pub fn release(self) -> (P, D) {
        (self.pin, self.delay)
    }

    fn sound(&mut self, ms: u32) {
        match self.drive {
            BuzzerDrive::Level => {
                self.pin.set_high();
                self.delay.delay_ms(ms);
            }
            BuzzerDrive::Tone { half_period_us } => {
                let half_period_us = half_period_us.max(1);
                let cycles = ms.saturating_mul(1000) / (2 * half_period_us);
                for _ in 0..cycles {
                    self.pin.set_high();
                    self.delay.delay_us(half_period_us);
                    self.pin.set_low();
                    self.delay.delay_us(half_period_us);
                }
            }
        }
        self.pin.set_low();
    }
}

impl<P: OutputPin, D: DelayNs> Buzzer for GpioBuzzer<P, D> {
    fn play(&mut self, pattern: BuzzerPattern) {
        for _ in 0..pattern.beeps() {
            self.sound(pattern.beep_ms());
            self.delay.delay_ms(BEEP_GAP_MS);
        }
    }
}
