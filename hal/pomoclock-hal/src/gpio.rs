//! Digital pins
//!
//! The clock uses exactly two: the push-button input and the buzzer output.

/// Push-pull output (buzzer)
pub trait OutputPin {
    /// Drive the pin high
    fn set_high(&mut self);

    /// Drive the pin low
    fn set_low(&mut self);

    /// Last level driven
    fn is_set_high(&self) -> bool;
}

/// Digital input (push-button)
///
/// Pull resistors are set up by the HAL when the pin is created. The button
/// is wired to ground with the internal pull-up enabled, so it reads low
/// while held.
pub trait InputPin {
    /// Check if the pin reads high
    fn is_high(&self) -> bool;

    /// Check if the pin reads low
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}
