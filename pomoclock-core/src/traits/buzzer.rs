//! Buzzer output

/// Fixed beep sequences played at mode transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BuzzerPattern {
    /// Focus started
    SingleBeep,
    /// Focus finished
    DoubleBeep,
    /// Timer aborted: two short beeps
    AbortBeep,
    /// Break finished
    TripleBeep,
    /// Session count cleared
    ConfirmReset,
}

/// Gap of silence after every beep
pub const BEEP_GAP_MS: u32 = 100;

impl BuzzerPattern {
    /// Number of beeps in the pattern
    pub const fn beeps(self) -> u8 {
        match self {
            BuzzerPattern::SingleBeep | BuzzerPattern::ConfirmReset => 1,
            BuzzerPattern::DoubleBeep | BuzzerPattern::AbortBeep => 2,
            BuzzerPattern::TripleBeep => 3,
        }
    }

    /// Length of each beep in milliseconds
    pub const fn beep_ms(self) -> u32 {
        match self {
            BuzzerPattern::ConfirmReset => 1000,
            BuzzerPattern::AbortBeep => 100,
            _ => 200,
        }
    }

    /// Total time the pattern blocks the caller
    pub const fn total_ms(self) -> u32 {
        self.beeps() as u32 * (self.beep_ms() + BEEP_GAP_MS)
    }
}

/// Trait for the buzzer
///
/// `play` is synchronous: it returns once the whole pattern has sounded.
pub trait Buzzer {
    fn play(&mut self, pattern: BuzzerPattern);
}
