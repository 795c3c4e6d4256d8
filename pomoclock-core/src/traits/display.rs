//! Display trait for the clock face
//!
//! The display is a pure sink: the driver hands it a [`Frame`] describing
//! the settled state once per pass and never reads anything back.

use crate::mode::Mode;
use crate::wall_clock::LocalTime;

/// Errors that can occur with the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Bus write failed
    Bus,
}

/// Everything needed to draw one screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Frame {
    /// Clock face
    Clock {
        /// Local time, `None` until the first successful sync
        time: Option<LocalTime>,
        /// Completed sessions
        sessions: u8,
    },
    /// Focus or break countdown
    Timer {
        /// `Mode::Focus` or `Mode::Break`
        mode: Mode,
        /// Seconds left on the timer
        remaining_s: u32,
        /// Elapsed fraction of the timer, 0..=1000
        progress_permille: u16,
    },
}

impl Frame {
    /// Remaining timer time as (minutes, seconds)
    pub const fn remaining_mm_ss(&self) -> Option<(u32, u32)> {
        match self {
            Frame::Timer { remaining_s, .. } => Some((*remaining_s / 60, *remaining_s % 60)),
            Frame::Clock { .. } => None,
        }
    }
}

/// Trait for the display
pub trait Display {
    /// Draw a full frame
    fn render(&mut self, frame: &Frame) -> Result<(), DisplayError>;

    /// Show a one-line status message (cold start only)
    fn show_status(&mut self, text: &str) -> Result<(), DisplayError>;
}
