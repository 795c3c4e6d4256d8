//! Push-button press classification
//!
//! Sampled once per pass. The press timestamp is taken on the pressed edge
//! and the press is classified on the released edge, so exactly one event
//! comes out of each press-release cycle.

use crate::clock::Instant;

/// Classified press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEvent {
    /// No completed press (or a bounce too short to count)
    None,
    /// Released after more than the debounce time
    ShortPress,
    /// Held for at least the long-press time
    LongPress,
}

/// Debounce and duration classifier for one button
#[derive(Debug, Clone)]
pub struct ButtonInputClassifier {
    long_press_ms: u32,
    debounce_ms: u32,
    was_pressed: bool,
    pressed_at: Instant,
}

impl ButtonInputClassifier {
    /// Create a classifier; the button is assumed released at start
    pub const fn new(long_press_ms: u32, debounce_ms: u32) -> Self {
        Self {
            long_press_ms,
            debounce_ms,
            was_pressed: false,
            pressed_at: Instant::from_millis(0),
        }
    }

    /// Classify a completed press by its duration
    pub const fn classify(&self, duration_ms: u32) -> ButtonEvent {
        if duration_ms >= self.long_press_ms {
            ButtonEvent::LongPress
        } else if duration_ms > self.debounce_ms {
            ButtonEvent::ShortPress
        } else {
            ButtonEvent::None
        }
    }

    /// Feed one sample of the button level
    ///
    /// # Arguments
    /// - `pressed`: true while the button is held (pin low on the board)
    /// - `now`: sample time
    pub fn sample(&mut self, pressed: bool, now: Instant) -> ButtonEvent {
        let event = match (self.was_pressed, pressed) {
            (false, true) => {
                self.pressed_at = now;
                ButtonEvent::None
            }
            (true, false) => self.classify(now.since(self.pressed_at)),
            _ => ButtonEvent::None,
        };
        self.was_pressed = pressed;
        event
    }

    /// Check if the button is currently held
    pub fn is_held(&self) -> bool {
        self.was_pressed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn press(classifier: &mut ButtonInputClassifier, at: u32, duration: u32) -> ButtonEvent {
        let down = classifier.sample(true, Instant::from_millis(at));
        assert_eq!(down, ButtonEvent::None);
        classifier.sample(false, Instant::from_millis(at.wrapping_add(duration)))
    }

    #[test]
    fn test_boundaries() {
        let mut c = ButtonInputClassifier::new(500, 50);
        assert_eq!(press(&mut c, 0, 50), ButtonEvent::None);
        assert_eq!(press(&mut c, 1_000, 51), ButtonEvent::ShortPress);
        assert_eq!(press(&mut c, 2_000, 499), ButtonEvent::ShortPress);
        assert_eq!(press(&mut c, 3_000, 500), ButtonEvent::LongPress);
    }

    #[test]
    fn test_held_button_emits_nothing_until_release() {
        let mut c = ButtonInputClassifier::new(500, 50);
        assert_eq!(c.sample(true, Instant::from_millis(0)), ButtonEvent::None);
        for t in (10..2_000).step_by(10) {
            assert_eq!(c.sample(true, Instant::from_millis(t)), ButtonEvent::None);
        }
        assert!(c.is_held());
        assert_eq!(c.sample(false, Instant::from_millis(2_000)), ButtonEvent::LongPress);
        assert_eq!(c.sample(false, Instant::from_millis(2_010)), ButtonEvent::None);
    }

    #[test]
    fn test_press_across_counter_wrap() {
        let mut c = ButtonInputClassifier::new(500, 50);
        assert_eq!(press(&mut c, u32::MAX - 100, 200), ButtonEvent::ShortPress);
    }

    #[test]
    fn test_release_without_press_is_ignored() {
        let mut c = ButtonInputClassifier::new(500, 50);
        assert_eq!(c.sample(false, Instant::from_millis(900)), ButtonEvent::None);
    }

    proptest! {
        #[test]
        fn prop_classification(start in any::<u32>(), d in 0u32..5_000) {
            let mut c = ButtonInputClassifier::new(500, 50);
            let expected = if d <= 50 {
                ButtonEvent::None
            } else if d < 500 {
                ButtonEvent::ShortPress
            } else {
                ButtonEvent::LongPress
            };
            prop_assert_eq!(press(&mut c, start, d), expected);
        }
    }
}
