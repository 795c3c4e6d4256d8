//! Mode state machine definition
//!
//! The mode graph is closed: Clock → Focus → Break → Clock, plus a
//! long-press abort from Focus or Break back to Clock. Only Focus and Break
//! carry a timer.

use super::timer::Timer;
use crate::button::ButtonEvent;
use crate::clock::Instant;
use crate::traits::BuzzerPattern;

/// Top-level operating mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    Clock,
    Focus,
    Break,
}

/// Mode plus its countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Showing the time; no timer
    Clock,
    /// Focus period running
    Focus(Timer),
    /// Break period running
    Break(Timer),
}

/// Inputs to the mode machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    ShortPress,
    LongPress,
    /// The running timer reached its duration
    TimerExpired,
}

impl Event {
    /// Map a classified button event; `None` carries no input
    pub const fn from_button(button: ButtonEvent) -> Option<Self> {
        match button {
            ButtonEvent::ShortPress => Some(Event::ShortPress),
            ButtonEvent::LongPress => Some(Event::LongPress),
            ButtonEvent::None => None,
        }
    }
}

/// Side effect requested by a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// Clear the session counter
    ResetSessions,
    /// Focus period began
    StartFocus,
    /// Timer abandoned by long press; nothing credited
    Abort,
    /// Focus period finished; log it
    FocusComplete,
    /// Break finished; credit one session
    BreakComplete,
}

impl Action {
    /// Buzzer feedback for the action
    pub const fn pattern(self) -> BuzzerPattern {
        match self {
            Action::ResetSessions => BuzzerPattern::ConfirmReset,
            Action::StartFocus => BuzzerPattern::SingleBeep,
            Action::Abort => BuzzerPattern::AbortBeep,
            Action::FocusComplete => BuzzerPattern::DoubleBeep,
            Action::BreakComplete => BuzzerPattern::TripleBeep,
        }
    }
}

/// Timer lengths used when entering Focus and Break
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerDurations {
    pub focus_s: u32,
    pub break_s: u32,
}

/// Result of applying one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub next: State,
    pub action: Option<Action>,
}

impl State {
    /// Mode without the timer
    pub const fn mode(&self) -> Mode {
        match self {
            State::Clock => Mode::Clock,
            State::Focus(_) => Mode::Focus,
            State::Break(_) => Mode::Break,
        }
    }

    /// Running timer, if any
    pub const fn timer(&self) -> Option<Timer> {
        match self {
            State::Clock => None,
            State::Focus(timer) | State::Break(timer) => Some(*timer),
        }
    }

    /// Process an event and return the next state with its side effect
    ///
    /// Total over (state, event): pairs without a rule keep the state and
    /// request nothing.
    pub fn transition(self, event: Event, now: Instant, durations: &TimerDurations) -> Transition {
        use Event::*;
        use State::*;

        let (next, action) = match (self, event) {
            (Clock, LongPress) => (Clock, Some(Action::ResetSessions)),
            (Clock, ShortPress) => (
                Focus(Timer::start(now, durations.focus_s)),
                Some(Action::StartFocus),
            ),
            (Clock, TimerExpired) => (Clock, None),

            (Focus(_) | Break(_), LongPress) => (Clock, Some(Action::Abort)),
            (Focus(_) | Break(_), ShortPress) => (self, None),

            (Focus(_), TimerExpired) => (
                Break(Timer::start(now, durations.break_s)),
                Some(Action::FocusComplete),
            ),
            (Break(_), TimerExpired) => (Clock, Some(Action::BreakComplete)),
        };

        Transition { next, action }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DURATIONS: TimerDurations = TimerDurations {
        focus_s: 1500,
        break_s: 300,
    };

    fn at(ms: u32) -> Instant {
        Instant::from_millis(ms)
    }

    #[test]
    fn test_short_press_starts_focus() {
        let t = State::Clock.transition(Event::ShortPress, at(42), &DURATIONS);
        assert_eq!(t.next, State::Focus(Timer::start(at(42), 1500)));
        assert_eq!(t.action, Some(Action::StartFocus));
        assert_eq!(t.next.timer().map(|t| t.duration_s), Some(1500));
    }

    #[test]
    fn test_long_press_in_clock_resets() {
        let t = State::Clock.transition(Event::LongPress, at(0), &DURATIONS);
        assert_eq!(t.next, State::Clock);
        assert_eq!(t.action, Some(Action::ResetSessions));
        assert_eq!(Action::ResetSessions.pattern(), BuzzerPattern::ConfirmReset);
    }

    #[test]
    fn test_long_press_aborts_any_timer() {
        let timer = Timer::start(at(0), 10);
        for state in [State::Focus(timer), State::Break(timer)] {
            let t = state.transition(Event::LongPress, at(5), &DURATIONS);
            assert_eq!(t.next, State::Clock);
            assert_eq!(t.action, Some(Action::Abort));
            assert!(t.next.timer().is_none());
        }
        assert_eq!(Action::Abort.pattern(), BuzzerPattern::AbortBeep);
        assert_ne!(Action::Abort.pattern(), Action::FocusComplete.pattern());
    }

    #[test]
    fn test_normal_cycle() {
        let focus = State::Clock.transition(Event::ShortPress, at(0), &DURATIONS).next;
        let brk = focus.transition(Event::TimerExpired, at(1_500_000), &DURATIONS);
        assert_eq!(brk.next, State::Break(Timer::start(at(1_500_000), 300)));
        assert_eq!(brk.action, Some(Action::FocusComplete));

        let clock = brk.next.transition(Event::TimerExpired, at(1_800_000), &DURATIONS);
        assert_eq!(clock.next, State::Clock);
        assert_eq!(clock.action, Some(Action::BreakComplete));
        assert_eq!(Action::BreakComplete.pattern(), BuzzerPattern::TripleBeep);
    }

    #[test]
    fn test_unhandled_pairs_keep_state() {
        let timer = Timer::start(at(0), 10);
        let cases = [
            (State::Clock, Event::TimerExpired),
            (State::Focus(timer), Event::ShortPress),
            (State::Break(timer), Event::ShortPress),
        ];
        for (state, event) in cases {
            let t = state.transition(event, at(1), &DURATIONS);
            assert_eq!(t.next, state);
            assert_eq!(t.action, None);
        }
    }

    #[test]
    fn test_button_mapping() {
        assert_eq!(Event::from_button(ButtonEvent::None), None);
        assert_eq!(Event::from_button(ButtonEvent::ShortPress), Some(Event::ShortPress));
        assert_eq!(Event::from_button(ButtonEvent::LongPress), Some(Event::LongPress));
    }
}
