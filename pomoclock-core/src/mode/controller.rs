//! Mode controller
//!
//! Owns the current [`State`] and applies the side effects of each
//! transition: session counter updates, session-log webhooks and buzzer
//! feedback.

use pomoclock_hal::ByteStore;

use super::machine::{Action, Event, Mode, State, TimerDurations};
use super::timer::Timer;
use crate::button::ButtonEvent;
use crate::clock::Instant;
use crate::log::info;
use crate::notify::{NotificationDispatcher, NotificationKind, SessionKind};
use crate::session::SessionCounter;
use crate::traits::{Buzzer, Frame};
use crate::wall_clock::WallClock;

/// Everything a transition may touch
pub struct Effects<'a, S, Z> {
    pub sessions: &'a mut SessionCounter<S>,
    pub dispatcher: &'a mut NotificationDispatcher,
    pub buzzer: &'a mut Z,
}

/// Clock / Focus / Break controller
#[derive(Debug)]
pub struct ModeController {
    state: State,
    durations: TimerDurations,
    focus_minutes: u16,
}

impl ModeController {
    /// Create a controller in Clock mode
    pub fn new(durations: TimerDurations, focus_minutes: u16) -> Self {
        Self {
            state: State::Clock,
            durations,
            focus_minutes,
        }
    }

    /// Current state
    pub fn state(&self) -> State {
        self.state
    }

    /// Current mode
    pub fn mode(&self) -> Mode {
        self.state.mode()
    }

    /// Running timer, if any
    pub fn timer(&self) -> Option<Timer> {
        self.state.timer()
    }

    /// Apply this pass's button event, then check the timer
    ///
    /// # Returns
    /// The last action performed, if any.
    pub fn tick<S: ByteStore, Z: Buzzer>(
        &mut self,
        button: ButtonEvent,
        now: Instant,
        effects: &mut Effects<'_, S, Z>,
    ) -> Option<Action> {
        let mut performed = None;

        if let Some(event) = Event::from_button(button) {
            performed = self.apply(event, now, effects).or(performed);
        }

        let expired = self.state.timer().is_some_and(|timer| timer.is_expired(now));
        if expired {
            performed = self.apply(Event::TimerExpired, now, effects).or(performed);
        }

        performed
    }

    /// What the display should show now
    pub fn frame(&self, now: Instant, wall: &WallClock, sessions: u8) -> Frame {
        match self.state {
            State::Clock => Frame::Clock {
                time: wall.local_time(now),
                sessions,
            },
            State::Focus(timer) | State::Break(timer) => Frame::Timer {
                mode: self.state.mode(),
                remaining_s: timer.remaining_s(now),
                progress_permille: timer.progress_permille(now),
            },
        }
    }

    fn apply<S: ByteStore, Z: Buzzer>(
        &mut self,
        event: Event,
        now: Instant,
        effects: &mut Effects<'_, S, Z>,
    ) -> Option<Action> {
        let transition = self.state.transition(event, now, &self.durations);
        if transition.next.mode() != self.state.mode() {
            info!("Mode {} -> {}", self.state.mode(), transition.next.mode());
        }
        self.state = transition.next;

        let action = transition.action?;
        self.perform(action, now, effects);
        Some(action)
    }

    fn perform<S: ByteStore, Z: Buzzer>(
        &mut self,
        action: Action,
        now: Instant,
        effects: &mut Effects<'_, S, Z>,
    ) {
        // Store failures are logged by the counter; the mode change stands
        match action {
            Action::ResetSessions => {
                let _ = effects.sessions.reset();
            }
            Action::FocusComplete => {
                effects.dispatcher.enqueue(
                    NotificationKind::SessionLog {
                        session: SessionKind::Focus,
                        minutes: self.focus_minutes,
                    },
                    now,
                );
            }
            Action::BreakComplete => {
                let _ = effects.sessions.increment();
            }
            Action::StartFocus | Action::Abort => {}
        }

        effects.buzzer.play(action.pattern());
    }
}
