//! Clock / Focus / Break mode handling
//!
//! The transition table in [`machine`] is pure; [`controller`] applies its
//! side effects (session counter, webhook queue, buzzer).

pub mod controller;
pub mod machine;
pub mod timer;

pub use controller::{Effects, ModeController};
pub use machine::{Action, Event, Mode, State, TimerDurations, Transition};
pub use timer::Timer;
