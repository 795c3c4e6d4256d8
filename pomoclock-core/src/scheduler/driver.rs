//! Scheduling driver
//!
//! One pass, at a single `now`:
//!
//! 1. sample the button
//! 2. mode transitions (button event, then timer expiry)
//! 3. time sync tick
//! 4. dispatcher poll
//! 5. render
//! 6. dispatcher deliver (the one blocking HTTP exchange, after the frame
//!    is out)
//!
//! In Clock mode the rest of the clock period is spent in sub-ticks that
//! repeat steps 1-4 and 6 every `idle_sub_tick_ms` (`busy_sub_tick_ms` while
//! sync is in progress) and end early when the mode leaves Clock. Focus and
//! Break passes run back to back with a short sleep.

use pomoclock_hal::InputPin;

use super::board::{Board, Peripherals};
use super::boot::BootReport;
use crate::button::ButtonInputClassifier;
use crate::clock::{Clock, Instant};
use crate::config::{ClockConfig, ConfigError};
use crate::log::{info, warn};
use crate::mode::{Effects, Mode, ModeController};
use crate::net_sync::{NetSyncState, NetworkSyncScheduler};
use crate::notify::{DispatchReport, DispatchState, NotificationDispatcher, NotificationKind};
use crate::radio::RadioLink;
use crate::session::SessionCounter;
use crate::traits::Display;
use crate::wall_clock::WallClock;

/// The desk clock: every component plus its collaborators
pub struct DeskClock<B: Board> {
    pub(super) config: ClockConfig,
    pub(super) clock: B::Clock,
    pub(super) button_pin: B::Button,
    buzzer: B::Buzzer,
    pub(super) display: B::Display,
    pub(super) radio: RadioLink<B::Radio>,
    pub(super) time: B::Time,
    webhooks: B::Webhooks,
    button: ButtonInputClassifier,
    mode: ModeController,
    sessions: SessionCounter<B::Store>,
    dispatcher: NotificationDispatcher,
    sync: NetworkSyncScheduler,
    pub(super) wall: WallClock,
}

impl<B: Board> DeskClock<B> {
    /// Validate the configuration, load state and run the cold start
    ///
    /// Blocks for the cold start (up to roughly 21 s with the default
    /// attempt budgets).
    pub fn boot(config: ClockConfig, hw: Peripherals<B>) -> Result<(Self, BootReport), ConfigError> {
        config.validate()?;

        let Peripherals {
            clock,
            button,
            buzzer,
            display,
            radio,
            time,
            webhooks,
            store,
        } = hw;

        let (sessions, store_fault) =
            SessionCounter::load(store, config.store_address, config.max_sessions);
        let now = clock.now();

        let mut desk = Self {
            clock,
            button_pin: button,
            buzzer,
            display,
            radio: RadioLink::new(radio),
            time,
            webhooks,
            button: ButtonInputClassifier::new(config.long_press_ms, config.debounce_ms),
            mode: ModeController::new(config.timer_durations(), config.focus_minutes()),
            sessions,
            dispatcher: NotificationDispatcher::new(
                config.endpoints.clone(),
                config.connect_timeout_ms,
            ),
            sync: NetworkSyncScheduler::new(now, config.sync_interval_ms, config.connect_timeout_ms),
            wall: WallClock::new(config.utc_offset_seconds),
            config,
        };

        let (outcome, last_sync) = desk.cold_start();
        desk.sync = NetworkSyncScheduler::new(
            last_sync,
            desk.config.sync_interval_ms,
            desk.config.connect_timeout_ms,
        );

        let report = BootReport {
            sync: outcome,
            store_fault,
            sessions: desk.sessions.count(),
        };
        info!("Boot complete, {} sessions", report.sessions);
        Ok((desk, report))
    }

    /// Run forever
    pub fn run(&mut self) -> ! {
        loop {
            self.run_cycle();
        }
    }

    /// One full pass plus the pacing that follows it
    pub fn run_cycle(&mut self) {
        let start = self.clock.now();
        self.pass(start);

        if self.mode.mode() == Mode::Clock {
            self.idle(start);
        } else {
            self.clock.sleep_ms(self.config.cadence.interactive_pass_ms);
        }
    }

    /// One scheduling pass at `now`, including the render
    pub fn pass(&mut self, now: Instant) {
        self.advance(now);
        self.render(now);
        self.deliver();
    }

    /// One pass without the render
    pub fn sub_tick(&mut self, now: Instant) {
        self.advance(now);
        self.deliver();
    }

    /// Ask for do-not-disturb on or off
    ///
    /// Never blocks. Replaces any notification still waiting for the radio.
    pub fn request_dnd(&mut self, enable: bool) -> bool {
        let now = self.clock.now();
        self.dispatcher.enqueue(NotificationKind::dnd(enable), now)
    }

    /// Current mode
    pub fn mode(&self) -> Mode {
        self.mode.mode()
    }

    /// Mode state including the running timer
    pub fn mode_controller(&self) -> &ModeController {
        &self.mode
    }

    /// Completed sessions
    pub fn sessions(&self) -> &SessionCounter<B::Store> {
        &self.sessions
    }

    /// Time sync stage
    pub fn sync_state(&self) -> NetSyncState {
        self.sync.state()
    }

    /// Time sync scheduler
    pub fn sync(&self) -> &NetworkSyncScheduler {
        &self.sync
    }

    /// Webhook dispatch stage
    pub fn dispatch_state(&self) -> DispatchState {
        self.dispatcher.state()
    }

    /// Shared radio
    pub fn radio(&self) -> &RadioLink<B::Radio> {
        &self.radio
    }

    /// Wall clock
    pub fn wall(&self) -> &WallClock {
        &self.wall
    }

    /// Monotonic clock
    pub fn clock(&self) -> &B::Clock {
        &self.clock
    }

    /// Display collaborator
    pub fn display(&self) -> &B::Display {
        &self.display
    }

    /// Buzzer collaborator
    pub fn buzzer(&self) -> &B::Buzzer {
        &self.buzzer
    }

    /// Webhook client
    pub fn webhooks(&self) -> &B::Webhooks {
        &self.webhooks
    }

    fn idle(&mut self, start: Instant) {
        let period = self.config.cadence.clock_pass_ms;
        loop {
            let now = self.clock.now();
            let spent = now.since(start);
            if spent >= period || self.mode.mode() != Mode::Clock {
                return;
            }

            let step = if self.sync.is_busy() {
                self.config.cadence.busy_sub_tick_ms
            } else {
                self.config.cadence.idle_sub_tick_ms
            };
            self.clock.sleep_ms(step.min(period - spent));

            let now = self.clock.now();
            self.sub_tick(now);
        }
    }

    fn advance(&mut self, now: Instant) {
        let pressed = self.button_pin.is_low();
        let event = self.button.sample(pressed, now);

        let mut effects = Effects {
            sessions: &mut self.sessions,
            dispatcher: &mut self.dispatcher,
            buzzer: &mut self.buzzer,
        };
        self.mode.tick(event, now, &mut effects);

        self.wall.refresh(now);
        if let Some(outcome) = self
            .sync
            .tick(now, &mut self.radio, &mut self.time, &mut self.wall)
        {
            if let Some(fault) = outcome.fault() {
                warn!("Sync: {}", fault.as_str());
            }
        }

        if let Some(report) = self.dispatcher.poll(now, &mut self.radio) {
            Self::log_dispatch(&report);
        }
    }

    fn render(&mut self, now: Instant) {
        let frame = self.mode.frame(now, &self.wall, self.sessions.count());
        if let Err(e) = self.display.render(&frame) {
            warn!("Render failed: {}", e);
        }
    }

    fn deliver(&mut self) {
        if let Some(report) = self.dispatcher.deliver(&mut self.radio, &mut self.webhooks) {
            Self::log_dispatch(&report);
        }
    }

    fn log_dispatch(report: &DispatchReport) {
        match report.fault() {
            Some(fault) => warn!("Dispatch {}: {}", report.kind().label(), fault.as_str()),
            None => info!("Dispatch {} done", report.kind().label()),
        }
    }
}
