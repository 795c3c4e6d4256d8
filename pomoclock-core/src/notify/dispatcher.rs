//! Notification dispatcher
//!
//! ```text
//!            enqueue
//!   Idle ─────────────► WakingRadio ──(radio free)──► WaitingForRadio
//!    ▲                      │                            │
//!    │                      │ (already connected)        │ (connected)
//!    │                      ▼                            ▼
//!    └──── deliver ◄──── Sending ◄───────────────────────┘
//! ```
//!
//! The connect timeout runs from the time the request was queued, across
//! both waiting stages, so a request is always resolved (sent or dropped)
//! within `connect_timeout_ms` plus one tick even while time sync keeps the
//! radio busy.
//!
//! [`poll`](NotificationDispatcher::poll) never blocks.
//! [`deliver`](NotificationDispatcher::deliver) performs the HTTP exchange
//! and is the only blocking call; the scheduler runs it after rendering.

use super::request::{NotificationKind, PendingRequest};
use crate::clock::Instant;
use crate::config::Endpoints;
use crate::error::Fault;
use crate::log::{debug, info, warn};
use crate::radio::{RadioLink, RadioToken, RadioUser};
use crate::traits::{DeliveryError, RadioDriver, WebhookClient, WebhookRequest};

/// Observable dispatcher stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DispatchState {
    /// Nothing queued
    Idle,
    /// Request queued, radio not yet owned
    WakingRadio,
    /// Radio owned and associating
    WaitingForRadio,
    /// Link up; request goes out on the next deliver
    Sending,
}

/// How a dispatch ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DispatchReport {
    /// Endpoint answered with a 2xx status
    Delivered { kind: NotificationKind, status: u16 },
    /// Endpoint answered with a non-2xx status
    Rejected { kind: NotificationKind, status: u16 },
    /// The exchange itself failed
    Failed {
        kind: NotificationKind,
        error: DeliveryError,
    },
    /// Radio did not come up within the connect timeout
    Abandoned { kind: NotificationKind },
}

impl DispatchReport {
    /// The notification this report is about
    pub fn kind(&self) -> NotificationKind {
        match *self {
            DispatchReport::Delivered { kind, .. }
            | DispatchReport::Rejected { kind, .. }
            | DispatchReport::Failed { kind, .. }
            | DispatchReport::Abandoned { kind } => kind,
        }
    }

    /// Fault to log, if the notification was lost
    pub fn fault(&self) -> Option<Fault> {
        match self {
            DispatchReport::Delivered { .. } => None,
            DispatchReport::Rejected { .. } | DispatchReport::Failed { .. } => {
                Some(Fault::DeliveryFailed)
            }
            DispatchReport::Abandoned { .. } => Some(Fault::DispatchAbandoned),
        }
    }
}

/// Internal stage; owning stages carry the radio token
#[derive(Debug)]
enum Stage {
    Idle,
    WakingRadio,
    WaitingForRadio(RadioToken),
    Sending(RadioToken),
}

/// Single-slot, last-writer-wins webhook dispatcher
#[derive(Debug)]
pub struct NotificationDispatcher {
    stage: Stage,
    pending: Option<PendingRequest>,
    endpoints: Endpoints,
    connect_timeout_ms: u32,
}

impl NotificationDispatcher {
    /// Create an idle dispatcher
    pub fn new(endpoints: Endpoints, connect_timeout_ms: u32) -> Self {
        Self {
            stage: Stage::Idle,
            pending: None,
            endpoints,
            connect_timeout_ms,
        }
    }

    /// Current stage
    pub fn state(&self) -> DispatchState {
        match self.stage {
            Stage::Idle => DispatchState::Idle,
            Stage::WakingRadio => DispatchState::WakingRadio,
            Stage::WaitingForRadio(_) => DispatchState::WaitingForRadio,
            Stage::Sending(_) => DispatchState::Sending,
        }
    }

    /// The queued request, if any
    pub fn pending(&self) -> Option<PendingRequest> {
        self.pending
    }

    /// Check if the dispatcher currently owns the radio
    pub fn holds_radio(&self) -> bool {
        matches!(self.stage, Stage::WaitingForRadio(_) | Stage::Sending(_))
    }

    /// Configured endpoints
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Queue a notification
    ///
    /// From Idle this starts a dispatch. While a dispatch is under way the
    /// new request replaces the waiting one without restarting the connect
    /// timeout; that includes Sending, so the next `deliver` sends the
    /// replacement. Kinds with no configured endpoint are dropped.
    ///
    /// # Returns
    /// `true` if the request was queued.
    pub fn enqueue(&mut self, kind: NotificationKind, now: Instant) -> bool {
        if kind.endpoint(&self.endpoints).is_empty() {
            debug!("No endpoint for {}, not queued", kind.label());
            return false;
        }

        let idle = matches!(self.stage, Stage::Idle);
        match self.pending.as_mut() {
            Some(pending) if !idle => {
                debug!(
                    "Replacing queued {} with {}",
                    pending.kind.label(),
                    kind.label()
                );
                pending.kind = kind;
            }
            _ => {
                self.pending = Some(PendingRequest {
                    kind,
                    requested_at: now,
                });
                if idle {
                    self.stage = Stage::WakingRadio;
                }
                info!("Queued {}", kind.label());
            }
        }
        true
    }

    /// Advance radio acquisition (non-blocking)
    ///
    /// # Returns
    /// [`DispatchReport::Abandoned`] if the request timed out this tick.
    pub fn poll<R: RadioDriver>(
        &mut self,
        now: Instant,
        radio: &mut RadioLink<R>,
    ) -> Option<DispatchReport> {
        let request = self.pending?;
        let timed_out = now.exceeded(request.requested_at, self.connect_timeout_ms);

        match core::mem::replace(&mut self.stage, Stage::Idle) {
            Stage::Idle => None,
            Stage::WakingRadio => {
                if timed_out {
                    return Some(self.abandon(request));
                }
                match radio.try_acquire(RadioUser::Dispatch) {
                    None => {
                        self.stage = Stage::WakingRadio;
                    }
                    Some(token) if radio.is_connected() => {
                        self.stage = Stage::Sending(token);
                    }
                    Some(token) => {
                        radio.power_on(&token);
                        self.stage = Stage::WaitingForRadio(token);
                    }
                }
                None
            }
            Stage::WaitingForRadio(token) => {
                if radio.is_connected() {
                    self.stage = Stage::Sending(token);
                    None
                } else if timed_out {
                    radio.release(token);
                    Some(self.abandon(request))
                } else {
                    self.stage = Stage::WaitingForRadio(token);
                    None
                }
            }
            sending @ Stage::Sending(_) => {
                self.stage = sending;
                None
            }
        }
    }

    /// Perform the HTTP exchange if the link is up (blocking)
    ///
    /// Releases the radio and returns to Idle whatever the outcome.
    pub fn deliver<R: RadioDriver, W: WebhookClient>(
        &mut self,
        radio: &mut RadioLink<R>,
        client: &mut W,
    ) -> Option<DispatchReport> {
        let token = match core::mem::replace(&mut self.stage, Stage::Idle) {
            Stage::Sending(token) => token,
            other => {
                self.stage = other;
                return None;
            }
        };

        let report = self
            .pending
            .take()
            .map(|request| self.exchange(request.kind, client));
        radio.release(token);
        report
    }

    /// One full step: poll, then deliver if ready
    pub fn tick<R: RadioDriver, W: WebhookClient>(
        &mut self,
        now: Instant,
        radio: &mut RadioLink<R>,
        client: &mut W,
    ) -> Option<DispatchReport> {
        if let Some(report) = self.poll(now, radio) {
            return Some(report);
        }
        self.deliver(radio, client)
    }

    fn exchange<W: WebhookClient>(&self, kind: NotificationKind, client: &mut W) -> DispatchReport {
        let body = kind.json_body();
        let request = WebhookRequest {
            method: kind.method(),
            url: kind.endpoint(&self.endpoints),
            json_body: body.as_deref(),
        };

        match client.send(&request) {
            Ok(status) if (200..300).contains(&status) => {
                info!("Sent {} ({})", kind.label(), status);
                DispatchReport::Delivered { kind, status }
            }
            Ok(status) => {
                warn!("{} rejected with status {}", kind.label(), status);
                DispatchReport::Rejected { kind, status }
            }
            Err(error) => {
                warn!("{} failed: {}", kind.label(), error);
                DispatchReport::Failed { kind, error }
            }
        }
    }

    fn abandon(&mut self, request: PendingRequest) -> DispatchReport {
        warn!("Radio not up in time, dropping {}", request.kind.label());
        self.pending = None;
        DispatchReport::Abandoned { kind: request.kind }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::SessionKind;
    use crate::traits::{LinkStatus, Method};
    use proptest::prelude::*;

    /// Radio that associates after a fixed number of status polls
    #[derive(Debug, Default)]
    struct FakeRadio {
        powered: bool,
        connect_after: Option<u32>,
        polls: core::cell::Cell<u32>,
        power_ons: u32,
    }

    impl RadioDriver for FakeRadio {
        fn power_on(&mut self) {
            self.powered = true;
            self.power_ons += 1;
            self.polls.set(0);
        }

        fn power_off(&mut self) {
            self.powered = false;
        }

        fn status(&self) -> LinkStatus {
            if !self.powered {
                return LinkStatus::Off;
            }
            let polls = self.polls.get() + 1;
            self.polls.set(polls);
            match self.connect_after {
                Some(n) if polls > n => LinkStatus::Connected,
                _ => LinkStatus::Associating,
            }
        }
    }

    #[derive(Debug, Default)]
    struct RecordingClient {
        sent: heapless::Vec<(Method, heapless::String<128>, Option<heapless::String<64>>), 8>,
        reply: Option<Result<u16, DeliveryError>>,
    }

    impl WebhookClient for RecordingClient {
        fn send(&mut self, request: &WebhookRequest<'_>) -> Result<u16, DeliveryError> {
            let url = heapless::String::try_from(request.url).unwrap();
            let body = request
                .json_body
                .map(|b| heapless::String::try_from(b).unwrap());
            self.sent.push((request.method, url, body)).unwrap();
            self.reply.unwrap_or(Ok(200))
        }
    }

    fn endpoints() -> Endpoints {
        let mut endpoints = Endpoints::default();
        endpoints.dnd_on.push_str("http://hooks.local/on").unwrap();
        endpoints.dnd_off.push_str("http://hooks.local/off").unwrap();
        endpoints.session_log.push_str("http://hooks.local/log").unwrap();
        endpoints
    }

    fn at(ms: u32) -> Instant {
        Instant::from_millis(ms)
    }

    fn focus_log() -> NotificationKind {
        NotificationKind::SessionLog {
            session: SessionKind::Focus,
            minutes: 25,
        }
    }

    #[test]
    fn test_delivers_after_association() {
        let mut radio = RadioLink::new(FakeRadio {
            connect_after: Some(2),
            ..Default::default()
        });
        let mut client = RecordingClient::default();
        let mut dispatcher = NotificationDispatcher::new(endpoints(), 15_000);

        assert!(dispatcher.enqueue(focus_log(), at(0)));
        assert_eq!(dispatcher.state(), DispatchState::WakingRadio);

        assert_eq!(dispatcher.tick(at(10), &mut radio, &mut client), None);
        assert_eq!(dispatcher.state(), DispatchState::WaitingForRadio);
        assert_eq!(radio.owner(), Some(RadioUser::Dispatch));

        let mut report = None;
        for t in 2..10 {
            report = dispatcher.tick(at(t * 10), &mut radio, &mut client);
            if report.is_some() {
                break;
            }
        }

        assert_eq!(
            report,
            Some(DispatchReport::Delivered {
                kind: focus_log(),
                status: 200
            })
        );
        assert_eq!(dispatcher.state(), DispatchState::Idle);
        assert!(radio.is_free());
        assert!(!radio.driver().powered);

        let (method, url, body) = &client.sent[0];
        assert_eq!(*method, Method::Post);
        assert_eq!(url.as_str(), "http://hooks.local/log");
        assert_eq!(
            body.as_deref(),
            Some(r#"{"type":"Focus","duration":"25"}"#)
        );
    }

    #[test]
    fn test_last_writer_wins() {
        let mut radio = RadioLink::new(FakeRadio {
            connect_after: Some(0),
            ..Default::default()
        });
        let mut client = RecordingClient::default();
        let mut dispatcher = NotificationDispatcher::new(endpoints(), 15_000);

        dispatcher.enqueue(NotificationKind::DndOn, at(0));
        dispatcher.enqueue(NotificationKind::DndOff, at(5));
        dispatcher.enqueue(focus_log(), at(8));

        // Deadline still counts from the first enqueue
        assert_eq!(dispatcher.pending().map(|p| p.requested_at), Some(at(0)));

        for t in 1..5 {
            dispatcher.tick(at(t * 10), &mut radio, &mut client);
        }
        assert_eq!(client.sent.len(), 1);
        assert_eq!(client.sent[0].1.as_str(), "http://hooks.local/log");
    }

    #[test]
    fn test_request_while_sending_replaces_target() {
        let mut radio = RadioLink::new(FakeRadio {
            powered: true,
            connect_after: Some(0),
            ..Default::default()
        });
        let mut client = RecordingClient::default();
        let mut dispatcher = NotificationDispatcher::new(endpoints(), 15_000);

        dispatcher.enqueue(NotificationKind::DndOn, at(0));
        assert_eq!(dispatcher.poll(at(1), &mut radio), None);
        assert_eq!(dispatcher.state(), DispatchState::Sending);

        assert!(dispatcher.enqueue(NotificationKind::DndOff, at(2)));
        assert_eq!(dispatcher.state(), DispatchState::Sending);

        assert_eq!(
            dispatcher.deliver(&mut radio, &mut client),
            Some(DispatchReport::Delivered {
                kind: NotificationKind::DndOff,
                status: 200
            })
        );
        assert_eq!(client.sent.len(), 1);
        assert_eq!(client.sent[0].1.as_str(), "http://hooks.local/off");
        assert_eq!(dispatcher.pending(), None);
        assert_eq!(dispatcher.state(), DispatchState::Idle);
        assert!(radio.is_free());
    }

    #[test]
    fn test_abandons_when_radio_never_connects() {
        let mut radio = RadioLink::new(FakeRadio::default());
        let mut client = RecordingClient::default();
        let mut dispatcher = NotificationDispatcher::new(endpoints(), 15_000);

        dispatcher.enqueue(NotificationKind::DndOn, at(0));
        assert_eq!(dispatcher.tick(at(10), &mut radio, &mut client), None);
        assert_eq!(dispatcher.tick(at(15_000), &mut radio, &mut client), None);

        let report = dispatcher.tick(at(15_001), &mut radio, &mut client);
        assert_eq!(
            report,
            Some(DispatchReport::Abandoned {
                kind: NotificationKind::DndOn
            })
        );
        assert_eq!(report.and_then(|r| r.fault()), Some(Fault::DispatchAbandoned));
        assert_eq!(dispatcher.state(), DispatchState::Idle);
        assert!(radio.is_free());
        assert!(client.sent.is_empty());
    }

    #[test]
    fn test_waits_while_radio_is_busy() {
        let mut radio = RadioLink::new(FakeRadio {
            connect_after: Some(0),
            ..Default::default()
        });
        let mut client = RecordingClient::default();
        let mut dispatcher = NotificationDispatcher::new(endpoints(), 1_000);

        let sync_token = radio.try_acquire(RadioUser::TimeSync).unwrap();
        dispatcher.enqueue(NotificationKind::DndOn, at(0));

        assert_eq!(dispatcher.tick(at(500), &mut radio, &mut client), None);
        assert_eq!(dispatcher.state(), DispatchState::WakingRadio);
        assert_eq!(radio.owner(), Some(RadioUser::TimeSync));

        // Sync never lets go: the request is dropped on schedule
        let report = dispatcher.tick(at(1_001), &mut radio, &mut client);
        assert_eq!(
            report,
            Some(DispatchReport::Abandoned {
                kind: NotificationKind::DndOn
            })
        );
        assert_eq!(radio.owner(), Some(RadioUser::TimeSync));
        radio.release(sync_token);
    }

    #[test]
    fn test_uses_link_already_up() {
        let mut radio = RadioLink::new(FakeRadio {
            powered: true,
            connect_after: Some(0),
            ..Default::default()
        });
        let mut client = RecordingClient::default();
        let mut dispatcher = NotificationDispatcher::new(endpoints(), 15_000);

        dispatcher.enqueue(NotificationKind::DndOff, at(0));
        assert_eq!(dispatcher.poll(at(1), &mut radio), None);
        assert_eq!(dispatcher.state(), DispatchState::Sending);
        assert_eq!(radio.driver().power_ons, 0);
    }

    #[test]
    fn test_error_status_is_rejected() {
        let mut radio = RadioLink::new(FakeRadio {
            connect_after: Some(0),
            ..Default::default()
        });
        let mut client = RecordingClient {
            reply: Some(Ok(500)),
            ..Default::default()
        };
        let mut dispatcher = NotificationDispatcher::new(endpoints(), 15_000);

        dispatcher.enqueue(NotificationKind::DndOn, at(0));
        dispatcher.tick(at(1), &mut radio, &mut client);
        let report = dispatcher.tick(at(2), &mut radio, &mut client);
        assert_eq!(
            report,
            Some(DispatchReport::Rejected {
                kind: NotificationKind::DndOn,
                status: 500
            })
        );
        assert_eq!(report.and_then(|r| r.fault()), Some(Fault::DeliveryFailed));
        assert!(radio.is_free());
    }

    #[test]
    fn test_transport_error_releases_radio() {
        let mut radio = RadioLink::new(FakeRadio {
            connect_after: Some(0),
            ..Default::default()
        });
        let mut client = RecordingClient {
            reply: Some(Err(DeliveryError::Transport)),
            ..Default::default()
        };
        let mut dispatcher = NotificationDispatcher::new(endpoints(), 15_000);

        dispatcher.enqueue(NotificationKind::DndOn, at(0));
        dispatcher.tick(at(1), &mut radio, &mut client);
        let report = dispatcher.tick(at(2), &mut radio, &mut client);
        assert!(matches!(report, Some(DispatchReport::Failed { .. })));
        assert!(radio.is_free());
        assert!(!radio.driver().powered);
    }

    #[test]
    fn test_unconfigured_endpoint_is_not_queued() {
        let mut dispatcher = NotificationDispatcher::new(Endpoints::default(), 15_000);
        assert!(!dispatcher.enqueue(NotificationKind::DndOn, at(0)));
        assert_eq!(dispatcher.state(), DispatchState::Idle);
        assert_eq!(dispatcher.pending(), None);
    }

    proptest! {
        /// Whatever the radio does, a queued request resolves within the
        /// connect timeout plus one tick.
        #[test]
        fn prop_request_resolves_in_time(
            connect_after in proptest::option::of(0u32..50),
            busy_until in 0u32..20_000,
            step in 1u32..100,
        ) {
            let timeout = 1_000;
            let mut radio = RadioLink::new(FakeRadio {
                connect_after,
                ..Default::default()
            });
            let mut client = RecordingClient::default();
            let mut dispatcher = NotificationDispatcher::new(endpoints(), timeout);
            let mut sync_token = radio.try_acquire(RadioUser::TimeSync);

            dispatcher.enqueue(NotificationKind::DndOn, at(0));
            let mut now = 0;
            let mut resolved_at = None;
            while now <= timeout + 2 * step {
                if now >= busy_until {
                    if let Some(token) = sync_token.take() {
                        radio.release(token);
                    }
                }
                if dispatcher.tick(at(now), &mut radio, &mut client).is_some() {
                    resolved_at = Some(now);
                    break;
                }
                now += step;
            }

            prop_assert!(resolved_at.is_some());
            prop_assert!(resolved_at.unwrap_or(u32::MAX) <= timeout + step);
            prop_assert_eq!(dispatcher.state(), DispatchState::Idle);
            prop_assert_ne!(radio.owner(), Some(RadioUser::Dispatch));
            if let Some(token) = sync_token.take() {
                radio.release(token);
            }
        }
    }
}
