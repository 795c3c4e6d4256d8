//! Notification kinds and their HTTP shape

use core::fmt::Write;

use heapless::String;

use crate::clock::Instant;
use crate::config::Endpoints;
use crate::traits::Method;

/// Capacity of a session-log JSON body
pub const MAX_BODY_LEN: usize = 64;

/// Which timed session completed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionKind {
    Focus,
    Break,
}

impl SessionKind {
    /// Value of the `type` field in the session log
    pub const fn as_str(self) -> &'static str {
        match self {
            SessionKind::Focus => "Focus",
            SessionKind::Break => "Break",
        }
    }
}

/// What to tell the outside world
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NotificationKind {
    /// Turn do-not-disturb on
    DndOn,
    /// Turn do-not-disturb off
    DndOff,
    /// Record a completed session
    SessionLog { session: SessionKind, minutes: u16 },
}

impl NotificationKind {
    /// DND request for the given target state
    pub const fn dnd(enable: bool) -> Self {
        if enable {
            NotificationKind::DndOn
        } else {
            NotificationKind::DndOff
        }
    }

    /// DND toggles are GETs, session logs are POSTs
    pub const fn method(&self) -> Method {
        match self {
            NotificationKind::DndOn | NotificationKind::DndOff => Method::Get,
            NotificationKind::SessionLog { .. } => Method::Post,
        }
    }

    /// Configured URL for this kind (may be empty)
    pub fn endpoint<'a>(&self, endpoints: &'a Endpoints) -> &'a str {
        match self {
            NotificationKind::DndOn => endpoints.dnd_on.as_str(),
            NotificationKind::DndOff => endpoints.dnd_off.as_str(),
            NotificationKind::SessionLog { .. } => endpoints.session_log.as_str(),
        }
    }

    /// JSON body, for kinds that carry one
    ///
    /// `{"type":"Focus","duration":"25"}`. The duration is a quoted string;
    /// the receiving script expects it that way.
    pub fn json_body(&self) -> Option<String<MAX_BODY_LEN>> {
        let NotificationKind::SessionLog { session, minutes } = self else {
            return None;
        };
        let mut body = String::new();
        // Longest body is 35 bytes, so this cannot overflow
        write!(
            body,
            "{{\"type\":\"{}\",\"duration\":\"{}\"}}",
            session.as_str(),
            minutes
        )
        .ok()?;
        Some(body)
    }

    /// Short label for logs
    pub const fn label(&self) -> &'static str {
        match self {
            NotificationKind::DndOn => "dnd-on",
            NotificationKind::DndOff => "dnd-off",
            NotificationKind::SessionLog { .. } => "session-log",
        }
    }
}

/// The single queued notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PendingRequest {
    pub kind: NotificationKind,
    /// When the first request of this dispatch was queued; the connect
    /// timeout runs from here
    pub requested_at: Instant,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_log_body() {
        let kind = NotificationKind::SessionLog {
            session: SessionKind::Focus,
            minutes: 25,
        };
        assert_eq!(
            kind.json_body().as_deref(),
            Some(r#"{"type":"Focus","duration":"25"}"#)
        );
        assert_eq!(kind.method(), Method::Post);
    }

    #[test]
    fn test_largest_body_fits() {
        let kind = NotificationKind::SessionLog {
            session: SessionKind::Break,
            minutes: u16::MAX,
        };
        assert_eq!(
            kind.json_body().as_deref(),
            Some(r#"{"type":"Break","duration":"65535"}"#)
        );
    }

    #[test]
    fn test_dnd_has_no_body() {
        assert_eq!(NotificationKind::dnd(true), NotificationKind::DndOn);
        assert_eq!(NotificationKind::DndOff.json_body(), None);
        assert_eq!(NotificationKind::DndOn.method(), Method::Get);
    }

    #[test]
    fn test_endpoint_selection() {
        let mut endpoints = Endpoints::default();
        let _ = endpoints.dnd_off.push_str("http://hooks.local/dnd/off");
        assert_eq!(
            NotificationKind::DndOff.endpoint(&endpoints),
            "http://hooks.local/dnd/off"
        );
        assert_eq!(NotificationKind::DndOn.endpoint(&endpoints), "");
    }
}
