//! Best-effort webhook notifications
//!
//! At most one request is in flight or waiting. A newer request replaces
//! the waiting one, and a request whose radio never comes up is dropped.

pub mod dispatcher;
pub mod request;

pub use dispatcher::{DispatchReport, DispatchState, NotificationDispatcher};
pub use request::{NotificationKind, PendingRequest, SessionKind, MAX_BODY_LEN};
