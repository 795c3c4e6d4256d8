//! Exclusive radio ownership
//!
//! Two state machines (time sync and webhook dispatch) power the radio up
//! and down on their own schedules. [`RadioLink`] hands out at most one
//! [`RadioToken`] at a time. Powering on requires the token, and releasing
//! consumes it and powers the radio off, so a state machine that holds no
//! token cannot touch the radio.

use crate::traits::{LinkStatus, RadioDriver};

/// Who currently owns the radio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RadioUser {
    /// Blocking sync before the scheduler starts
    ColdStart,
    /// Background time sync
    TimeSync,
    /// Webhook dispatch
    Dispatch,
}

/// Proof of radio ownership
///
/// Not `Clone`: exactly one exists while the radio is owned, and it is
/// consumed by [`RadioLink::release`].
#[derive(Debug, PartialEq, Eq)]
#[must_use = "dropping a radio token leaves the radio owned"]
pub struct RadioToken {
    user: RadioUser,
}

impl RadioToken {
    /// Owner this token was issued to
    pub fn user(&self) -> RadioUser {
        self.user
    }
}

/// The shared network interface
#[derive(Debug)]
pub struct RadioLink<R> {
    driver: R,
    owner: Option<RadioUser>,
}

impl<R: RadioDriver> RadioLink<R> {
    /// Wrap a radio driver; the radio starts unowned
    pub fn new(driver: R) -> Self {
        Self {
            driver,
            owner: None,
        }
    }

    /// Current owner, if any
    pub fn owner(&self) -> Option<RadioUser> {
        self.owner
    }

    /// Check if no state machine holds the radio
    pub fn is_free(&self) -> bool {
        self.owner.is_none()
    }

    /// Take ownership if the radio is free
    ///
    /// Returns `None` without side effects when someone else holds it; the
    /// caller stays in its current state and tries again next tick.
    pub fn try_acquire(&mut self, user: RadioUser) -> Option<RadioToken> {
        if self.owner.is_some() {
            return None;
        }
        self.owner = Some(user);
        Some(RadioToken { user })
    }

    /// Begin association (non-blocking)
    pub fn power_on(&mut self, token: &RadioToken) {
        debug_assert_eq!(self.owner, Some(token.user));
        self.driver.power_on();
    }

    /// Current link state
    pub fn status(&self) -> LinkStatus {
        self.driver.status()
    }

    /// Check if the link is up
    pub fn is_connected(&self) -> bool {
        self.driver.is_connected()
    }

    /// Power the radio off and give up ownership
    pub fn release(&mut self, token: RadioToken) {
        debug_assert_eq!(self.owner, Some(token.user));
        self.driver.power_off();
        self.owner = None;
    }

    /// Access the underlying driver
    pub fn driver(&self) -> &R {
        &self.driver
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct FakeRadio {
        status: Option<LinkStatus>,
        power_ons: u32,
        power_offs: u32,
    }

    impl RadioDriver for FakeRadio {
        fn power_on(&mut self) {
            self.power_ons += 1;
            self.status = Some(LinkStatus::Associating);
        }

        fn power_off(&mut self) {
            self.power_offs += 1;
            self.status = Some(LinkStatus::Off);
        }

        fn status(&self) -> LinkStatus {
            self.status.unwrap_or(LinkStatus::Off)
        }
    }

    #[test]
    fn test_second_acquire_is_refused() {
        let mut radio = RadioLink::new(FakeRadio::default());
        let token = radio.try_acquire(RadioUser::TimeSync).unwrap();
        assert_eq!(radio.owner(), Some(RadioUser::TimeSync));
        assert!(radio.try_acquire(RadioUser::Dispatch).is_none());
        assert_eq!(radio.owner(), Some(RadioUser::TimeSync));
        radio.release(token);
        assert!(radio.is_free());
        assert!(radio.try_acquire(RadioUser::Dispatch).is_some());
    }

    #[test]
    fn test_release_powers_off() {
        let mut radio = RadioLink::new(FakeRadio::default());
        let token = radio.try_acquire(RadioUser::Dispatch).unwrap();
        radio.power_on(&token);
        assert_eq!(radio.status(), LinkStatus::Associating);
        radio.release(token);
        assert_eq!(radio.status(), LinkStatus::Off);
        assert_eq!(radio.driver().power_ons, 1);
        assert_eq!(radio.driver().power_offs, 1);
    }

    #[test]
    fn test_refused_acquire_has_no_side_effects() {
        let mut radio = RadioLink::new(FakeRadio::default());
        let _token = radio.try_acquire(RadioUser::ColdStart).unwrap();
        let _ = radio.try_acquire(RadioUser::TimeSync);
        assert_eq!(radio.driver().power_ons, 0);
        assert_eq!(radio.driver().power_offs, 0);
    }
}
