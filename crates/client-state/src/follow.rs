use chrono::{DateTime, Duration, Utc};
use contracts::domain::follow::{FollowOutcome, FollowStatus};

use crate::deadline::{default_timeout, InFlight};

/// Follow/unfollow button state for one profile.
///
/// Same reconciliation contract as the like button: optimistic flip,
/// authoritative overwrite on success, exact rollback on failure or timeout.
/// `can_follow` comes from the server (false on your own profile and for
/// anonymous viewers) and gates every toggle.
#[derive(Debug, Clone)]
pub struct FollowButton {
    status: FollowStatus,
    timeout: Duration,
    in_flight: Option<InFlight<bool>>,
}

impl FollowButton {
    pub fn new(status: FollowStatus) -> Self {
        Self {
            status,
            timeout: default_timeout(),
            in_flight: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn is_following(&self) -> bool {
        self.status.is_following
    }

    pub fn can_follow(&self) -> bool {
        self.status.can_follow
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Optimistically flip and report whether to issue the toggle request.
    pub fn begin_toggle(&mut self, now: DateTime<Utc>) -> bool {
        if !self.status.can_follow || self.in_flight.is_some() {
            return false;
        }
        self.in_flight = Some(InFlight::new(self.status.is_following, now));
        self.status.is_following = !self.status.is_following;
        true
    }

    pub fn apply_success(&mut self, outcome: FollowOutcome) {
        self.in_flight = None;
        self.status.is_following = outcome.following;
    }

    pub fn apply_failure(&mut self) {
        if let Some(flight) = self.in_flight.take() {
            self.status.is_following = flight.snapshot;
        }
    }

    /// Expire a hung request; returns true when a rollback happened.
    pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
        match &self.in_flight {
            Some(flight) if flight.expired(now, self.timeout) => {
                log::warn!("follow toggle timed out; rolling back");
                self.apply_failure();
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(is_following: bool, can_follow: bool) -> FollowStatus {
        FollowStatus {
            is_following,
            can_follow,
        }
    }

    #[test]
    fn toggle_and_confirm() {
        let mut button = FollowButton::new(status(false, true));
        assert!(button.begin_toggle(Utc::now()));
        assert!(button.is_following());

        button.apply_success(FollowOutcome { following: true });
        assert!(button.is_following());
        assert!(!button.is_busy());
    }

    #[test]
    fn failure_restores_previous_state() {
        let mut button = FollowButton::new(status(true, true));
        assert!(button.begin_toggle(Utc::now()));
        assert!(!button.is_following());

        button.apply_failure();
        assert!(button.is_following());
    }

    #[test]
    fn own_profile_and_anonymous_are_gated() {
        let mut own = FollowButton::new(status(false, false));
        assert!(!own.begin_toggle(Utc::now()));
        assert!(!own.is_following());
    }

    #[test]
    fn timeout_rolls_back() {
        let start = Utc::now();
        let mut button =
            FollowButton::new(status(false, true)).with_timeout(Duration::seconds(10));
        assert!(button.begin_toggle(start));
        assert!(button.tick(start + Duration::seconds(30)));
        assert!(!button.is_following());
    }
}
