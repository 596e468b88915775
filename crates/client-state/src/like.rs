use chrono::{DateTime, Duration, Utc};
use contracts::domain::engagement::LikeOutcome;

use crate::deadline::{default_timeout, InFlight};

/// Like button state for one content item.
///
/// `begin_toggle` applies the optimistic flip and tells the host whether to
/// issue the request; the server response then overwrites local state
/// entirely (it may disagree with the guess when other viewers raced us).
/// A failure or timeout restores the exact pre-toggle snapshot.
#[derive(Debug, Clone)]
pub struct LikeState {
    liked: bool,
    like_count: i64,
    /// False for anonymous viewers; the control renders disabled.
    can_like: bool,
    timeout: Duration,
    in_flight: Option<InFlight<(bool, i64)>>,
}

impl LikeState {
    pub fn new(liked: bool, like_count: i64, can_like: bool) -> Self {
        Self {
            liked,
            like_count,
            can_like,
            timeout: default_timeout(),
            in_flight: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn liked(&self) -> bool {
        self.liked
    }

    pub fn like_count(&self) -> i64 {
        self.like_count
    }

    pub fn can_like(&self) -> bool {
        self.can_like
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Optimistically flip and report whether the host must issue the toggle
    /// request. Returns false (no flip, no request) for anonymous viewers and
    /// while a previous toggle is still outstanding.
    pub fn begin_toggle(&mut self, now: DateTime<Utc>) -> bool {
        if !self.can_like || self.in_flight.is_some() {
            return false;
        }
        self.in_flight = Some(InFlight::new((self.liked, self.like_count), now));
        self.liked = !self.liked;
        self.like_count += if self.liked { 1 } else { -1 };
        true
    }

    /// Overwrite with the authoritative server state.
    pub fn apply_success(&mut self, outcome: LikeOutcome) {
        self.in_flight = None;
        self.liked = outcome.liked;
        self.like_count = outcome.like_count;
    }

    /// Roll back to the exact pre-toggle snapshot.
    pub fn apply_failure(&mut self) {
        if let Some(flight) = self.in_flight.take() {
            let (liked, like_count) = flight.snapshot;
            self.liked = liked;
            self.like_count = like_count;
        }
    }

    /// Expire a hung request: treated as a failure. Returns true when an
    /// in-flight toggle was rolled back.
    pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
        match &self.in_flight {
            Some(flight) if flight.expired(now, self.timeout) => {
                log::warn!("like toggle timed out; rolling back");
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

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    #[test]
    fn optimistic_flip_then_authoritative_overwrite() {
        let mut state = LikeState::new(false, 3, true);
        assert!(state.begin_toggle(now()));
        assert!(state.liked());
        assert_eq!(state.like_count(), 4);

        // Server saw another viewer's like land first.
        state.apply_success(LikeOutcome {
            liked: true,
            like_count: 5,
        });
        assert!(state.liked());
        assert_eq!(state.like_count(), 5);
        assert!(!state.is_busy());
    }

    #[test]
    fn failure_rolls_back_both_fields_exactly() {
        let mut state = LikeState::new(true, 7, true);
        assert!(state.begin_toggle(now()));
        assert!(!state.liked());
        assert_eq!(state.like_count(), 6);

        state.apply_failure();
        assert!(state.liked());
        assert_eq!(state.like_count(), 7);
    }

    #[test]
    fn anonymous_viewer_cannot_toggle() {
        let mut state = LikeState::new(false, 0, false);
        assert!(!state.begin_toggle(now()));
        assert!(!state.liked());
        assert_eq!(state.like_count(), 0);
        assert!(!state.is_busy());
    }

    #[test]
    fn second_toggle_waits_for_first() {
        let mut state = LikeState::new(false, 0, true);
        assert!(state.begin_toggle(now()));
        assert!(!state.begin_toggle(now()));
        assert_eq!(state.like_count(), 1);
    }

    #[test]
    fn hung_request_expires_and_rolls_back() {
        let start = now();
        let mut state = LikeState::new(false, 2, true).with_timeout(Duration::seconds(10));
        assert!(state.begin_toggle(start));

        assert!(!state.tick(start + Duration::seconds(5)));
        assert!(state.is_busy());

        assert!(state.tick(start + Duration::seconds(11)));
        assert!(!state.liked());
        assert_eq!(state.like_count(), 2);
        assert!(!state.is_busy());
    }
}
