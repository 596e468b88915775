use chrono::{DateTime, Duration, Utc};

/// How long an in-flight request may hang before `tick` treats it as failed.
pub fn default_timeout() -> Duration {
    Duration::seconds(15)
}

/// Snapshot of the state to restore if an in-flight request fails or times
/// out, plus when the request went out.
#[derive(Debug, Clone)]
pub(crate) struct InFlight<T> {
    pub snapshot: T,
    pub started_at: DateTime<Utc>,
}

impl<T> InFlight<T> {
    pub fn new(snapshot: T, now: DateTime<Utc>) -> Self {
        Self {
            snapshot,
            started_at: now,
        }
    }

    pub fn expired(&self, now: DateTime<Utc>, timeout: Duration) -> bool {
        now - self.started_at >= timeout
    }
}
