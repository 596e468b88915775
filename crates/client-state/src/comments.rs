use chrono::{DateTime, Duration, Utc};
use contracts::domain::comment::{validate_comment_text, CommentView};
use thiserror::Error;
use uuid::Uuid;

use crate::deadline::{default_timeout, InFlight};

/// Visibility of the comments panel under a content item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelVisibility {
    Collapsed,
    Loading,
    Expanded,
}

/// What the host must do after a visibility toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleAction {
    /// First expand: fetch the comment list, then call
    /// `apply_fetch_success` / `apply_fetch_failure`.
    Fetch,
    /// Visibility flipped against the session cache; nothing to do.
    None,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SubmitError {
    #[error("comment text must not be empty")]
    EmptyText,
    #[error("sign in to comment")]
    NotSignedIn,
}

/// A locally-synthesized comment awaiting server confirmation. Its
/// correlation id lives in a separate id space from server comment ids and
/// is the only thing reconciliation matches on.
#[derive(Debug, Clone)]
pub struct PendingComment {
    pub correlation_id: Uuid,
    pub text: String,
    pub submitted_at: DateTime<Utc>,
}

/// The request the host must issue for a submitted comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitIntent {
    pub correlation_id: Uuid,
    /// Trimmed text to send as the request body.
    pub text: String,
}

/// One row of the rendered list.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentEntry {
    /// Correlation id for pending rows, server id for confirmed ones.
    pub key: String,
    pub text: String,
    pub pending: bool,
    pub author_name: Option<String>,
    pub author_image: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Comments panel for one content item and one viewer session.
///
/// Holds the fetch cache, the optimistic pending entries, and the visibility
/// state machine. Pending entries display first (newest submission on top)
/// regardless of timestamp; confirmed entries follow in reverse-chronological
/// order by the server's timestamps.
#[derive(Debug, Clone)]
pub struct CommentsPanel {
    visibility: PanelVisibility,
    /// Set after the first successful fetch; later toggles reuse the cache.
    fetched: bool,
    confirmed: Vec<CommentView>,
    pending: Vec<PendingComment>,
    can_comment: bool,
    timeout: Duration,
    fetch_in_flight: Option<InFlight<()>>,
}

/// Result of a `tick`: which hung operations were expired.
#[derive(Debug, Default)]
pub struct TickOutcome {
    /// Correlation ids of submissions treated as failed and removed.
    pub expired_submissions: Vec<Uuid>,
    /// True when a hung fetch was abandoned (panel collapsed again).
    pub fetch_timed_out: bool,
}

impl CommentsPanel {
    pub fn new(can_comment: bool) -> Self {
        Self {
            visibility: PanelVisibility::Collapsed,
            fetched: false,
            confirmed: Vec::new(),
            pending: Vec::new(),
            can_comment,
            timeout: default_timeout(),
            fetch_in_flight: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn visibility(&self) -> PanelVisibility {
        self.visibility
    }

    pub fn can_comment(&self) -> bool {
        self.can_comment
    }

    // ------------------------------------------------------------------
    // Visibility
    // ------------------------------------------------------------------

    /// Flip the panel. The first expand asks the host to fetch; once the
    /// cache is warm, toggling is purely local for the rest of the session.
    pub fn toggle(&mut self, now: DateTime<Utc>) -> ToggleAction {
        match self.visibility {
            PanelVisibility::Collapsed if !self.fetched => {
                self.visibility = PanelVisibility::Loading;
                self.fetch_in_flight = Some(InFlight::new((), now));
                ToggleAction::Fetch
            }
            PanelVisibility::Collapsed => {
                self.visibility = PanelVisibility::Expanded;
                ToggleAction::None
            }
            PanelVisibility::Loading | PanelVisibility::Expanded => {
                self.visibility = PanelVisibility::Collapsed;
                ToggleAction::None
            }
        }
    }

    /// Authoritative comment list arrived; warm the cache and expand unless
    /// the viewer collapsed the panel while it loaded.
    pub fn apply_fetch_success(&mut self, comments: Vec<CommentView>) {
        self.fetch_in_flight = None;
        self.fetched = true;
        self.confirmed = comments;
        if self.visibility == PanelVisibility::Loading {
            self.visibility = PanelVisibility::Expanded;
        }
    }

    /// A failed fetch reverts to collapsed; the cache stays cold so the next
    /// expand retries.
    pub fn apply_fetch_failure(&mut self) {
        self.fetch_in_flight = None;
        if self.visibility == PanelVisibility::Loading {
            self.visibility = PanelVisibility::Collapsed;
        }
    }

    // ------------------------------------------------------------------
    // Optimistic submission
    // ------------------------------------------------------------------

    /// Validate and stage a comment. Whitespace-only text is rejected here,
    /// before any request exists. On success the pending entry is already in
    /// the displayed list and the host must issue the returned intent.
    pub fn submit(
        &mut self,
        text: &str,
        now: DateTime<Utc>,
    ) -> Result<SubmitIntent, SubmitError> {
        if !self.can_comment {
            return Err(SubmitError::NotSignedIn);
        }
        let text = validate_comment_text(text).map_err(|_| SubmitError::EmptyText)?;

        let pending = PendingComment {
            correlation_id: Uuid::new_v4(),
            text: text.clone(),
            submitted_at: now,
        };
        let intent = SubmitIntent {
            correlation_id: pending.correlation_id,
            text,
        };
        // Newest submission first.
        self.pending.insert(0, pending);
        Ok(intent)
    }

    /// Replace the placeholder with the canonical record.
    pub fn apply_submit_success(&mut self, correlation_id: Uuid, comment: CommentView) {
        if self.take_pending(correlation_id).is_some() {
            self.confirmed.insert(0, comment);
        } else {
            log::warn!("confirmation for unknown correlation id {correlation_id}");
        }
    }

    /// Drop the placeholder entirely; the list returns to its pre-submit
    /// contents. The submitted text is handed back so a host may offer it to
    /// the viewer, but the panel itself does not restore the input.
    pub fn apply_submit_failure(&mut self, correlation_id: Uuid) -> Option<String> {
        self.take_pending(correlation_id).map(|p| p.text)
    }

    fn take_pending(&mut self, correlation_id: Uuid) -> Option<PendingComment> {
        let idx = self
            .pending
            .iter()
            .position(|p| p.correlation_id == correlation_id)?;
        Some(self.pending.remove(idx))
    }

    // ------------------------------------------------------------------
    // Display & housekeeping
    // ------------------------------------------------------------------

    /// The rendered list: pending first, then confirmed newest-first.
    pub fn display(&self) -> Vec<CommentEntry> {
        let mut entries: Vec<CommentEntry> = self
            .pending
            .iter()
            .map(|p| CommentEntry {
                key: p.correlation_id.to_string(),
                text: p.text.clone(),
                pending: true,
                author_name: None,
                author_image: None,
                created_at: None,
            })
            .collect();

        let mut confirmed: Vec<&CommentView> = self.confirmed.iter().collect();
        confirmed.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        entries.extend(confirmed.into_iter().map(|c| CommentEntry {
            key: c.id.clone(),
            text: c.text.clone(),
            pending: false,
            author_name: Some(c.author_name.clone()),
            author_image: c.author_image.clone(),
            created_at: Some(c.created_at),
        }));
        entries
    }

    /// Expire hung operations. Expired submissions get the failure
    /// treatment (placeholder removed); a hung fetch collapses the panel.
    pub fn tick(&mut self, now: DateTime<Utc>) -> TickOutcome {
        let mut outcome = TickOutcome::default();

        let expired: Vec<Uuid> = self
            .pending
            .iter()
            .filter(|p| now - p.submitted_at >= self.timeout)
            .map(|p| p.correlation_id)
            .collect();
        for id in expired {
            self.apply_submit_failure(id);
            outcome.expired_submissions.push(id);
        }

        if let Some(flight) = &self.fetch_in_flight {
            if flight.expired(now, self.timeout) {
                self.apply_fetch_failure();
                outcome.fetch_timed_out = true;
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(id: &str, text: &str, created_at: DateTime<Utc>) -> CommentView {
        CommentView {
            id: id.to_string(),
            text: text.to_string(),
            author_id: "u1".to_string(),
            author_name: "Ada".to_string(),
            author_image: None,
            created_at,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    #[test]
    fn first_expand_fetches_then_cache_is_reused() {
        let mut panel = CommentsPanel::new(true);
        assert_eq!(panel.toggle(now()), ToggleAction::Fetch);
        assert_eq!(panel.visibility(), PanelVisibility::Loading);

        panel.apply_fetch_success(vec![view("c1", "hello", now())]);
        assert_eq!(panel.visibility(), PanelVisibility::Expanded);

        // Collapse and re-expand: no refetch for the session lifetime.
        assert_eq!(panel.toggle(now()), ToggleAction::None);
        assert_eq!(panel.visibility(), PanelVisibility::Collapsed);
        assert_eq!(panel.toggle(now()), ToggleAction::None);
        assert_eq!(panel.visibility(), PanelVisibility::Expanded);
        assert_eq!(panel.display().len(), 1);
    }

    #[test]
    fn failed_fetch_collapses_and_retries_later() {
        let mut panel = CommentsPanel::new(true);
        assert_eq!(panel.toggle(now()), ToggleAction::Fetch);
        panel.apply_fetch_failure();
        assert_eq!(panel.visibility(), PanelVisibility::Collapsed);

        // Cache is still cold, so the next expand fetches again.
        assert_eq!(panel.toggle(now()), ToggleAction::Fetch);
    }

    #[test]
    fn confirmed_comments_display_reverse_chronological() {
        let mut panel = CommentsPanel::new(true);
        let t0 = now();
        panel.apply_fetch_success(vec![
            view("c1", "first", t0),
            view("c2", "second", t0 + Duration::seconds(1)),
            view("c3", "third", t0 + Duration::seconds(2)),
        ]);

        let keys: Vec<String> = panel.display().into_iter().map(|e| e.key).collect();
        assert_eq!(keys, vec!["c3", "c2", "c1"]);
    }

    #[test]
    fn pending_entries_sort_first_regardless_of_timestamp() {
        let mut panel = CommentsPanel::new(true);
        panel.apply_fetch_success(vec![view("c1", "old", now() + Duration::hours(1))]);

        let intent = panel.submit("mine", now()).unwrap();
        let entries = panel.display();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].pending);
        assert_eq!(entries[0].key, intent.correlation_id.to_string());
        assert_eq!(entries[1].key, "c1");
    }

    #[test]
    fn successful_submit_replaces_placeholder_by_correlation_id() {
        let mut panel = CommentsPanel::new(true);
        panel.apply_fetch_success(vec![]);

        let intent = panel.submit("  hello world  ", now()).unwrap();
        assert_eq!(intent.text, "hello world");

        panel.apply_submit_success(intent.correlation_id, view("server-1", "hello world", now()));
        let entries = panel.display();
        assert_eq!(entries.len(), 1);
        assert!(!entries[0].pending);
        assert_eq!(entries[0].key, "server-1");
    }

    #[test]
    fn failed_submit_restores_exact_pre_submission_list() {
        let mut panel = CommentsPanel::new(true);
        panel.apply_fetch_success(vec![view("c1", "existing", now())]);
        let before = panel.display();

        let intent = panel.submit("doomed", now()).unwrap();
        assert_eq!(panel.display().len(), 2);

        let text = panel.apply_submit_failure(intent.correlation_id);
        assert_eq!(text.as_deref(), Some("doomed"));
        assert_eq!(panel.display(), before);
    }

    #[test]
    fn whitespace_only_submission_rejected_before_any_intent() {
        let mut panel = CommentsPanel::new(true);
        assert_eq!(panel.submit("  ", now()), Err(SubmitError::EmptyText));
        assert!(panel.display().is_empty());
    }

    #[test]
    fn anonymous_viewer_cannot_submit() {
        let mut panel = CommentsPanel::new(false);
        assert_eq!(panel.submit("hi", now()), Err(SubmitError::NotSignedIn));
    }

    #[test]
    fn hung_submission_expires_like_a_failure() {
        let start = now();
        let mut panel = CommentsPanel::new(true).with_timeout(Duration::seconds(10));
        let intent = panel.submit("slow", start).unwrap();

        let outcome = panel.tick(start + Duration::seconds(5));
        assert!(outcome.expired_submissions.is_empty());

        let outcome = panel.tick(start + Duration::seconds(15));
        assert_eq!(outcome.expired_submissions, vec![intent.correlation_id]);
        assert!(panel.display().is_empty());
    }
}
