use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngagementError;

// ============================================================================
// ID Type
// ============================================================================

/// Unique identifier of a content item (article or blog post)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentId(pub Uuid);

impl ContentId {
    pub fn new(value: Uuid) -> Self {
        Self(value)
    }

    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }

    pub fn as_string(&self) -> String {
        self.0.to_string()
    }

    pub fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(ContentId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

// ============================================================================
// Publish state machine
// ============================================================================

/// Lifecycle state of a content item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishState {
    Draft,
    Published,
    Trashed,
}

impl PublishState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Trashed => "trashed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(Self::Draft),
            "published" => Some(Self::Published),
            "trashed" => Some(Self::Trashed),
            _ => None,
        }
    }
}

/// State transitions an owner or admin may request.
///
/// `Unpublish` explicitly targets `Draft`; `Restore` names its target state
/// (`Draft` or `Published`) instead of guessing where a trashed item came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishAction {
    Publish,
    Unpublish,
    Trash,
    Restore(PublishState),
}

impl PublishState {
    /// Apply a transition, rejecting anything the state machine forbids.
    pub fn apply(self, action: PublishAction) -> Result<PublishState, EngagementError> {
        use PublishAction::*;
        use PublishState::*;
        match (self, action) {
            (Draft, Publish) => Ok(Published),
            (Published, Unpublish) => Ok(Draft),
            (Draft, Trash) | (Published, Trash) => Ok(Trashed),
            (Trashed, Restore(to)) if to == Draft || to == Published => Ok(to),
            (Trashed, Restore(to)) => Err(EngagementError::invalid(format!(
                "cannot restore into {}",
                to.as_str()
            ))),
            (state, action) => Err(EngagementError::invalid(format!(
                "cannot {:?} content in state {}",
                action,
                state.as_str()
            ))),
        }
    }

    /// Permanent deletion is only legal from the trash.
    pub fn can_purge(self) -> bool {
        self == PublishState::Trashed
    }
}

// ============================================================================
// Aggregate
// ============================================================================

/// An article or blog post, the primary engagement target.
///
/// `like_count` is derived from the like set server-side and is never
/// accepted from client input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub id: ContentId,

    #[serde(rename = "authorId")]
    pub author_id: String,

    pub title: String,
    pub slug: String,

    #[serde(rename = "categoryId")]
    pub category_id: String,

    /// Rich text, opaque to this layer.
    pub body: String,

    #[serde(rename = "publishState")]
    pub publish_state: PublishState,

    #[serde(rename = "likeCount")]
    pub like_count: i64,

    #[serde(rename = "viewCount")]
    pub view_count: i64,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl Content {
    /// Create a new content item for insertion.
    pub fn new_for_insert(
        author_id: String,
        title: String,
        category_id: String,
        body: String,
        publish_state: PublishState,
    ) -> Self {
        let now = Utc::now();
        let slug = slugify(&title);
        Self {
            id: ContentId::new_v4(),
            author_id,
            slug,
            title,
            category_id,
            body,
            publish_state,
            like_count: 0,
            view_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply editable fields from a DTO. Slug follows the title.
    pub fn update(&mut self, dto: &ContentDto) {
        self.title = dto.title.clone();
        self.slug = slugify(&dto.title);
        self.category_id = dto.category_id.clone();
        self.body = dto.body.clone();
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Title must not be empty".into());
        }
        if self.slug.is_empty() {
            return Err("Title must contain at least one alphanumeric character".into());
        }
        if self.category_id.trim().is_empty() {
            return Err("Category is required".into());
        }
        Ok(())
    }

    pub fn touch_updated(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn before_write(&mut self) {
        self.touch_updated();
    }
}

/// Create/update payload for content. `like_count`, `view_count` and
/// `publish_state` are never taken from here on update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentDto {
    pub id: Option<String>,
    pub title: String,
    #[serde(rename = "categoryId")]
    pub category_id: String,
    pub body: String,
    /// Initial state on create only; `draft` when absent.
    #[serde(default, rename = "publishNow")]
    pub publish_now: bool,
}

/// Lowercase, alphanumeric-and-hyphen slug, collapsed runs, trimmed.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut prev_hyphen = true;
    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            prev_hyphen = false;
        } else if !prev_hyphen {
            slug.push('-');
            prev_hyphen = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_and_trims() {
        assert_eq!(slugify("Hello,  World!"), "hello-world");
        assert_eq!(slugify("  --Rust 2026-- "), "rust-2026");
        assert_eq!(slugify("???"), "");
    }

    #[test]
    fn publish_state_happy_paths() {
        use PublishAction::*;
        use PublishState::*;
        assert_eq!(Draft.apply(Publish).unwrap(), Published);
        assert_eq!(Published.apply(Unpublish).unwrap(), Draft);
        assert_eq!(Draft.apply(Trash).unwrap(), Trashed);
        assert_eq!(Published.apply(Trash).unwrap(), Trashed);
        assert_eq!(Trashed.apply(Restore(Draft)).unwrap(), Draft);
        assert_eq!(Trashed.apply(Restore(Published)).unwrap(), Published);
    }

    #[test]
    fn publish_state_rejects_illegal_transitions() {
        use PublishAction::*;
        use PublishState::*;
        assert!(Published.apply(Publish).is_err());
        assert!(Draft.apply(Unpublish).is_err());
        assert!(Trashed.apply(Trash).is_err());
        assert!(Draft.apply(Restore(Draft)).is_err());
        assert!(Trashed.apply(Restore(Trashed)).is_err());
    }

    #[test]
    fn purge_only_from_trash() {
        assert!(PublishState::Trashed.can_purge());
        assert!(!PublishState::Draft.can_purge());
        assert!(!PublishState::Published.can_purge());
    }
}
