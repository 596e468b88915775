use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngagementError;

// ============================================================================
// ID Type
// ============================================================================

/// Unique identifier of a comment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommentId(pub Uuid);

impl CommentId {
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }

    pub fn as_string(&self) -> String {
        self.0.to_string()
    }
}

// ============================================================================
// Aggregate
// ============================================================================

/// A comment on a content item. Immutable once created: there is no edit or
/// delete path anywhere in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,

    #[serde(rename = "contentId")]
    pub content_id: String,

    #[serde(rename = "authorId")]
    pub author_id: String,

    pub text: String,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Construct with a server-assigned id and timestamp. The text must
    /// already have passed [`validate_comment_text`].
    pub fn new_for_insert(content_id: String, author_id: String, text: String) -> Self {
        Self {
            id: CommentId::new_v4(),
            content_id,
            author_id,
            text,
            created_at: Utc::now(),
        }
    }
}

/// Comment as displayed: joined with its author's public profile fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentView {
    pub id: String,
    pub text: String,

    #[serde(rename = "authorId")]
    pub author_id: String,

    #[serde(rename = "authorName")]
    pub author_name: String,

    #[serde(rename = "authorImage")]
    pub author_image: Option<String>,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Request body for comment creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCommentRequest {
    pub text: String,
}

/// Reject whitespace-only text and return the trimmed form to persist.
/// Both the client (before any request goes out) and the server run this.
pub fn validate_comment_text(text: &str) -> Result<String, EngagementError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(EngagementError::validation("comment text must not be empty"));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_only_text_is_rejected() {
        assert!(validate_comment_text("").is_err());
        assert!(validate_comment_text("  ").is_err());
        assert!(validate_comment_text("\n\t").is_err());
    }

    #[test]
    fn text_is_trimmed() {
        assert_eq!(validate_comment_text("  hi there ").unwrap(), "hi there");
    }
}
