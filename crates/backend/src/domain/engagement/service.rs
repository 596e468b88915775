use contracts::domain::comment::{validate_comment_text, Comment, CommentView};
use contracts::domain::engagement::LikeOutcome;
use contracts::error::EngagementError;
use contracts::system::auth::Principal;
use sea_orm::DatabaseConnection;

use super::repository;
use crate::domain::persistence;

/// Flip the caller's like on a content item and return the authoritative
/// state. Not idempotent by design: every call toggles.
///
/// Membership and counter writes are single atomic statements (add-if-absent,
/// then recompute-from-set), so concurrent toggles from any mix of principals
/// settle with `like_count` equal to the like set size.
pub async fn toggle_like(
    db: &DatabaseConnection,
    content_id: &str,
    principal: Option<&Principal>,
) -> Result<LikeOutcome, EngagementError> {
    let principal = principal.ok_or(EngagementError::Unauthorized)?;

    if !repository::content_exists(db, content_id)
        .await
        .map_err(persistence)?
    {
        return Err(EngagementError::NotFound("content"));
    }

    let liked = if repository::like_insert_if_absent(db, content_id, &principal.id)
        .await
        .map_err(persistence)?
    {
        true
    } else {
        // Already present: this toggle removes it.
        repository::like_remove(db, content_id, &principal.id)
            .await
            .map_err(persistence)?;
        false
    };

    let like_count = repository::refresh_like_count(db, content_id)
        .await
        .map_err(persistence)?;

    Ok(LikeOutcome { liked, like_count })
}

/// Create an immutable comment with a server-assigned id and timestamp.
pub async fn create_comment(
    db: &DatabaseConnection,
    content_id: &str,
    principal: Option<&Principal>,
    text: &str,
) -> Result<CommentView, EngagementError> {
    let principal = principal.ok_or(EngagementError::Unauthorized)?;
    let text = validate_comment_text(text)?;

    if !repository::content_exists(db, content_id)
        .await
        .map_err(persistence)?
    {
        return Err(EngagementError::NotFound("content"));
    }

    let comment = Comment::new_for_insert(content_id.to_string(), principal.id.clone(), text);
    repository::insert_comment(db, &comment)
        .await
        .map_err(persistence)?;

    // The canonical record, with author fields from the resolved principal.
    Ok(CommentView {
        id: comment.id.as_string(),
        text: comment.text,
        author_id: principal.id.clone(),
        author_name: principal.name.clone(),
        author_image: principal.image.clone(),
        created_at: comment.created_at,
    })
}

/// Comments for display: reverse-chronological by authoritative timestamp.
pub async fn list_comments(
    db: &DatabaseConnection,
    content_id: &str,
) -> Result<Vec<CommentView>, EngagementError> {
    if !repository::content_exists(db, content_id)
        .await
        .map_err(persistence)?
    {
        return Err(EngagementError::NotFound("content"));
    }
    repository::list_comments(db, content_id)
        .await
        .map_err(persistence)
}

/// Best-effort view telemetry. Anonymous viewers are recorded with no
/// viewer id; failures propagate so the handler can log and swallow them.
pub async fn record_view(
    db: &DatabaseConnection,
    content_id: &str,
    principal: Option<&Principal>,
    ip_address: &str,
) -> Result<(), EngagementError> {
    if !repository::content_exists(db, content_id)
        .await
        .map_err(persistence)?
    {
        return Err(EngagementError::NotFound("content"));
    }
    repository::insert_view(
        db,
        content_id,
        principal.map(|p| p.id.as_str()),
        ip_address,
    )
    .await
    .map_err(persistence)
}
