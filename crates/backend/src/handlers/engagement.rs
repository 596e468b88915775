use axum::{
    extract::Path,
    http::{HeaderMap, StatusCode},
    Json,
};
use contracts::domain::comment::{CommentView, NewCommentRequest};
use contracts::domain::engagement::LikeOutcome;

use crate::domain::engagement::service;
use crate::error::ApiError;
use crate::shared::data::db::get_connection;
use crate::system::auth::session::OptionalSession;

/// POST /api/engagement/:content_id/like
pub async fn toggle_like(
    OptionalSession(principal): OptionalSession,
    Path(content_id): Path<String>,
) -> Result<Json<LikeOutcome>, ApiError> {
    let outcome = service::toggle_like(get_connection(), &content_id, principal.as_ref()).await?;
    Ok(Json(outcome))
}

/// GET /api/engagement/:content_id/comments
pub async fn list_comments(
    Path(content_id): Path<String>,
) -> Result<Json<Vec<CommentView>>, ApiError> {
    let comments = service::list_comments(get_connection(), &content_id).await?;
    Ok(Json(comments))
}

/// POST /api/engagement/:content_id/comments
pub async fn create_comment(
    OptionalSession(principal): OptionalSession,
    Path(content_id): Path<String>,
    Json(request): Json<NewCommentRequest>,
) -> Result<(StatusCode, Json<CommentView>), ApiError> {
    let comment = service::create_comment(
        get_connection(),
        &content_id,
        principal.as_ref(),
        &request.text,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// POST /api/engagement/:content_id/view
///
/// Fire-and-forget telemetry: always 204, failures only reach the log.
pub async fn record_view(
    OptionalSession(principal): OptionalSession,
    Path(content_id): Path<String>,
    headers: HeaderMap,
) -> StatusCode {
    let ip = headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .unwrap_or("unknown")
        .to_string();

    if let Err(e) = service::record_view(get_connection(), &content_id, principal.as_ref(), &ip).await
    {
        tracing::debug!("view record dropped for {}: {}", content_id, e);
    }

    StatusCode::NO_CONTENT
}
