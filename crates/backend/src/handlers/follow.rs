use axum::{extract::Path, Json};
use contracts::domain::follow::{FollowCounts, FollowOutcome, FollowStatus, PrincipalSummary};

use crate::domain::follow::service;
use crate::error::ApiError;
use crate::shared::data::db::get_connection;
use crate::system::auth::session::OptionalSession;

/// PUT /api/follow/:target_id
pub async fn toggle(
    OptionalSession(principal): OptionalSession,
    Path(target_id): Path<String>,
) -> Result<Json<FollowOutcome>, ApiError> {
    let outcome = service::toggle_follow(get_connection(), &target_id, principal.as_ref()).await?;
    Ok(Json(outcome))
}

/// GET /api/follow/:target_id
pub async fn status(
    OptionalSession(principal): OptionalSession,
    Path(target_id): Path<String>,
) -> Result<Json<FollowStatus>, ApiError> {
    let status = service::status(get_connection(), &target_id, principal.as_ref()).await?;
    Ok(Json(status))
}

/// GET /api/follow/:target_id/counts
pub async fn counts(Path(target_id): Path<String>) -> Result<Json<FollowCounts>, ApiError> {
    let counts = service::counts(get_connection(), &target_id).await?;
    Ok(Json(counts))
}

/// GET /api/follow/:target_id/followers
pub async fn followers(
    Path(target_id): Path<String>,
) -> Result<Json<Vec<PrincipalSummary>>, ApiError> {
    let list = service::list_followers(get_connection(), &target_id).await?;
    Ok(Json(list))
}

/// GET /api/follow/:target_id/following
pub async fn following(
    Path(target_id): Path<String>,
) -> Result<Json<Vec<PrincipalSummary>>, ApiError> {
    let list = service::list_following(get_connection(), &target_id).await?;
    Ok(Json(list))
}
