use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Json,
};
use contracts::domain::content::{Content, ContentDto, PublishAction, PublishState};
use serde::Deserialize;

use crate::domain::content::service;
use crate::error::ApiError;
use crate::shared::data::db::get_connection;
use crate::system::auth::session::OptionalSession;

/// GET /api/content — the published feed
pub async fn list_published() -> Result<Json<Vec<Content>>, ApiError> {
    let items = service::list_published(get_connection()).await?;
    Ok(Json(items))
}

/// GET /api/content/mine — everything the caller owns, any state
pub async fn list_mine(
    OptionalSession(principal): OptionalSession,
) -> Result<Json<Vec<Content>>, ApiError> {
    let items = service::list_mine(get_connection(), principal.as_ref()).await?;
    Ok(Json(items))
}

/// GET /api/content/:id
pub async fn get_by_id(Path(id): Path<String>) -> Result<Json<Content>, ApiError> {
    let content = service::get_by_id(get_connection(), &id).await?;
    Ok(Json(content))
}

/// GET /api/content/by-slug/:category_slug/:slug
pub async fn get_by_slug(
    Path((category_slug, slug)): Path<(String, String)>,
) -> Result<Json<Content>, ApiError> {
    let content = service::get_by_slug(get_connection(), &category_slug, &slug).await?;
    Ok(Json(content))
}

/// POST /api/content
pub async fn create(
    OptionalSession(principal): OptionalSession,
    Json(dto): Json<ContentDto>,
) -> Result<(StatusCode, Json<Content>), ApiError> {
    let content = service::create(get_connection(), principal.as_ref(), dto).await?;
    Ok((StatusCode::CREATED, Json(content)))
}

/// PUT /api/content/:id
pub async fn update(
    OptionalSession(principal): OptionalSession,
    Path(id): Path<String>,
    Json(dto): Json<ContentDto>,
) -> Result<Json<Content>, ApiError> {
    let content = service::update(get_connection(), principal.as_ref(), &id, dto).await?;
    Ok(Json(content))
}

/// DELETE /api/content/:id — soft delete into the trash
pub async fn trash(
    OptionalSession(principal): OptionalSession,
    Path(id): Path<String>,
) -> Result<Json<Content>, ApiError> {
    let content = service::transition(
        get_connection(),
        principal.as_ref(),
        &id,
        PublishAction::Trash,
    )
    .await?;
    Ok(Json(content))
}

/// POST /api/content/:id/publish
pub async fn publish(
    OptionalSession(principal): OptionalSession,
    Path(id): Path<String>,
) -> Result<Json<Content>, ApiError> {
    let content = service::transition(
        get_connection(),
        principal.as_ref(),
        &id,
        PublishAction::Publish,
    )
    .await?;
    Ok(Json(content))
}

/// POST /api/content/:id/unpublish — explicitly back to draft
pub async fn unpublish(
    OptionalSession(principal): OptionalSession,
    Path(id): Path<String>,
) -> Result<Json<Content>, ApiError> {
    let content = service::transition(
        get_connection(),
        principal.as_ref(),
        &id,
        PublishAction::Unpublish,
    )
    .await?;
    Ok(Json(content))
}

#[derive(Debug, Deserialize)]
pub struct RestoreParams {
    /// Target state: "draft" (default) or "published"
    pub to: Option<String>,
}

/// POST /api/content/:id/restore?to=draft|published
pub async fn restore(
    OptionalSession(principal): OptionalSession,
    Path(id): Path<String>,
    Query(params): Query<RestoreParams>,
) -> Result<Json<Content>, ApiError> {
    let target = match params.to.as_deref() {
        None | Some("draft") => PublishState::Draft,
        Some("published") => PublishState::Published,
        Some(other) => {
            return Err(contracts::error::EngagementError::validation(format!(
                "unknown restore target '{}'",
                other
            ))
            .into())
        }
    };
    let content = service::transition(
        get_connection(),
        principal.as_ref(),
        &id,
        PublishAction::Restore(target),
    )
    .await?;
    Ok(Json(content))
}

/// POST /api/content/:id/purge — permanent delete, trash only
pub async fn purge(
    OptionalSession(principal): OptionalSession,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    service::purge(get_connection(), principal.as_ref(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
