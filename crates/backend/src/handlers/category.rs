use axum::{extract::Path, http::StatusCode, Json};
use contracts::domain::category::{Category, CategoryDto};

use crate::domain::category::service;
use crate::error::ApiError;
use crate::shared::data::db::get_connection;
use crate::system::auth::session::OptionalSession;

/// GET /api/categories
pub async fn list_all() -> Result<Json<Vec<Category>>, ApiError> {
    let items = service::list_all(get_connection()).await?;
    Ok(Json(items))
}

/// GET /api/categories/:slug
pub async fn get_by_slug(Path(slug): Path<String>) -> Result<Json<Category>, ApiError> {
    let category = service::get_by_slug(get_connection(), &slug)
        .await?
        .ok_or(contracts::error::EngagementError::NotFound("category"))?;
    Ok(Json(category))
}

/// POST /api/categories — admin only
pub async fn create(
    OptionalSession(principal): OptionalSession,
    Json(dto): Json<CategoryDto>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let category = service::create(get_connection(), principal.as_ref(), dto).await?;
    Ok((StatusCode::CREATED, Json(category)))
}
