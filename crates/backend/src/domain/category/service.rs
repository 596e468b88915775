use contracts::domain::category::{Category, CategoryDto};
use contracts::error::EngagementError;
use contracts::system::auth::Principal;
use sea_orm::DatabaseConnection;

use super::repository;
use crate::domain::persistence;

/// Create a new category. Admin only.
pub async fn create(
    db: &DatabaseConnection,
    principal: Option<&Principal>,
    dto: CategoryDto,
) -> Result<Category, EngagementError> {
    let principal = principal.ok_or(EngagementError::Unauthorized)?;
    if !principal.is_admin() {
        return Err(EngagementError::Unauthorized);
    }

    let category = Category::new_for_insert(dto.name);
    category.validate().map_err(EngagementError::Validation)?;

    if repository::get_by_slug(db, &category.slug)
        .await
        .map_err(persistence)?
        .is_some()
    {
        return Err(EngagementError::validation(format!(
            "category '{}' already exists",
            category.slug
        )));
    }

    repository::insert(db, &category).await.map_err(persistence)?;
    Ok(category)
}

pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<Category>, EngagementError> {
    repository::list_all(db).await.map_err(persistence)
}

pub async fn get_by_id(
    db: &DatabaseConnection,
    id: &str,
) -> Result<Option<Category>, EngagementError> {
    repository::get_by_id(db, id).await.map_err(persistence)
}

pub async fn get_by_slug(
    db: &DatabaseConnection,
    slug: &str,
) -> Result<Option<Category>, EngagementError> {
    repository::get_by_slug(db, slug).await.map_err(persistence)
}
