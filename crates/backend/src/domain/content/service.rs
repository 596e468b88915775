use contracts::domain::content::{Content, ContentDto, PublishAction, PublishState};
use contracts::error::EngagementError;
use contracts::system::auth::Principal;
use sea_orm::DatabaseConnection;

use super::repository;
use crate::domain::{category, persistence};

/// Owner-or-admin gate used by every mutating content operation.
fn authorize_owner(content: &Content, principal: &Principal) -> Result<(), EngagementError> {
    if content.author_id != principal.id && !principal.is_admin() {
        return Err(EngagementError::Unauthorized);
    }
    Ok(())
}

/// Create new content as a draft, or published immediately when the DTO
/// asks for it.
pub async fn create(
    db: &DatabaseConnection,
    principal: Option<&Principal>,
    dto: ContentDto,
) -> Result<Content, EngagementError> {
    let principal = principal.ok_or(EngagementError::Unauthorized)?;

    if category::repository::get_by_id(db, &dto.category_id)
        .await
        .map_err(persistence)?
        .is_none()
    {
        return Err(EngagementError::NotFound("category"));
    }

    let initial_state = if dto.publish_now {
        PublishState::Published
    } else {
        PublishState::Draft
    };
    let mut content = Content::new_for_insert(
        principal.id.clone(),
        dto.title,
        dto.category_id,
        dto.body,
        initial_state,
    );
    content.validate().map_err(EngagementError::Validation)?;

    if repository::slug_exists(db, &content.category_id, &content.slug, None)
        .await
        .map_err(persistence)?
    {
        return Err(EngagementError::validation(format!(
            "slug '{}' already used in this category",
            content.slug
        )));
    }

    content.before_write();
    repository::insert(db, &content).await.map_err(persistence)?;
    Ok(content)
}

/// Edit title/category/body. Owner or admin only.
pub async fn update(
    db: &DatabaseConnection,
    principal: Option<&Principal>,
    id: &str,
    dto: ContentDto,
) -> Result<Content, EngagementError> {
    let principal = principal.ok_or(EngagementError::Unauthorized)?;

    let mut content = repository::get_by_id(db, id)
        .await
        .map_err(persistence)?
        .ok_or(EngagementError::NotFound("content"))?;
    authorize_owner(&content, principal)?;

    if category::repository::get_by_id(db, &dto.category_id)
        .await
        .map_err(persistence)?
        .is_none()
    {
        return Err(EngagementError::NotFound("category"));
    }

    content.update(&dto);
    content.validate().map_err(EngagementError::Validation)?;

    if repository::slug_exists(db, &content.category_id, &content.slug, Some(id))
        .await
        .map_err(persistence)?
    {
        return Err(EngagementError::validation(format!(
            "slug '{}' already used in this category",
            content.slug
        )));
    }

    content.before_write();
    repository::update_fields(db, &content)
        .await
        .map_err(persistence)?;
    Ok(content)
}

/// Run a publish-state transition. The state machine in contracts decides
/// legality; this only adds the ownership gate and the write.
pub async fn transition(
    db: &DatabaseConnection,
    principal: Option<&Principal>,
    id: &str,
    action: PublishAction,
) -> Result<Content, EngagementError> {
    let principal = principal.ok_or(EngagementError::Unauthorized)?;

    let mut content = repository::get_by_id(db, id)
        .await
        .map_err(persistence)?
        .ok_or(EngagementError::NotFound("content"))?;
    authorize_owner(&content, principal)?;

    let next = content.publish_state.apply(action)?;
    repository::set_publish_state(db, id, next)
        .await
        .map_err(persistence)?;
    content.publish_state = next;
    Ok(content)
}

/// Permanent delete, legal only from the trash.
pub async fn purge(
    db: &DatabaseConnection,
    principal: Option<&Principal>,
    id: &str,
) -> Result<(), EngagementError> {
    let principal = principal.ok_or(EngagementError::Unauthorized)?;

    let content = repository::get_by_id(db, id)
        .await
        .map_err(persistence)?
        .ok_or(EngagementError::NotFound("content"))?;
    authorize_owner(&content, principal)?;

    if !content.publish_state.can_purge() {
        return Err(EngagementError::invalid(
            "content must be trashed before permanent deletion",
        ));
    }

    repository::purge(db, id).await.map_err(persistence)
}

pub async fn get_by_id(db: &DatabaseConnection, id: &str) -> Result<Content, EngagementError> {
    repository::get_by_id(db, id)
        .await
        .map_err(persistence)?
        .ok_or(EngagementError::NotFound("content"))
}

/// Lookup by category slug + content slug, the public permalink form.
pub async fn get_by_slug(
    db: &DatabaseConnection,
    category_slug: &str,
    slug: &str,
) -> Result<Content, EngagementError> {
    let category = category::repository::get_by_slug(db, category_slug)
        .await
        .map_err(persistence)?
        .ok_or(EngagementError::NotFound("category"))?;
    repository::get_by_slug(db, &category.id, slug)
        .await
        .map_err(persistence)?
        .ok_or(EngagementError::NotFound("content"))
}

pub async fn list_published(db: &DatabaseConnection) -> Result<Vec<Content>, EngagementError> {
    repository::list_published(db).await.map_err(persistence)
}

pub async fn list_mine(
    db: &DatabaseConnection,
    principal: Option<&Principal>,
) -> Result<Vec<Content>, EngagementError> {
    let principal = principal.ok_or(EngagementError::Unauthorized)?;
    repository::list_by_author(db, &principal.id)
        .await
        .map_err(persistence)
}
