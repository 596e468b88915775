use contracts::domain::follow::{FollowCounts, FollowOutcome, FollowStatus, PrincipalSummary};
use contracts::error::EngagementError;
use contracts::system::auth::Principal;
use sea_orm::DatabaseConnection;

use super::repository;
use crate::domain::persistence;
use crate::system::users;

async fn target_exists(db: &DatabaseConnection, target_id: &str) -> Result<(), EngagementError> {
    users::repository::get_by_id(db, target_id)
        .await
        .map_err(persistence)?
        .ok_or(EngagementError::NotFound("principal"))?;
    Ok(())
}

/// Flip the follow edge from the acting principal to the target. The edge
/// set is the sole source of truth; counters are derived on read.
pub async fn toggle_follow(
    db: &DatabaseConnection,
    target_id: &str,
    principal: Option<&Principal>,
) -> Result<FollowOutcome, EngagementError> {
    let principal = principal.ok_or(EngagementError::Unauthorized)?;

    if principal.id == target_id {
        return Err(EngagementError::invalid("cannot follow yourself"));
    }
    target_exists(db, target_id).await?;

    let following = if repository::edge_insert_if_absent(db, &principal.id, target_id)
        .await
        .map_err(persistence)?
    {
        true
    } else {
        repository::edge_remove(db, &principal.id, target_id)
            .await
            .map_err(persistence)?;
        false
    };

    Ok(FollowOutcome { following })
}

/// Follow relationship from the viewer's perspective. `can_follow` is false
/// for anonymous viewers and on your own profile.
pub async fn status(
    db: &DatabaseConnection,
    target_id: &str,
    viewer: Option<&Principal>,
) -> Result<FollowStatus, EngagementError> {
    target_exists(db, target_id).await?;

    let (is_following, can_follow) = match viewer {
        None => (false, false),
        Some(p) if p.id == target_id => (false, false),
        Some(p) => (
            repository::edge_exists(db, &p.id, target_id)
                .await
                .map_err(persistence)?,
            true,
        ),
    };

    Ok(FollowStatus {
        is_following,
        can_follow,
    })
}

pub async fn counts(
    db: &DatabaseConnection,
    target_id: &str,
) -> Result<FollowCounts, EngagementError> {
    target_exists(db, target_id).await?;
    repository::counts(db, target_id).await.map_err(persistence)
}

pub async fn list_followers(
    db: &DatabaseConnection,
    target_id: &str,
) -> Result<Vec<PrincipalSummary>, EngagementError> {
    target_exists(db, target_id).await?;
    repository::list_followers(db, target_id)
        .await
        .map_err(persistence)
}

pub async fn list_following(
    db: &DatabaseConnection,
    target_id: &str,
) -> Result<Vec<PrincipalSummary>, EngagementError> {
    target_exists(db, target_id).await?;
    repository::list_following(db, target_id)
        .await
        .map_err(persistence)
}
