use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use contracts::system::auth::Principal;

use crate::shared::data::db::get_connection;
use crate::system::users;

/// Resolve the Authorization header to a principal, or `None` for anonymous
/// requests. Invalid or expired tokens also resolve to anonymous: the
/// services reject anonymous mutation attempts themselves, so a stale token
/// degrades to signed-out behavior instead of a hard failure on read routes.
async fn resolve(parts: &Parts) -> Option<Principal> {
    let auth_header = parts
        .headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())?;
    let token = auth_header.strip_prefix("Bearer ")?;

    let db = get_connection();
    let claims = super::jwt::validate_token(db, token).await.ok()?;

    // Load the user row so name/image/role are current, and so deactivated
    // accounts stop resolving even with a live token.
    let user = users::repository::get_by_id(db, &claims.sub).await.ok()??;
    if !user.is_active {
        return None;
    }
    Some(users::service::to_principal(&user))
}

/// Extractor for routes that require an authenticated principal.
/// Usage in handlers: `async fn handler(AuthSession(principal): AuthSession)`
pub struct AuthSession(pub Principal);

#[async_trait]
impl<S> FromRequestParts<S> for AuthSession
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        resolve(parts)
            .await
            .map(AuthSession)
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}

/// Extractor for routes that serve anonymous viewers too. Never rejects;
/// the contained principal is passed down to the services, which apply
/// their own authorization rules.
pub struct OptionalSession(pub Option<Principal>);

#[async_trait]
impl<S> FromRequestParts<S> for OptionalSession
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(OptionalSession(resolve(parts).await))
    }
}
