use axum::{extract::Json, http::StatusCode};
use contracts::error::EngagementError;
use contracts::system::auth::{
    LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, UserInfo,
};
use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, Statement};

use crate::error::ApiError;
use crate::shared::data::db::get_connection;
use crate::system::auth::session::AuthSession;
use crate::system::{auth::jwt, users::service as user_service};

fn user_info(user: &contracts::system::users::User) -> UserInfo {
    UserInfo {
        id: user.id.clone(),
        username: user.username.clone(),
        name: user.name.clone(),
        email: user.email.clone(),
        image: user.image.clone(),
        role: user.role,
    }
}

/// POST /api/auth/login
pub async fn login(Json(request): Json<LoginRequest>) -> Result<Json<LoginResponse>, ApiError> {
    let db = get_connection();

    // Bad credentials are Unauthorized; everything else is internal.
    let user = user_service::verify_credentials(db, &request.username, &request.password)
        .await?
        .ok_or(EngagementError::Unauthorized)?;

    let access_token = jwt::generate_access_token(db, &user.id, &user.username, user.role).await?;
    let refresh_token = jwt::generate_refresh_token();

    store_refresh_token(db, &user.id, &refresh_token).await?;

    Ok(Json(LoginResponse {
        access_token,
        refresh_token,
        user: user_info(&user),
    }))
}

/// POST /api/auth/refresh
pub async fn refresh(
    Json(request): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>, ApiError> {
    let db = get_connection();

    // An unknown or expired refresh token degrades to Unauthorized.
    let user_id = validate_refresh_token(db, &request.refresh_token)
        .await
        .map_err(|_| EngagementError::Unauthorized)?;

    let user = user_service::get_by_id(db, &user_id)
        .await?
        .ok_or(EngagementError::Unauthorized)?;

    let access_token = jwt::generate_access_token(db, &user.id, &user.username, user.role).await?;

    Ok(Json(RefreshResponse { access_token }))
}

/// POST /api/auth/logout
pub async fn logout(Json(request): Json<RefreshRequest>) -> Result<StatusCode, ApiError> {
    let db = get_connection();

    revoke_refresh_token(db, &request.refresh_token).await?;

    Ok(StatusCode::OK)
}

/// GET /api/auth/me
pub async fn current_user(
    AuthSession(principal): AuthSession,
) -> Result<Json<UserInfo>, ApiError> {
    let db = get_connection();

    let user = user_service::get_by_id(db, &principal.id)
        .await?
        .ok_or(EngagementError::NotFound("principal"))?;

    Ok(Json(user_info(&user)))
}

// Helper functions for refresh tokens

async fn store_refresh_token(db: &DatabaseConnection, user_id: &str, token: &str) -> anyhow::Result<()> {
    use chrono::Utc;

    let token_id = uuid::Uuid::new_v4().to_string();
    let token_hash = hash_token(token);
    let expires_at = jwt::calculate_refresh_token_expiration();
    let created_at = Utc::now().to_rfc3339();

    db.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "INSERT INTO sys_refresh_tokens (id, user_id, token_hash, expires_at, created_at)
         VALUES (?, ?, ?, ?, ?)",
        [
            token_id.into(),
            user_id.to_string().into(),
            token_hash.into(),
            expires_at.into(),
            created_at.into(),
        ],
    ))
    .await?;

    Ok(())
}

async fn validate_refresh_token(db: &DatabaseConnection, token: &str) -> anyhow::Result<String> {
    use chrono::Utc;

    let token_hash = hash_token(token);
    let now = Utc::now().to_rfc3339();

    let result = db
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT user_id FROM sys_refresh_tokens
             WHERE token_hash = ? AND expires_at > ?",
            [token_hash.into(), now.into()],
        ))
        .await?;

    match result {
        Some(row) => Ok(row.try_get("", "user_id")?),
        None => Err(anyhow::anyhow!("Refresh token not found or expired")),
    }
}

async fn revoke_refresh_token(db: &DatabaseConnection, token: &str) -> anyhow::Result<()> {
    let token_hash = hash_token(token);

    db.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "DELETE FROM sys_refresh_tokens WHERE token_hash = ?",
        [token_hash.into()],
    ))
    .await?;

    Ok(())
}

/// Refresh tokens are stored hashed; a leaked table does not leak tokens.
fn hash_token(token: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}
