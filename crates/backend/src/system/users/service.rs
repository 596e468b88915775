use anyhow::Result;
use chrono::Utc;
use contracts::system::auth::Principal;
use contracts::system::users::{CreateUserDto, User};
use sea_orm::DatabaseConnection;

use super::repository;
use crate::system::auth::password;

/// Create a new user
pub async fn create(db: &DatabaseConnection, dto: CreateUserDto) -> Result<String> {
    if dto.username.trim().is_empty() {
        return Err(anyhow::anyhow!("Username cannot be empty"));
    }
    if dto.name.trim().is_empty() {
        return Err(anyhow::anyhow!("Display name cannot be empty"));
    }

    // Check if username already exists
    if repository::get_by_username(db, &dto.username).await?.is_some() {
        return Err(anyhow::anyhow!("Username already exists"));
    }

    // Basic email validation
    if let Some(ref email) = dto.email {
        if !email.trim().is_empty() && !email.contains('@') {
            return Err(anyhow::anyhow!("Invalid email format"));
        }
    }

    password::validate_password_strength(&dto.password)?;
    let password_hash = password::hash_password(&dto.password)?;

    let user_id = uuid::Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    let user = User {
        id: user_id.clone(),
        username: dto.username,
        name: dto.name,
        email: dto.email,
        image: dto.image,
        role: dto.role,
        is_active: true,
        created_at: now.clone(),
        updated_at: now,
    };

    repository::create_with_password(db, &user, &password_hash).await?;

    Ok(user_id)
}

/// Get user by ID
pub async fn get_by_id(db: &DatabaseConnection, id: &str) -> Result<Option<User>> {
    repository::get_by_id(db, id).await
}

/// Verify username/password; returns the user on success, None otherwise
pub async fn verify_credentials(
    db: &DatabaseConnection,
    username: &str,
    password_input: &str,
) -> Result<Option<User>> {
    let user = match repository::get_by_username(db, username).await? {
        Some(u) if u.is_active => u,
        _ => return Ok(None),
    };

    let password_hash = repository::get_password_hash(db, &user.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Password hash not found"))?;

    if !password::verify_password(password_input, &password_hash)? {
        return Ok(None);
    }

    Ok(Some(user))
}

/// Project a user row into the principal handed to service calls
pub fn to_principal(user: &User) -> Principal {
    Principal {
        id: user.id.clone(),
        username: user.username.clone(),
        email: user.email.clone(),
        name: user.name.clone(),
        image: user.image.clone(),
        role: user.role,
    }
}
