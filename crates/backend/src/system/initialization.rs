use anyhow::Result;
use contracts::system::auth::Role;
use contracts::system::users::CreateUserDto;
use sea_orm::DatabaseConnection;

use crate::system::users;

const DEFAULT_ADMIN_USERNAME: &str = "admin";
const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// Ensure at least one admin account exists so a fresh install is usable.
/// The default credentials are logged with a warning so they get changed.
pub async fn ensure_admin_user_exists(db: &DatabaseConnection) -> Result<()> {
    let admin_count = users::repository::count_by_role(db, Role::Admin).await?;
    if admin_count > 0 {
        return Ok(());
    }

    let dto = CreateUserDto {
        username: DEFAULT_ADMIN_USERNAME.to_string(),
        password: DEFAULT_ADMIN_PASSWORD.to_string(),
        name: "Administrator".to_string(),
        email: None,
        image: None,
        role: Role::Admin,
    };
    let user_id = users::service::create(db, dto).await?;

    tracing::warn!(
        "Created default admin user '{}' (id {}). Change the default password.",
        DEFAULT_ADMIN_USERNAME,
        user_id
    );

    Ok(())
}
