use anyhow::{Context, Result};
use contracts::system::auth::Role;
use contracts::system::users::User;
use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, QueryResult, Statement};

const USER_COLUMNS: &str =
    "id, username, name, email, image, role, is_active, created_at, updated_at";

fn row_to_user(row: &QueryResult) -> Result<User> {
    let role_str: String = row.try_get("", "role")?;
    Ok(User {
        id: row.try_get("", "id")?,
        username: row.try_get("", "username")?,
        name: row.try_get("", "name")?,
        email: row.try_get("", "email")?,
        image: row.try_get("", "image")?,
        role: Role::parse(&role_str).unwrap_or(Role::Author),
        is_active: row.try_get::<i32>("", "is_active")? != 0,
        created_at: row.try_get("", "created_at")?,
        updated_at: row.try_get("", "updated_at")?,
    })
}

/// Create user with password hash
pub async fn create_with_password(
    db: &DatabaseConnection,
    user: &User,
    password_hash: &str,
) -> Result<()> {
    db.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "INSERT INTO sys_users (id, username, name, email, image, role, password_hash, is_active, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        [
            user.id.clone().into(),
            user.username.clone().into(),
            user.name.clone().into(),
            user.email.clone().into(),
            user.image.clone().into(),
            user.role.as_str().into(),
            password_hash.to_string().into(),
            (if user.is_active { 1 } else { 0 }).into(),
            user.created_at.clone().into(),
            user.updated_at.clone().into(),
        ],
    ))
    .await
    .context("Failed to insert user")?;

    Ok(())
}

/// Get user by ID
pub async fn get_by_id(db: &DatabaseConnection, id: &str) -> Result<Option<User>> {
    let result = db
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            &format!("SELECT {USER_COLUMNS} FROM sys_users WHERE id = ?"),
            [id.into()],
        ))
        .await?;

    result.as_ref().map(row_to_user).transpose()
}

/// Get user by username
pub async fn get_by_username(db: &DatabaseConnection, username: &str) -> Result<Option<User>> {
    let result = db
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            &format!("SELECT {USER_COLUMNS} FROM sys_users WHERE username = ?"),
            [username.into()],
        ))
        .await?;

    result.as_ref().map(row_to_user).transpose()
}

/// Get stored password hash for a user
pub async fn get_password_hash(db: &DatabaseConnection, user_id: &str) -> Result<Option<String>> {
    let result = db
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT password_hash FROM sys_users WHERE id = ?",
            [user_id.into()],
        ))
        .await?;

    match result {
        Some(row) => Ok(Some(row.try_get("", "password_hash")?)),
        None => Ok(None),
    }
}

/// Count users with the given role
pub async fn count_by_role(db: &DatabaseConnection, role: Role) -> Result<i64> {
    let result = db
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT COUNT(*) AS cnt FROM sys_users WHERE role = ?",
            [role.as_str().into()],
        ))
        .await?;

    match result {
        Some(row) => Ok(row.try_get::<i64>("", "cnt")?),
        None => Ok(0),
    }
}
