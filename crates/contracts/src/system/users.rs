use serde::{Deserialize, Serialize};

use crate::system::auth::Role;

/// Platform user record (author or admin) as exposed over the API.
/// Password hashes never leave the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub name: String,
    pub email: Option<String>,
    pub image: Option<String>,
    pub role: Role,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserDto {
    pub username: String,
    pub password: String,
    pub name: String,
    pub email: Option<String>,
    pub image: Option<String>,
    pub role: Role,
}
