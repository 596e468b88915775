use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::content::slugify;

/// Flat category record; content slugs are unique within a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub slug: String,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Category {
    pub fn new_for_insert(name: String) -> Self {
        let slug = slugify(&name);
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            slug,
            created_at: Utc::now(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Category name must not be empty".into());
        }
        if self.slug.is_empty() {
            return Err("Category name must contain at least one alphanumeric character".into());
        }
        Ok(())
    }
}

/// Create payload for a category (admin only).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryDto {
    pub name: String,
}
