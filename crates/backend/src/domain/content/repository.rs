use chrono::{DateTime, Utc};
use contracts::domain::content::{Content, ContentId, PublishState};
use sea_orm::{
    ConnectionTrait, DatabaseBackend, DatabaseConnection, FromQueryResult, Statement,
};
use uuid::Uuid;

/// Read projection: the stored columns plus the derived view counter.
#[derive(Debug, FromQueryResult)]
struct ContentRow {
    id: String,
    author_id: String,
    title: String,
    slug: String,
    category_id: String,
    body: String,
    publish_state: String,
    like_count: i64,
    view_count: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ContentRow {
    fn into_content(self) -> anyhow::Result<Content> {
        let uuid = Uuid::parse_str(&self.id)?;
        let publish_state = PublishState::parse(&self.publish_state)
            .ok_or_else(|| anyhow::anyhow!("unknown publish state '{}'", self.publish_state))?;
        Ok(Content {
            id: ContentId::new(uuid),
            author_id: self.author_id,
            title: self.title,
            slug: self.slug,
            category_id: self.category_id,
            body: self.body,
            publish_state,
            like_count: self.like_count,
            view_count: self.view_count,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const SELECT_CONTENT: &str = r#"
    SELECT c.id, c.author_id, c.title, c.slug, c.category_id, c.body,
           c.publish_state, c.like_count, c.created_at, c.updated_at,
           (SELECT COUNT(*) FROM content_view v WHERE v.content_id = c.id) AS view_count
    FROM content c
"#;

async fn query_one(
    db: &DatabaseConnection,
    suffix: &str,
    values: Vec<sea_orm::Value>,
) -> anyhow::Result<Option<Content>> {
    let row = ContentRow::find_by_statement(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        &format!("{SELECT_CONTENT} {suffix}"),
        values,
    ))
    .one(db)
    .await?;
    row.map(ContentRow::into_content).transpose()
}

async fn query_all(
    db: &DatabaseConnection,
    suffix: &str,
    values: Vec<sea_orm::Value>,
) -> anyhow::Result<Vec<Content>> {
    let rows = ContentRow::find_by_statement(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        &format!("{SELECT_CONTENT} {suffix}"),
        values,
    ))
    .all(db)
    .await?;
    rows.into_iter().map(ContentRow::into_content).collect()
}

pub async fn get_by_id(db: &DatabaseConnection, id: &str) -> anyhow::Result<Option<Content>> {
    query_one(db, "WHERE c.id = ?", vec![id.into()]).await
}

pub async fn get_by_slug(
    db: &DatabaseConnection,
    category_id: &str,
    slug: &str,
) -> anyhow::Result<Option<Content>> {
    query_one(
        db,
        "WHERE c.category_id = ? AND c.slug = ?",
        vec![category_id.into(), slug.into()],
    )
    .await
}

/// The public feed: published items, newest first.
pub async fn list_published(db: &DatabaseConnection) -> anyhow::Result<Vec<Content>> {
    query_all(
        db,
        "WHERE c.publish_state = 'published' ORDER BY c.created_at DESC",
        vec![],
    )
    .await
}

/// Everything an author owns, any state, for their own dashboard.
pub async fn list_by_author(
    db: &DatabaseConnection,
    author_id: &str,
) -> anyhow::Result<Vec<Content>> {
    query_all(
        db,
        "WHERE c.author_id = ? ORDER BY c.created_at DESC",
        vec![author_id.into()],
    )
    .await
}

pub async fn insert(db: &DatabaseConnection, content: &Content) -> anyhow::Result<()> {
    db.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "INSERT INTO content (id, author_id, title, slug, category_id, body, publish_state, like_count, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        [
            content.id.as_string().into(),
            content.author_id.clone().into(),
            content.title.clone().into(),
            content.slug.clone().into(),
            content.category_id.clone().into(),
            content.body.clone().into(),
            content.publish_state.as_str().into(),
            content.like_count.into(),
            content.created_at.into(),
            content.updated_at.into(),
        ],
    ))
    .await?;
    Ok(())
}

/// Persist the editable fields; publish state and counters are managed by
/// their own statements.
pub async fn update_fields(db: &DatabaseConnection, content: &Content) -> anyhow::Result<()> {
    db.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "UPDATE content SET title = ?, slug = ?, category_id = ?, body = ?, updated_at = ?
         WHERE id = ?",
        [
            content.title.clone().into(),
            content.slug.clone().into(),
            content.category_id.clone().into(),
            content.body.clone().into(),
            content.updated_at.into(),
            content.id.as_string().into(),
        ],
    ))
    .await?;
    Ok(())
}

pub async fn set_publish_state(
    db: &DatabaseConnection,
    id: &str,
    state: PublishState,
) -> anyhow::Result<()> {
    db.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "UPDATE content SET publish_state = ?, updated_at = ? WHERE id = ?",
        [state.as_str().into(), Utc::now().into(), id.into()],
    ))
    .await?;
    Ok(())
}

/// Slug uniqueness within a category; `exclude_id` skips the item being
/// edited so it can keep its own slug.
pub async fn slug_exists(
    db: &DatabaseConnection,
    category_id: &str,
    slug: &str,
    exclude_id: Option<&str>,
) -> anyhow::Result<bool> {
    let row = db
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT COUNT(*) AS cnt FROM content
             WHERE category_id = ? AND slug = ? AND id != ?",
            [
                category_id.into(),
                slug.into(),
                exclude_id.unwrap_or("").into(),
            ],
        ))
        .await?;
    let count: i64 = match row {
        Some(r) => r.try_get("", "cnt")?,
        None => 0,
    };
    Ok(count > 0)
}

/// Permanent delete: the record and its engagement rows go together.
pub async fn purge(db: &DatabaseConnection, id: &str) -> anyhow::Result<()> {
    for sql in [
        "DELETE FROM content_like WHERE content_id = ?",
        "DELETE FROM comment WHERE content_id = ?",
        "DELETE FROM content_view WHERE content_id = ?",
        "DELETE FROM content WHERE id = ?",
    ] {
        db.execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            sql,
            [id.into()],
        ))
        .await?;
    }
    Ok(())
}
