use chrono::{DateTime, Utc};
use contracts::domain::comment::{Comment, CommentView};
use sea_orm::{
    ConnectionTrait, DatabaseBackend, DatabaseConnection, FromQueryResult, Statement,
};

/// Add the principal to the like set if absent. Returns true when the row was
/// inserted (the principal now likes the content). Single statement, so two
/// concurrent calls for the same pair cannot both insert.
pub async fn like_insert_if_absent(
    db: &DatabaseConnection,
    content_id: &str,
    principal_id: &str,
) -> anyhow::Result<bool> {
    let result = db
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "INSERT OR IGNORE INTO content_like (content_id, principal_id, created_at)
             VALUES (?, ?, ?)",
            [content_id.into(), principal_id.into(), Utc::now().into()],
        ))
        .await?;
    Ok(result.rows_affected() == 1)
}

pub async fn like_remove(
    db: &DatabaseConnection,
    content_id: &str,
    principal_id: &str,
) -> anyhow::Result<bool> {
    let result = db
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "DELETE FROM content_like WHERE content_id = ? AND principal_id = ?",
            [content_id.into(), principal_id.into()],
        ))
        .await?;
    Ok(result.rows_affected() == 1)
}

/// Recompute the stored counter from the like set inside one UPDATE. This is
/// what keeps `like_count == |likedBy|` regardless of how concurrent toggles
/// interleave: the subquery and the write happen in the same statement.
pub async fn refresh_like_count(db: &DatabaseConnection, content_id: &str) -> anyhow::Result<i64> {
    db.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "UPDATE content
         SET like_count = (SELECT COUNT(*) FROM content_like l WHERE l.content_id = content.id)
         WHERE id = ?",
        [content_id.into()],
    ))
    .await?;

    let row = db
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT like_count FROM content WHERE id = ?",
            [content_id.into()],
        ))
        .await?;
    match row {
        Some(r) => Ok(r.try_get("", "like_count")?),
        None => Ok(0),
    }
}

pub async fn content_exists(db: &DatabaseConnection, content_id: &str) -> anyhow::Result<bool> {
    let row = db
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT 1 AS present FROM content WHERE id = ?",
            [content_id.into()],
        ))
        .await?;
    Ok(row.is_some())
}

pub async fn insert_comment(db: &DatabaseConnection, comment: &Comment) -> anyhow::Result<()> {
    db.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "INSERT INTO comment (id, content_id, author_id, text, created_at)
         VALUES (?, ?, ?, ?, ?)",
        [
            comment.id.as_string().into(),
            comment.content_id.clone().into(),
            comment.author_id.clone().into(),
            comment.text.clone().into(),
            comment.created_at.into(),
        ],
    ))
    .await?;
    Ok(())
}

#[derive(Debug, FromQueryResult)]
struct CommentRow {
    id: String,
    text: String,
    author_id: String,
    author_name: Option<String>,
    author_image: Option<String>,
    created_at: DateTime<Utc>,
}

/// Comments for a content item, reverse-chronological, joined with the
/// author's public profile fields. A deleted author degrades to a
/// placeholder name rather than dropping the comment.
pub async fn list_comments(
    db: &DatabaseConnection,
    content_id: &str,
) -> anyhow::Result<Vec<CommentView>> {
    let rows = CommentRow::find_by_statement(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "SELECT m.id, m.text, m.author_id, u.name AS author_name, u.image AS author_image,
                m.created_at
         FROM comment m
         LEFT JOIN sys_users u ON u.id = m.author_id
         WHERE m.content_id = ?
         ORDER BY m.created_at DESC, m.id DESC",
        [content_id.into()],
    ))
    .all(db)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| CommentView {
            id: r.id,
            text: r.text,
            author_id: r.author_id,
            author_name: r.author_name.unwrap_or_else(|| "[deleted]".to_string()),
            author_image: r.author_image,
            created_at: r.created_at,
        })
        .collect())
}

/// Append a view record. Never deduplicates.
pub async fn insert_view(
    db: &DatabaseConnection,
    content_id: &str,
    viewer_id: Option<&str>,
    ip_address: &str,
) -> anyhow::Result<()> {
    db.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "INSERT INTO content_view (content_id, viewer_id, ip_address, viewed_at)
         VALUES (?, ?, ?, ?)",
        [
            content_id.into(),
            viewer_id.map(|s| s.to_string()).into(),
            ip_address.into(),
            Utc::now().into(),
        ],
    ))
    .await?;
    Ok(())
}
