use chrono::Utc;
use contracts::domain::follow::{FollowCounts, PrincipalSummary};
use sea_orm::{
    ConnectionTrait, DatabaseBackend, DatabaseConnection, FromQueryResult, Statement,
};

/// Create the edge if absent; true when the edge was created. The composite
/// primary key guarantees at most one edge per ordered pair even under
/// concurrent toggles.
pub async fn edge_insert_if_absent(
    db: &DatabaseConnection,
    follower_id: &str,
    following_id: &str,
) -> anyhow::Result<bool> {
    let result = db
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "INSERT OR IGNORE INTO follow_edge (follower_id, following_id, created_at)
             VALUES (?, ?, ?)",
            [follower_id.into(), following_id.into(), Utc::now().into()],
        ))
        .await?;
    Ok(result.rows_affected() == 1)
}

pub async fn edge_remove(
    db: &DatabaseConnection,
    follower_id: &str,
    following_id: &str,
) -> anyhow::Result<bool> {
    let result = db
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "DELETE FROM follow_edge WHERE follower_id = ? AND following_id = ?",
            [follower_id.into(), following_id.into()],
        ))
        .await?;
    Ok(result.rows_affected() == 1)
}

pub async fn edge_exists(
    db: &DatabaseConnection,
    follower_id: &str,
    following_id: &str,
) -> anyhow::Result<bool> {
    let row = db
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT 1 AS present FROM follow_edge WHERE follower_id = ? AND following_id = ?",
            [follower_id.into(), following_id.into()],
        ))
        .await?;
    Ok(row.is_some())
}

/// Derived counters, always computed from the edge set.
pub async fn counts(db: &DatabaseConnection, principal_id: &str) -> anyhow::Result<FollowCounts> {
    let row = db
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT
                (SELECT COUNT(*) FROM follow_edge WHERE following_id = ?) AS followers,
                (SELECT COUNT(*) FROM follow_edge WHERE follower_id = ?) AS following",
            [principal_id.into(), principal_id.into()],
        ))
        .await?
        .ok_or_else(|| anyhow::anyhow!("counts query returned no row"))?;

    Ok(FollowCounts {
        followers: row.try_get("", "followers")?,
        following: row.try_get("", "following")?,
    })
}

#[derive(Debug, FromQueryResult)]
struct SummaryRow {
    id: String,
    name: String,
    image: Option<String>,
}

impl From<SummaryRow> for PrincipalSummary {
    fn from(r: SummaryRow) -> Self {
        PrincipalSummary {
            id: r.id,
            name: r.name,
            image: r.image,
        }
    }
}

/// Principals following the given profile, newest edge first.
pub async fn list_followers(
    db: &DatabaseConnection,
    principal_id: &str,
) -> anyhow::Result<Vec<PrincipalSummary>> {
    let rows = SummaryRow::find_by_statement(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "SELECT u.id, u.name, u.image
         FROM follow_edge e
         JOIN sys_users u ON u.id = e.follower_id
         WHERE e.following_id = ?
         ORDER BY e.created_at DESC",
        [principal_id.into()],
    ))
    .all(db)
    .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// Principals the given profile follows, newest edge first.
pub async fn list_following(
    db: &DatabaseConnection,
    principal_id: &str,
) -> anyhow::Result<Vec<PrincipalSummary>> {
    let rows = SummaryRow::find_by_statement(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "SELECT u.id, u.name, u.image
         FROM follow_edge e
         JOIN sys_users u ON u.id = e.following_id
         WHERE e.follower_id = ?
         ORDER BY e.created_at DESC",
        [principal_id.into()],
    ))
    .all(db)
    .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}
