use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

use crate::complaints::repo::ComplaintStatus;

/// Complaint counts for one calendar month.
#[derive(Debug, Clone, FromRow)]
pub struct MonthRow {
    pub year: i32,
    pub month: i32,
    pub complaints: i64,
    pub resolved: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct RecentComplaint {
    pub title: String,
    pub status: ComplaintStatus,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, FromRow)]
pub struct RecentUser {
    pub name: String,
    pub created_at: OffsetDateTime,
}

/// Per-status complaint counts as `(status, count)` pairs.
pub async fn status_counts(db: &PgPool) -> anyhow::Result<Vec<(String, i64)>> {
    let rows = sqlx::query_as::<_, (String, i64)>(
        "SELECT status::text, count(*) FROM complaints GROUP BY status",
    )
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn monthly_rows(db: &PgPool, since: OffsetDateTime) -> anyhow::Result<Vec<MonthRow>> {
    let rows = sqlx::query_as::<_, MonthRow>(
        r#"
        SELECT date_part('year', created_at)::int4 AS year,
               date_part('month', created_at)::int4 AS month,
               count(*) AS complaints,
               count(*) FILTER (WHERE status = 'resolved') AS resolved
        FROM complaints
        WHERE created_at >= $1
        GROUP BY 1, 2
        "#,
    )
    .bind(since)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// The ten most recently touched complaints.
pub async fn recent_complaints(db: &PgPool) -> anyhow::Result<Vec<RecentComplaint>> {
    let rows = sqlx::query_as::<_, RecentComplaint>(
        r#"
        SELECT title, status, updated_at
        FROM complaints
        ORDER BY updated_at DESC
        LIMIT 10
        "#,
    )
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// The five most recently registered end-user accounts.
pub async fn recent_users(db: &PgPool) -> anyhow::Result<Vec<RecentUser>> {
    let rows = sqlx::query_as::<_, RecentUser>(
        r#"
        SELECT name, created_at
        FROM users
        WHERE role = 'user'
        ORDER BY created_at DESC
        LIMIT 5
        "#,
    )
    .fetch_all(db)
    .await?;
    Ok(rows)
}
