use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "complaint_category", rename_all = "snake_case")]
pub enum ComplaintCategory {
    PowerOutage,
    Billing,
    Installation,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "complaint_priority", rename_all = "snake_case")]
pub enum ComplaintPriority {
    Low,
    Medium,
    High,
    Urgent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "complaint_status", rename_all = "snake_case")]
pub enum ComplaintStatus {
    Pending,
    InProgress,
    Resolved,
    Rejected,
}

impl ComplaintStatus {
    /// The transition table, declared in one place. Currently every move is
    /// allowed, no-ops included; restricting the lifecycle only needs edits
    /// here.
    pub fn allowed_transitions(self) -> &'static [ComplaintStatus] {
        use ComplaintStatus::*;
        match self {
            Pending => &[Pending, InProgress, Resolved, Rejected],
            InProgress => &[Pending, InProgress, Resolved, Rejected],
            Resolved => &[Pending, InProgress, Resolved, Rejected],
            Rejected => &[Pending, InProgress, Resolved, Rejected],
        }
    }

    pub fn can_transition(self, next: ComplaintStatus) -> bool {
        self.allowed_transitions().contains(&next)
    }
}

/// Complaint record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct Complaint {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub category: ComplaintCategory,
    pub priority: ComplaintPriority,
    pub status: ComplaintStatus,
    pub location: String,
    pub customer_number: Option<String>,
    pub attachments: Vec<String>,
    pub admin_notes: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Complaint joined with its owner's public identity, for admin listings.
#[derive(Debug, Clone, FromRow)]
pub struct ComplaintWithOwner {
    #[sqlx(flatten)]
    pub complaint: Complaint,
    pub owner_name: String,
    pub owner_email: String,
}

pub struct NewComplaint<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub category: ComplaintCategory,
    pub priority: ComplaintPriority,
    pub location: &'a str,
    pub customer_number: Option<&'a str>,
    pub attachments: &'a [String],
}

const COMPLAINT_COLUMNS: &str = "id, user_id, title, description, category, priority, status, \
     location, customer_number, attachments, admin_notes, created_at, updated_at";

impl Complaint {
    /// Inserts a new complaint owned by `user_id`. Status starts at `pending`
    /// and both timestamps come from the same `now()`.
    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        new: NewComplaint<'_>,
    ) -> anyhow::Result<Complaint> {
        let complaint = sqlx::query_as::<_, Complaint>(
            r#"
            INSERT INTO complaints
                (user_id, title, description, category, priority, status,
                 location, customer_number, attachments, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, 'pending', $6, $7, $8, now(), now())
            RETURNING id, user_id, title, description, category, priority, status,
                      location, customer_number, attachments, admin_notes,
                      created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(new.title)
        .bind(new.description)
        .bind(new.category)
        .bind(new.priority)
        .bind(new.location)
        .bind(new.customer_number)
        .bind(new.attachments)
        .fetch_one(db)
        .await?;
        Ok(complaint)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Complaint>> {
        let complaint = sqlx::query_as::<_, Complaint>(&format!(
            "SELECT {COMPLAINT_COLUMNS} FROM complaints WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(complaint)
    }

    /// Complaints owned by one user, newest first.
    pub async fn list_by_owner(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Complaint>> {
        let rows = sqlx::query_as::<_, Complaint>(&format!(
            "SELECT {COMPLAINT_COLUMNS} FROM complaints WHERE user_id = $1 \
             ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// All complaints joined with owner name/email, newest first. Admin view.
    pub async fn list_all_with_owner(db: &PgPool) -> anyhow::Result<Vec<ComplaintWithOwner>> {
        let rows = sqlx::query_as::<_, ComplaintWithOwner>(
            r#"
            SELECT c.id, c.user_id, c.title, c.description, c.category, c.priority,
                   c.status, c.location, c.customer_number, c.attachments,
                   c.admin_notes, c.created_at, c.updated_at,
                   u.name AS owner_name, u.email AS owner_email
            FROM complaints c
            JOIN users u ON u.id = c.user_id
            ORDER BY c.created_at DESC
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// Sets the status (and optionally overwrites the admin note), bumping
    /// `updated_at`. Returns `None` when the id does not exist; a no-op status
    /// write still counts as an update.
    pub async fn update_status(
        db: &PgPool,
        id: Uuid,
        status: ComplaintStatus,
        admin_notes: Option<&str>,
    ) -> anyhow::Result<Option<Complaint>> {
        let complaint = sqlx::query_as::<_, Complaint>(
            r#"
            UPDATE complaints
            SET status = $2,
                admin_notes = COALESCE($3, admin_notes),
                updated_at = now()
            WHERE id = $1
            RETURNING id, user_id, title, description, category, priority, status,
                      location, customer_number, attachments, admin_notes,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(admin_notes)
        .fetch_optional(db)
        .await?;
        Ok(complaint)
    }

    pub async fn count_by_owner(db: &PgPool, user_id: Uuid) -> anyhow::Result<i64> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT count(*) FROM complaints WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(db)
                .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_status_transition_is_allowed() {
        use ComplaintStatus::*;
        let all = [Pending, InProgress, Resolved, Rejected];
        for from in all {
            for to in all {
                assert!(from.can_transition(to), "{from:?} -> {to:?} must be allowed");
            }
        }
    }

    #[test]
    fn enums_use_snake_case_wire_names() {
        assert_eq!(
            serde_json::to_string(&ComplaintStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        assert_eq!(
            serde_json::to_string(&ComplaintCategory::PowerOutage).unwrap(),
            "\"power_outage\""
        );
        assert_eq!(
            serde_json::to_string(&ComplaintPriority::Urgent).unwrap(),
            "\"urgent\""
        );
        let status: ComplaintStatus = serde_json::from_str("\"resolved\"").unwrap();
        assert_eq!(status, ComplaintStatus::Resolved);
    }
}
