use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Office-wide configuration, one row.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SystemSettings {
    pub site_name: String,
    pub site_description: String,
    pub maintenance_mode: bool,
    pub allow_registration: bool,
    pub max_file_size_mb: i32,
    pub auto_assign_complaints: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Per-admin notification preferences.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct NotificationSettings {
    pub user_id: Uuid,
    pub email_notifications: bool,
    pub push_notifications: bool,
    pub complaint_reminders: bool,
    pub daily_reports: bool,
    pub weekly_reports: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

pub struct SystemSettingsUpdate {
    pub site_name: String,
    pub site_description: String,
    pub maintenance_mode: bool,
    pub allow_registration: bool,
    pub max_file_size_mb: i32,
    pub auto_assign_complaints: bool,
}

pub struct NotificationSettingsUpdate {
    pub email_notifications: bool,
    pub push_notifications: bool,
    pub complaint_reminders: bool,
    pub daily_reports: bool,
    pub weekly_reports: bool,
}

const SYSTEM_COLUMNS: &str = "site_name, site_description, maintenance_mode, allow_registration, \
     max_file_size_mb, auto_assign_complaints, created_at, updated_at";

impl SystemSettings {
    /// Fetches the settings row, creating the defaults on first access.
    pub async fn get_or_init(db: &PgPool) -> anyhow::Result<SystemSettings> {
        let settings = sqlx::query_as::<_, SystemSettings>(
            r#"
            INSERT INTO system_settings (id)
            VALUES (1)
            ON CONFLICT (id) DO UPDATE SET id = 1
            RETURNING site_name, site_description, maintenance_mode, allow_registration,
                      max_file_size_mb, auto_assign_complaints, created_at, updated_at
            "#,
        )
        .fetch_one(db)
        .await?;
        Ok(settings)
    }

    pub async fn save(db: &PgPool, update: SystemSettingsUpdate) -> anyhow::Result<SystemSettings> {
        let settings = sqlx::query_as::<_, SystemSettings>(&format!(
            r#"
            INSERT INTO system_settings
                (id, site_name, site_description, maintenance_mode, allow_registration,
                 max_file_size_mb, auto_assign_complaints)
            VALUES (1, $1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE SET
                site_name = EXCLUDED.site_name,
                site_description = EXCLUDED.site_description,
                maintenance_mode = EXCLUDED.maintenance_mode,
                allow_registration = EXCLUDED.allow_registration,
                max_file_size_mb = EXCLUDED.max_file_size_mb,
                auto_assign_complaints = EXCLUDED.auto_assign_complaints,
                updated_at = now()
            RETURNING {SYSTEM_COLUMNS}
            "#
        ))
        .bind(update.site_name)
        .bind(update.site_description)
        .bind(update.maintenance_mode)
        .bind(update.allow_registration)
        .bind(update.max_file_size_mb)
        .bind(update.auto_assign_complaints)
        .fetch_one(db)
        .await?;
        Ok(settings)
    }
}

const NOTIFICATION_COLUMNS: &str = "user_id, email_notifications, push_notifications, \
     complaint_reminders, daily_reports, weekly_reports, created_at, updated_at";

impl NotificationSettings {
    pub async fn get_or_init(db: &PgPool, user_id: Uuid) -> anyhow::Result<NotificationSettings> {
        let settings = sqlx::query_as::<_, NotificationSettings>(&format!(
            r#"
            INSERT INTO notification_settings (user_id)
            VALUES ($1)
            ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
            RETURNING {NOTIFICATION_COLUMNS}
            "#
        ))
        .bind(user_id)
        .fetch_one(db)
        .await?;
        Ok(settings)
    }

    pub async fn save(
        db: &PgPool,
        user_id: Uuid,
        update: NotificationSettingsUpdate,
    ) -> anyhow::Result<NotificationSettings> {
        let settings = sqlx::query_as::<_, NotificationSettings>(&format!(
            r#"
            INSERT INTO notification_settings
                (user_id, email_notifications, push_notifications, complaint_reminders,
                 daily_reports, weekly_reports)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (user_id) DO UPDATE SET
                email_notifications = EXCLUDED.email_notifications,
                push_notifications = EXCLUDED.push_notifications,
                complaint_reminders = EXCLUDED.complaint_reminders,
                daily_reports = EXCLUDED.daily_reports,
                weekly_reports = EXCLUDED.weekly_reports,
                updated_at = now()
            RETURNING {NOTIFICATION_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(update.email_notifications)
        .bind(update.push_notifications)
        .bind(update.complaint_reminders)
        .bind(update.daily_reports)
        .bind(update.weekly_reports)
        .fetch_one(db)
        .await?;
        Ok(settings)
    }
}
