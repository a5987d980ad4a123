use serde::{Deserialize, Serialize};

use crate::admin::repo::{NotificationSettings, SystemSettings};
use crate::auth::Role;

/// Admin provisioning of an account; unlike self-registration the role is
/// chosen explicitly.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub role: Role,
}

/// Partial account edit; omitted fields are left as they are.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<Role>,
    pub password: Option<String>,
}

/// Self-profile edit. Changing the password requires proving the current one.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub system: SystemSettings,
    pub notifications: NotificationSettings,
}

/// Settings update, tagged by which document it targets.
#[derive(Debug, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum UpdateSettingsRequest {
    System {
        site_name: String,
        site_description: String,
        maintenance_mode: bool,
        allow_registration: bool,
        max_file_size_mb: i32,
        auto_assign_complaints: bool,
    },
    Notifications {
        email_notifications: bool,
        push_notifications: bool,
        complaint_reminders: bool,
        daily_reports: bool,
        weekly_reports: bool,
    },
}
