use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    admin::{
        dto::{
            CreateUserRequest, SettingsResponse, UpdateProfileRequest, UpdateSettingsRequest,
            UpdateUserRequest,
        },
        repo::{
            NotificationSettings, NotificationSettingsUpdate, SystemSettings, SystemSettingsUpdate,
        },
    },
    auth::{
        dto::PublicUser,
        handlers::is_valid_email,
        jwt::AdminUser,
        password::{hash_password, verify_password},
        repo::{NewUser, User, UserPatch},
    },
    complaints::repo::Complaint,
    error::{AppError, AppResult},
    state::AppState,
};

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/users", get(list_users).post(create_user))
        .route(
            "/admin/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/admin/profile", get(get_profile).put(update_profile))
        .route("/admin/settings", get(get_settings).put(update_settings))
}

// --- account management ---

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> AppResult<Json<Vec<PublicUser>>> {
    let users = User::list_all(&state.db).await?;
    Ok(Json(users.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(mut payload): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<PublicUser>)> {
    payload.email = payload.email.trim().to_lowercase();

    if payload.name.trim().is_empty()
        || payload.phone.trim().is_empty()
        || payload.password.is_empty()
    {
        return Err(AppError::Validation("all fields are required".into()));
    }
    if !is_valid_email(&payload.email) {
        return Err(AppError::Validation("invalid email".into()));
    }
    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        return Err(AppError::Conflict("email already registered".into()));
    }

    let hash = hash_password(&payload.password)?;
    let user = User::create(
        &state.db,
        NewUser {
            name: payload.name.trim(),
            email: &payload.email,
            phone: payload.phone.trim(),
            password_hash: &hash,
            role: payload.role,
        },
    )
    .await?;

    info!(user_id = %user.id, admin_id = %admin.id, role = ?user.role, "account provisioned");
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<PublicUser>> {
    let user = User::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".into()))?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> AppResult<Json<PublicUser>> {
    let email = match payload.email {
        Some(raw) => {
            let email = raw.trim().to_lowercase();
            if !is_valid_email(&email) {
                return Err(AppError::Validation("invalid email".into()));
            }
            if User::email_taken_by_other(&state.db, &email, id).await? {
                return Err(AppError::Conflict(
                    "email already used by another account".into(),
                ));
            }
            Some(email)
        }
        None => None,
    };

    let password_hash = match payload.password {
        Some(plain) => Some(hash_password(&plain)?),
        None => None,
    };

    let user = User::update(
        &state.db,
        id,
        UserPatch {
            name: payload.name,
            email,
            phone: payload.phone,
            role: payload.role,
            password_hash,
        },
    )
    .await?
    .ok_or_else(|| AppError::NotFound("user not found".into()))?;

    info!(user_id = %id, admin_id = %admin.id, "account updated");
    Ok(Json(user.into()))
}

/// Deletion is refused while the account still owns complaints, so complaint
/// history never loses its owner.
#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    let owned = Complaint::count_by_owner(&state.db, id).await?;
    if owned > 0 {
        warn!(user_id = %id, owned, "delete blocked by owned complaints");
        return Err(AppError::Conflict(
            "cannot delete a user who owns complaints".into(),
        ));
    }

    if !User::delete(&state.db, id).await? {
        return Err(AppError::NotFound("user not found".into()));
    }

    info!(user_id = %id, admin_id = %admin.id, "account deleted");
    Ok(Json(json!({ "message": "user deleted" })))
}

// --- self profile ---

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
) -> AppResult<Json<PublicUser>> {
    let user = User::find_by_id(&state.db, admin.id)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".into()))?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(mut payload): Json<UpdateProfileRequest>,
) -> AppResult<Json<PublicUser>> {
    payload.email = payload.email.trim().to_lowercase();

    if payload.name.trim().is_empty() || payload.email.is_empty() {
        return Err(AppError::Validation("name and email are required".into()));
    }
    if !is_valid_email(&payload.email) {
        return Err(AppError::Validation("invalid email".into()));
    }

    let user = User::find_by_id(&state.db, admin.id)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".into()))?;

    if User::email_taken_by_other(&state.db, &payload.email, admin.id).await? {
        return Err(AppError::Conflict(
            "email already used by another account".into(),
        ));
    }

    let password_hash = match payload.new_password {
        Some(new_password) => {
            let current = payload.current_password.as_deref().ok_or_else(|| {
                AppError::Validation("current password is required".into())
            })?;
            if !verify_password(current, &user.password_hash)? {
                return Err(AppError::Validation("current password is incorrect".into()));
            }
            if new_password.len() < 8 {
                return Err(AppError::Validation("password too short".into()));
            }
            Some(hash_password(&new_password)?)
        }
        None => None,
    };

    let updated = User::update(
        &state.db,
        admin.id,
        UserPatch {
            name: Some(payload.name.trim().to_string()),
            email: Some(payload.email),
            phone: payload.phone,
            role: None,
            password_hash,
        },
    )
    .await?
    .ok_or_else(|| AppError::NotFound("user not found".into()))?;

    info!(user_id = %admin.id, "profile updated");
    Ok(Json(updated.into()))
}

// --- settings ---

#[instrument(skip(state))]
pub async fn get_settings(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
) -> AppResult<Json<SettingsResponse>> {
    let system = SystemSettings::get_or_init(&state.db).await?;
    let notifications = NotificationSettings::get_or_init(&state.db, admin.id).await?;
    Ok(Json(SettingsResponse {
        system,
        notifications,
    }))
}

#[instrument(skip(state, payload))]
pub async fn update_settings(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(payload): Json<UpdateSettingsRequest>,
) -> AppResult<Json<Value>> {
    match payload {
        UpdateSettingsRequest::System {
            site_name,
            site_description,
            maintenance_mode,
            allow_registration,
            max_file_size_mb,
            auto_assign_complaints,
        } => {
            if site_name.trim().is_empty() {
                return Err(AppError::Validation("site name is required".into()));
            }
            SystemSettings::save(
                &state.db,
                SystemSettingsUpdate {
                    site_name,
                    site_description,
                    maintenance_mode,
                    allow_registration,
                    max_file_size_mb,
                    auto_assign_complaints,
                },
            )
            .await?;
        }
        UpdateSettingsRequest::Notifications {
            email_notifications,
            push_notifications,
            complaint_reminders,
            daily_reports,
            weekly_reports,
        } => {
            NotificationSettings::save(
                &state.db,
                admin.id,
                NotificationSettingsUpdate {
                    email_notifications,
                    push_notifications,
                    complaint_reminders,
                    daily_reports,
                    weekly_reports,
                },
            )
            .await?;
        }
    }

    info!(admin_id = %admin.id, "settings saved");
    Ok(Json(json!({ "message": "settings saved" })))
}
