use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{AdminUser, AuthUser, Identity, Role},
    complaints::{
        dto::{ComplaintResponse, CreateComplaintRequest, UpdateStatusRequest},
        repo::{Complaint, NewComplaint},
    },
    error::{AppError, AppResult},
    state::AppState,
};

pub fn complaint_routes() -> Router<AppState> {
    Router::new()
        .route("/complaints", get(list_complaints).post(create_complaint))
        .route(
            "/complaints/:id",
            get(get_complaint).put(update_complaint_status),
        )
}

#[instrument(skip(state, payload))]
pub async fn create_complaint(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Json(payload): Json<CreateComplaintRequest>,
) -> AppResult<(StatusCode, Json<ComplaintResponse>)> {
    payload.validate().map_err(AppError::Validation)?;

    let complaint = Complaint::create(
        &state.db,
        identity.id,
        NewComplaint {
            title: payload.title.trim(),
            description: payload.description.trim(),
            category: payload.category,
            priority: payload.priority,
            location: payload.location.trim(),
            customer_number: payload.customer_number.as_deref(),
            attachments: &payload.attachments,
        },
    )
    .await?;

    info!(complaint_id = %complaint.id, user_id = %identity.id, "complaint created");
    Ok((StatusCode::CREATED, Json(complaint.into())))
}

/// Role-scoped listing: admins see everything (with owner info), users only
/// their own complaints. Newest first either way.
#[instrument(skip(state))]
pub async fn list_complaints(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> AppResult<Json<Vec<ComplaintResponse>>> {
    let items: Vec<ComplaintResponse> = if identity.role == Role::Admin {
        Complaint::list_all_with_owner(&state.db)
            .await?
            .into_iter()
            .map(Into::into)
            .collect()
    } else {
        Complaint::list_by_owner(&state.db, identity.id)
            .await?
            .into_iter()
            .map(Into::into)
            .collect()
    };
    Ok(Json(items))
}

#[instrument(skip(state))]
pub async fn get_complaint(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ComplaintResponse>> {
    let complaint = Complaint::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("complaint not found".into()))?;

    if !can_access(&identity, complaint.user_id) {
        warn!(complaint_id = %id, user_id = %identity.id, "ownership check failed");
        return Err(AppError::Authorization("access denied".into()));
    }

    Ok(Json(complaint.into()))
}

/// Admins may read any complaint, everyone else only their own.
fn can_access(identity: &Identity, owner_id: Uuid) -> bool {
    identity.role == Role::Admin || identity.id == owner_id
}

#[instrument(skip(state, payload))]
pub async fn update_complaint_status(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> AppResult<Json<ComplaintResponse>> {
    let current = Complaint::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("complaint not found".into()))?;

    if !current.status.can_transition(payload.status) {
        return Err(AppError::Validation(format!(
            "status transition {:?} -> {:?} is not allowed",
            current.status, payload.status
        )));
    }

    let updated = Complaint::update_status(
        &state.db,
        id,
        payload.status,
        payload.admin_notes.as_deref(),
    )
    .await?
    .ok_or_else(|| AppError::NotFound("complaint not found".into()))?;

    info!(
        complaint_id = %id,
        admin_id = %admin.id,
        status = ?updated.status,
        "complaint status updated"
    );
    Ok(Json(updated.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(role: Role) -> Identity {
        Identity {
            id: Uuid::new_v4(),
            email: "someone@voltdesk.id".into(),
            role,
        }
    }

    #[test]
    fn owner_can_access_their_complaint() {
        let owner = identity(Role::User);
        assert!(can_access(&owner, owner.id));
    }

    #[test]
    fn other_user_cannot_access_foreign_complaint() {
        let reader = identity(Role::User);
        assert!(!can_access(&reader, Uuid::new_v4()));
    }

    #[test]
    fn admin_can_access_any_complaint() {
        let admin = identity(Role::Admin);
        assert!(can_access(&admin, Uuid::new_v4()));
    }
}
