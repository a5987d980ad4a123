use axum::{extract::State, routing::get, Json, Router};
use time::OffsetDateTime;
use tracing::instrument;

use crate::{
    auth::jwt::AdminUser,
    error::AppResult,
    state::AppState,
    stats::{
        dto::DashboardStats,
        repo, service,
    },
};

use crate::auth::repo::User;

pub fn stats_routes() -> Router<AppState> {
    Router::new().route("/admin/stats", get(dashboard_stats))
}

/// Full recompute on every request; cheap at this office's scale.
#[instrument(skip(state))]
pub async fn dashboard_stats(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> AppResult<Json<DashboardStats>> {
    let now = OffsetDateTime::now_utc();

    let counts = service::fold_status_counts(&repo::status_counts(&state.db).await?);
    let total_users = User::count(&state.db).await?;
    let monthly = repo::monthly_rows(&state.db, service::series_start(now)).await?;
    let recent_complaints = repo::recent_complaints(&state.db).await?;
    let recent_users = repo::recent_users(&state.db).await?;

    Ok(Json(DashboardStats {
        total_complaints: counts.total,
        pending_complaints: counts.pending,
        in_progress_complaints: counts.in_progress,
        resolved_complaints: counts.resolved,
        rejected_complaints: counts.rejected,
        total_users,
        chart_data: service::build_month_series(now, &monthly),
        recent_activities: service::build_activity_feed(now, &recent_complaints, &recent_users),
    }))
}
