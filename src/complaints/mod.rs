use axum::Router;

use crate::state::AppState;

mod dto;
pub mod handlers;
pub mod repo;

pub use repo::{ComplaintCategory, ComplaintPriority, ComplaintStatus};

pub fn router() -> Router<AppState> {
    handlers::complaint_routes()
}
