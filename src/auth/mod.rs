use axum::Router;

use crate::state::AppState;

pub mod dto;
pub mod handlers;
pub mod jwt;
pub mod password;
pub mod repo;

pub use jwt::{AdminUser, AuthUser, Identity};
pub use repo::Role;

pub fn router() -> Router<AppState> {
    handlers::auth_routes()
}
