mod dto;
pub mod handlers;
#[cfg(test)]
pub mod memory;
mod password;
pub mod repo;
pub mod repo_types;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::user_routes()
}
