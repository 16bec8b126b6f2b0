use crate::state::AppState;
use axum::Router;

pub mod claims;
pub mod cookie;
pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod jwt;
pub mod repo;
pub mod repo_types;
pub mod service;

mod password;

pub fn router() -> Router<AppState> {
    handlers::auth_routes()
}
