use crate::state::AppState;
use axum::Router;

mod dto;
#[cfg(test)]
pub(crate) mod fake;
pub mod handlers;
pub mod repo;
pub mod repo_types;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::user_routes())
        .merge(handlers::login_routes())
}
