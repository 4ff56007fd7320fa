//! HTTP REST API routes

mod game_routes;

use axum::Router;
use std::sync::Arc;

use crate::infrastructure::state::AppState;

/// Create all API routes
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new().merge(game_routes::game_routes())
}
