//! Common routes: greeting, health, and per-store connectivity checks. No auth.

use crate::handlers::health::{db_test, health, mongo_health, root};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn common_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/api/health", get(health))
        .route("/api/db-test", get(db_test))
        .route("/api/mongo/health", get(mongo_health))
        .with_state(state)
}
