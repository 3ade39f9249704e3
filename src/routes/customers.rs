//! Relational customer routes. The relational surface has no DELETE.

use crate::auth::require_auth;
use crate::handlers::customers::{create, list, patch, replace};
use crate::state::AppState;
use axum::{middleware, routing::get, routing::put, Router};

pub fn customer_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/customers", get(list).post(create))
        .route("/api/customers/:id", put(replace).patch(patch))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state)
}
