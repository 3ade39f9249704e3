//! Document-store routes under /api/mongo.

use crate::auth::require_auth;
use crate::handlers::mongo::{create, create_lead, date_range, delete, list, patch, replace};
use crate::state::AppState;
use axum::{middleware, routing::get, routing::post, routing::put, Router};

pub fn mongo_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/mongo/customers", get(list).post(create))
        .route("/api/mongo/customers/date-range", get(date_range))
        .route("/api/mongo/customers/:id", put(replace).patch(patch).delete(delete))
        .route("/api/mongo/lead", post(create_lead))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state)
}
