//! Route tables and the assembled application router.

mod common;
mod customers;
mod mongo;

pub use common::common_routes;
pub use customers::customer_routes;
pub use mongo::mongo_routes;

use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Request bodies above this size are rejected with 413 in the error envelope.
pub const BODY_LIMIT_BYTES: usize = 1024 * 1024;

/// Full application: public health routes plus the authenticated CRM routes.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(common_routes(state.clone()))
        .merge(customer_routes(state.clone()))
        .merge(mongo_routes(state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES)),
        )
}
