//! Liveness and store connectivity checks.

use crate::error::{AppError, StoreResultExt};
use crate::response::{ok, Envelope};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthBody {
    status: &'static str,
    message: &'static str,
}

pub async fn root() -> &'static str {
    "Hello World!"
}

pub async fn health() -> Json<HealthBody> {
    Json(HealthBody {
        status: "OK",
        message: "Server is running",
    })
}

/// GET /api/db-test
pub async fn db_test(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let test = state.customers.ping().await.with_context("Database connection failed")?;
    Ok(ok(Envelope::success()
        .message("Database connection successful")
        .data(serde_json::json!([{ "test": test }]))))
}

/// GET /api/mongo/health
pub async fn mongo_health(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let count = state
        .documents
        .count_customers()
        .await
        .with_context("MongoDB connection failed")?;
    Ok(ok(Envelope::success()
        .message("MongoDB connection successful")
        .field("totalCustomers", count)))
}
