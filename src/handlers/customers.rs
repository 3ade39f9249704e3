//! Relational customer handlers: list, create, replace, partial update.

use crate::error::{AppError, StoreResultExt};
use crate::handlers::{body_object, parse_row_id};
use crate::response::{created, ok, Envelope};
use crate::schema::{customer_changes, NewCustomer};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::Value;

pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let rows = state
        .customers
        .list_customers()
        .await
        .with_context("Failed to fetch customers")?;
    Ok(ok(Envelope::success().data(rows)))
}

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let customer = NewCustomer::from_body(&body_object(body)?)?;
    let id = state
        .customers
        .insert_customer(&customer)
        .await
        .with_context("Failed to create customer")?;
    Ok(created(
        Envelope::success()
            .message("Customer created successfully")
            .field("customerId", id),
    ))
}

/// PUT: replaces name, email and phone; an omitted phone is cleared.
pub async fn replace(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_row_id(&id_str)?;
    let customer = NewCustomer::from_body(&body_object(body)?)?;
    let affected = state
        .customers
        .replace_customer(id, &customer)
        .await
        .with_context("Failed to update customer")?;
    Ok(ok(Envelope::success()
        .message("Customer updated successfully")
        .field("affectedRows", affected)))
}

pub async fn patch(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_row_id(&id_str)?;
    let changes = customer_changes(&body_object(body)?)?;
    let affected = state
        .customers
        .patch_customer(id, &changes)
        .await
        .with_context("Failed to partially update customer")?;
    Ok(ok(Envelope::success()
        .message("Customer partially updated successfully")
        .field("affectedRows", affected)
        .field("updatedFields", changes.applied())))
}
