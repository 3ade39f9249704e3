//! Document-store handlers: customers CRUD, creation-date search, lead intake.

use crate::auth::AuthUser;
use crate::error::{AppError, StoreResultExt};
use crate::handlers::{body_object, query_params};
use crate::response::{created, ok, Envelope};
use crate::schema::{customer_changes, NewCustomer, NewLead};
use crate::service::DateRange;
use crate::state::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::Value;

pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let customers = state
        .documents
        .list_customers()
        .await
        .with_context("Failed to fetch customers from MongoDB")?;
    Ok(ok(Envelope::success().data(customers)))
}

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let customer = NewCustomer::from_body(&body_object(body)?)?;
    let doc = state
        .documents
        .create_customer(&customer)
        .await
        .with_context("Failed to create customer in MongoDB")?;
    Ok(created(
        Envelope::success()
            .message("Customer created successfully in MongoDB")
            .data(doc),
    ))
}

pub async fn replace(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let customer = NewCustomer::from_body(&body_object(body)?)?;
    let doc = state
        .documents
        .replace_customer(&id, &customer)
        .await
        .with_context("Failed to update customer in MongoDB")?;
    Ok(ok(Envelope::success()
        .message("Customer updated successfully in MongoDB")
        .data(doc)))
}

pub async fn patch(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let changes = customer_changes(&body_object(body)?)?;
    let doc = state
        .documents
        .patch_customer(&id, &changes)
        .await
        .with_context("Failed to partially update customer in MongoDB")?;
    Ok(ok(Envelope::success()
        .message("Customer partially updated successfully in MongoDB")
        .field("updatedFields", changes.applied())
        .data(doc)))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<impl IntoResponse, AppError> {
    let doc = state
        .documents
        .delete_customer(&id)
        .await
        .with_context("Failed to delete customer from MongoDB")?;
    Ok(ok(Envelope::success()
        .message("Customer deleted successfully from MongoDB")
        .data(doc)))
}

#[derive(Debug, Deserialize)]
pub struct DateRangeQuery {
    from: Option<String>,
    to: Option<String>,
}

/// GET /api/mongo/customers/date-range?from=YYYY-MM-DD&to=YYYY-MM-DD
pub async fn date_range(
    State(state): State<AppState>,
    query: Result<Query<DateRangeQuery>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let params = query_params(query)?;
    let range = DateRange::parse(params.from.as_deref(), params.to.as_deref())?;
    let customers = state
        .documents
        .customers_created_between(&range)
        .await
        .with_context("Failed to fetch customers by date range")?;
    let message = format!(
        "Found {} customers created between {} and {}",
        customers.len(),
        range.from_label(),
        range.to_label()
    );
    Ok(ok(Envelope::success()
        .message(message)
        .field(
            "dateRange",
            serde_json::json!({ "from": range.start_iso(), "to": range.end_iso() }),
        )
        .field("count", customers.len())
        .data(customers)))
}

/// POST /api/mongo/lead. `createdBy` defaults to the authenticated user.
pub async fn create_lead(
    State(state): State<AppState>,
    user: AuthUser,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let lead = NewLead::from_body(&body_object(body)?, &user.id)?;
    tracing::info!(email = %lead.email, source = ?lead.leadsource, created_by = %lead.created_by, "received lead");
    let doc = state
        .documents
        .create_lead(&lead)
        .await
        .with_context("Failed to create lead in MongoDB")?;
    Ok(created(
        Envelope::success()
            .message("Lead created successfully in MongoDB")
            .data(doc),
    ))
}
