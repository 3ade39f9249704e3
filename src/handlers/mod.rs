//! HTTP handlers for health checks and the relational and document customer APIs.

pub mod customers;
pub mod health;
pub mod mongo;

use crate::error::AppError;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::Query;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{Map, Value};

fn body_object(body: Result<Json<Value>, JsonRejection>) -> Result<Map<String, Value>, AppError> {
    match body {
        Ok(Json(Value::Object(m))) => Ok(m),
        Ok(_) => Err(AppError::invalid("body must be a JSON object")),
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            Err(AppError::PayloadTooLarge(rejection.body_text()))
        }
        Err(rejection) => Err(AppError::invalid(rejection.body_text())),
    }
}

fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| AppError::invalid(rejection.body_text()))
}

fn parse_row_id(id_str: &str) -> Result<i64, AppError> {
    id_str.trim().parse().map_err(|_| AppError::invalid("invalid id"))
}
