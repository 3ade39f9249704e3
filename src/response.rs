//! Standard response envelope helpers.

use axum::{http::StatusCode, Json};
use serde::Serialize;
use serde_json::{Map, Value};

/// Success envelope: `{status: "success", message?, ...fields, data?}`.
#[derive(Serialize, Debug, Default)]
pub struct Envelope {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Envelope {
    pub fn success() -> Self {
        Envelope {
            status: "success",
            ..Default::default()
        }
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Extra top-level field such as `affectedRows` or `updatedFields`.
    pub fn field<T: Serialize>(mut self, key: &str, value: T) -> Self {
        self.fields
            .insert(key.to_string(), serde_json::to_value(value).unwrap_or(Value::Null));
        self
    }

    pub fn data<T: Serialize>(mut self, data: T) -> Self {
        self.data = Some(serde_json::to_value(data).unwrap_or(Value::Null));
        self
    }
}

pub fn ok(envelope: Envelope) -> (StatusCode, Json<Envelope>) {
    (StatusCode::OK, Json(envelope))
}

pub fn created(envelope: Envelope) -> (StatusCode, Json<Envelope>) {
    (StatusCode::CREATED, Json(envelope))
}
