//! Field-level validation and normalization of request bodies.

use crate::error::AppError;
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

fn email_pattern() -> Result<&'static Regex, AppError> {
    static EMAIL: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+$"))
        .as_ref()
        .map_err(|_| AppError::invalid("invalid email pattern"))
}

/// Trimmed string value of a field. Absent and null are `None`; any other
/// non-string type is rejected.
pub fn text_value(key: &str, value: Option<&Value>) -> Result<Option<String>, AppError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.trim().to_string())),
        Some(_) => Err(AppError::invalid(format!("{} must be a string", key))),
    }
}

pub fn optional_text(body: &Map<String, Value>, key: &str) -> Result<Option<String>, AppError> {
    text_value(key, body.get(key))
}

pub fn required_text(body: &Map<String, Value>, key: &str) -> Result<String, AppError> {
    require(key, optional_text(body, key)?)
}

/// A required field must be present and non-blank after trimming.
pub fn require(key: &str, value: Option<String>) -> Result<String, AppError> {
    match value {
        Some(s) if !s.is_empty() => Ok(s),
        _ => Err(AppError::invalid(format!("{} is required", key))),
    }
}

/// Lowercase and check the shape of an already trimmed email address.
pub fn normalize_email(key: &str, raw: String) -> Result<String, AppError> {
    let email = raw.to_lowercase();
    if !email_pattern()?.is_match(&email) {
        return Err(AppError::invalid(format!("{} must be a valid email", key)));
    }
    Ok(email)
}
