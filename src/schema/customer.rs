//! Customer: required trimmed `name`, required unique lowercased `email`, optional `phone`.

use crate::error::AppError;
use crate::service::validation::{normalize_email, require, required_text, optional_text, text_value};
use crate::service::{reconcile, AllowedField, FieldChanges};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

/// Mutable customer fields; also the allow-list for partial updates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CustomerField {
    Name,
    Email,
    Phone,
}

impl CustomerField {
    pub const ALL: [CustomerField; 3] = [CustomerField::Name, CustomerField::Email, CustomerField::Phone];

    /// Apply the schema rules for this field to a raw value (validators re-run on update).
    pub fn normalize(self, raw: &Value) -> Result<String, AppError> {
        let key = self.key();
        let text = text_value(key, Some(raw))?;
        match self {
            CustomerField::Name => require(key, text),
            CustomerField::Email => normalize_email(key, require(key, text)?),
            CustomerField::Phone => Ok(text.unwrap_or_default()),
        }
    }
}

impl AllowedField for CustomerField {
    fn key(self) -> &'static str {
        match self {
            CustomerField::Name => "name",
            CustomerField::Email => "email",
            CustomerField::Phone => "phone",
        }
    }
}

pub type CustomerChanges = FieldChanges<CustomerField, String>;

/// Select and normalize the fields of a PATCH body.
pub fn customer_changes(body: &Map<String, Value>) -> Result<CustomerChanges, AppError> {
    reconcile(body, &CustomerField::ALL)?.try_map(|field, value| field.normalize(&value))
}

/// Validated input for create and full replace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

impl NewCustomer {
    pub fn from_body(body: &Map<String, Value>) -> Result<Self, AppError> {
        let name = required_text(body, "name")?;
        let email = normalize_email("email", required_text(body, "email")?)?;
        let phone = optional_text(body, "phone")?;
        Ok(NewCustomer { name, email, phone })
    }
}

/// Customer as stored in the relational table.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CustomerRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Customer as stored in the document collection.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
