//! Lead: customer fields plus source, comments, processing state and author.

use crate::error::AppError;
use crate::service::validation::{normalize_email, optional_text, require, required_text};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

/// Processing state assigned to every new lead.
pub const LEAD_STATUS_NEW: &str = "New";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewLead {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub leadsource: Option<String>,
    pub leadcomments: Option<String>,
    pub leadprocessed: String,
    pub created_by: String,
}

impl NewLead {
    /// `createdBy` falls back to `author` (the authenticated user) when the body omits it.
    pub fn from_body(body: &Map<String, Value>, author: &str) -> Result<Self, AppError> {
        let name = required_text(body, "name")?;
        let email = normalize_email("email", required_text(body, "email")?)?;
        let created_by = match optional_text(body, "createdBy")? {
            Some(s) if !s.is_empty() => s,
            _ => require("createdBy", Some(author.trim().to_string()))?,
        };
        Ok(NewLead {
            name,
            email,
            phone: optional_text(body, "phone")?,
            leadsource: optional_text(body, "leadsource")?,
            leadcomments: optional_text(body, "leadcomments")?,
            leadprocessed: LEAD_STATUS_NEW.to_string(),
            created_by,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leadsource: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leadcomments: Option<String>,
    pub leadprocessed: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn new_lead_defaults_processing_state() {
        let lead = NewLead::from_body(
            &object(json!({"name": "Bo", "email": "BO@x.io", "leadsource": " web "})),
            "agent-7",
        )
        .unwrap();
        assert_eq!(lead.leadprocessed, "New");
        assert_eq!(lead.email, "bo@x.io");
        assert_eq!(lead.leadsource.as_deref(), Some("web"));
        assert_eq!(lead.created_by, "agent-7");
    }

    #[test]
    fn body_author_wins_over_authenticated_user() {
        let lead = NewLead::from_body(
            &object(json!({"name": "Bo", "email": "bo@x.io", "createdBy": "importer"})),
            "agent-7",
        )
        .unwrap();
        assert_eq!(lead.created_by, "importer");
    }

    #[test]
    fn lead_without_any_author_is_rejected() {
        let err = NewLead::from_body(&object(json!({"name": "Bo", "email": "bo@x.io"})), " ").unwrap_err();
        assert_eq!(err.to_string(), "createdBy is required");
    }

    #[test]
    fn lead_document_uses_camel_case_author() {
        let now = Utc::now();
        let doc = LeadDocument {
            id: "x".into(),
            name: "Bo".into(),
            email: "bo@x.io".into(),
            phone: None,
            leadsource: None,
            leadcomments: None,
            leadprocessed: LEAD_STATUS_NEW.into(),
            created_by: "agent-7".into(),
            created_at: now,
            updated_at: now,
        };
        let v = serde_json::to_value(&doc).unwrap();
        assert_eq!(v["createdBy"], "agent-7");
        assert_eq!(v["leadprocessed"], "New");
    }
}
