//! Shared application state for all routes.

use crate::auth::AuthConfig;
use crate::store::{CustomerTable, DocumentStore};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// Relational customers (PostgreSQL in production).
    pub customers: Arc<dyn CustomerTable>,
    /// Document customers and leads (MongoDB in production).
    pub documents: Arc<dyn DocumentStore>,
    pub auth: Arc<AuthConfig>,
}
