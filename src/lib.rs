//! CRM backend: customer and lead REST endpoints over PostgreSQL and MongoDB.

pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod response;
pub mod routes;
pub mod schema;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use auth::{authenticate, require_auth, AuthConfig, AuthResult, AuthUser, UserStatus};
pub use config::Settings;
pub use error::{AppError, AuthFailure, ConfigError, StoreError};
pub use response::Envelope;
pub use routes::{app, common_routes, customer_routes, mongo_routes};
pub use schema::{CustomerDocument, CustomerField, CustomerRow, LeadDocument, NewCustomer, NewLead};
pub use service::{reconcile, DateRange, FieldChanges};
pub use state::AppState;
pub use store::{ensure_customers_table, CustomerTable, DocumentStore, MongoDocumentStore, PgCustomerTable};
