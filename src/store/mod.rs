//! Storage adapters. Each engine sits behind a capability trait so handlers stay
//! engine-agnostic; pools and clients are injected at construction.

pub mod document;
#[cfg(test)]
pub mod memory;
pub mod relational;

use crate::error::StoreError;
use crate::schema::{CustomerChanges, CustomerDocument, CustomerRow, LeadDocument, NewCustomer, NewLead};
use crate::service::DateRange;
use async_trait::async_trait;

pub use document::MongoDocumentStore;
pub use relational::{ensure_customers_table, PgCustomerTable};

pub const RELATIONAL_NOT_FOUND: &str = "Customer not found";
pub const DOCUMENT_NOT_FOUND: &str = "Customer not found in MongoDB";

/// Customers in the relational store. Each method is a single statement; the
/// provided `replace_customer`/`patch_customer` add the existence check.
#[async_trait]
pub trait CustomerTable: Send + Sync {
    /// Round-trip a trivial query; returns the selected value.
    async fn ping(&self) -> Result<i32, StoreError>;

    async fn list_customers(&self) -> Result<Vec<CustomerRow>, StoreError>;

    /// Returns the new id. Email collisions are `StoreError::DuplicateKey`.
    async fn insert_customer(&self, customer: &NewCustomer) -> Result<i64, StoreError>;

    async fn customer_exists(&self, id: i64) -> Result<bool, StoreError>;

    async fn update_customer(&self, id: i64, customer: &NewCustomer) -> Result<u64, StoreError>;

    async fn update_customer_fields(&self, id: i64, changes: &CustomerChanges) -> Result<u64, StoreError>;

    /// Full replace of the mutable fields. Returns affected rows.
    async fn replace_customer(&self, id: i64, customer: &NewCustomer) -> Result<u64, StoreError> {
        if !self.customer_exists(id).await? {
            return Err(StoreError::NotFound(RELATIONAL_NOT_FOUND));
        }
        self.update_customer(id, customer).await
    }

    /// Partial update. Returns affected rows; 0 on an existing row is not an error.
    async fn patch_customer(&self, id: i64, changes: &CustomerChanges) -> Result<u64, StoreError> {
        if !self.customer_exists(id).await? {
            return Err(StoreError::NotFound(RELATIONAL_NOT_FOUND));
        }
        self.update_customer_fields(id, changes).await
    }
}

/// Customers and leads in the document store. Ids are hex ObjectIds; a
/// malformed id is `StoreError::InvalidId`, a missing document `NotFound`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn count_customers(&self) -> Result<u64, StoreError>;

    async fn list_customers(&self) -> Result<Vec<CustomerDocument>, StoreError>;

    async fn create_customer(&self, customer: &NewCustomer) -> Result<CustomerDocument, StoreError>;

    async fn create_lead(&self, lead: &NewLead) -> Result<LeadDocument, StoreError>;

    async fn replace_customer(&self, id: &str, customer: &NewCustomer) -> Result<CustomerDocument, StoreError>;

    async fn patch_customer(&self, id: &str, changes: &CustomerChanges) -> Result<CustomerDocument, StoreError>;

    /// Returns the deleted document.
    async fn delete_customer(&self, id: &str) -> Result<CustomerDocument, StoreError>;

    /// Customers whose `createdAt` falls inside `range`, newest first.
    async fn customers_created_between(&self, range: &DateRange) -> Result<Vec<CustomerDocument>, StoreError>;
}
