//! In-memory stores for router tests. They mirror the engines' observable
//! behavior: unique email, not-found on missing ids, timestamps.

use crate::error::StoreError;
use crate::schema::{CustomerChanges, CustomerDocument, CustomerField, CustomerRow, LeadDocument, NewCustomer, NewLead};
use crate::service::DateRange;
use crate::store::{CustomerTable, DocumentStore, DOCUMENT_NOT_FOUND};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

fn sql_outage(fail: &AtomicBool) -> Result<(), StoreError> {
    if fail.load(Ordering::SeqCst) {
        return Err(StoreError::Sql(sqlx::Error::PoolTimedOut));
    }
    Ok(())
}

fn document_outage(fail: &AtomicBool) -> Result<(), StoreError> {
    if fail.load(Ordering::SeqCst) {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
        let kind = mongodb::error::ErrorKind::Io(Arc::new(io));
        return Err(StoreError::Document(mongodb::error::Error::from(kind)));
    }
    Ok(())
}

fn apply_change(name: &mut String, email: &mut String, phone: &mut Option<String>, field: CustomerField, value: &str) {
    match field {
        CustomerField::Name => *name = value.to_string(),
        CustomerField::Email => *email = value.to_string(),
        CustomerField::Phone => *phone = Some(value.to_string()),
    }
}

#[derive(Default)]
pub struct MemoryCustomerTable {
    rows: Mutex<Vec<CustomerRow>>,
    /// Number of INSERT/UPDATE statements issued.
    pub writes: AtomicUsize,
    /// When set, every call fails as if the pool were unreachable.
    pub fail: AtomicBool,
}

impl MemoryCustomerTable {
    fn email_taken(rows: &[CustomerRow], email: &str, except: Option<i64>) -> bool {
        rows.iter().any(|r| r.email == email && Some(r.id) != except)
    }
}

#[async_trait]
impl CustomerTable for MemoryCustomerTable {
    async fn ping(&self) -> Result<i32, StoreError> {
        sql_outage(&self.fail)?;
        Ok(1)
    }

    async fn list_customers(&self) -> Result<Vec<CustomerRow>, StoreError> {
        sql_outage(&self.fail)?;
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn insert_customer(&self, customer: &NewCustomer) -> Result<i64, StoreError> {
        sql_outage(&self.fail)?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.lock().unwrap();
        if Self::email_taken(&rows, &customer.email, None) {
            return Err(StoreError::DuplicateKey);
        }
        let id = rows.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        let now = Utc::now();
        rows.push(CustomerRow {
            id,
            name: customer.name.clone(),
            email: customer.email.clone(),
            phone: customer.phone.clone(),
            created_at: now,
            updated_at: now,
        });
        Ok(id)
    }

    async fn customer_exists(&self, id: i64) -> Result<bool, StoreError> {
        sql_outage(&self.fail)?;
        Ok(self.rows.lock().unwrap().iter().any(|r| r.id == id))
    }

    async fn update_customer(&self, id: i64, customer: &NewCustomer) -> Result<u64, StoreError> {
        sql_outage(&self.fail)?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.lock().unwrap();
        if Self::email_taken(&rows, &customer.email, Some(id)) {
            return Err(StoreError::DuplicateKey);
        }
        let mut affected = 0;
        for row in rows.iter_mut().filter(|r| r.id == id) {
            row.name = customer.name.clone();
            row.email = customer.email.clone();
            row.phone = customer.phone.clone();
            row.updated_at = Utc::now();
            affected += 1;
        }
        Ok(affected)
    }

    async fn update_customer_fields(&self, id: i64, changes: &CustomerChanges) -> Result<u64, StoreError> {
        sql_outage(&self.fail)?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.lock().unwrap();
        if let Some((_, email)) = changes.iter().find(|(f, _)| *f == CustomerField::Email) {
            if Self::email_taken(&rows, email, Some(id)) {
                return Err(StoreError::DuplicateKey);
            }
        }
        let mut affected = 0;
        for row in rows.iter_mut().filter(|r| r.id == id) {
            for (field, value) in changes.iter() {
                apply_change(&mut row.name, &mut row.email, &mut row.phone, field, value);
            }
            row.updated_at = Utc::now();
            affected += 1;
        }
        Ok(affected)
    }
}

#[derive(Default)]
pub struct MemoryDocumentStore {
    customers: Mutex<Vec<CustomerDocument>>,
    leads: Mutex<Vec<LeadDocument>>,
    /// Number of insert/update/delete operations issued.
    pub writes: AtomicUsize,
    /// When set, every call fails as if the server were unreachable.
    pub fail: AtomicBool,
}

impl MemoryDocumentStore {
    /// Insert a customer with a fixed creation time.
    pub fn seed_customer(&self, name: &str, email: &str, created_at: DateTime<Utc>) -> String {
        let id = ObjectId::new().to_hex();
        self.customers.lock().unwrap().push(CustomerDocument {
            id: id.clone(),
            name: name.into(),
            email: email.into(),
            phone: None,
            created_at,
            updated_at: created_at,
        });
        id
    }

    fn check_id(id: &str) -> Result<(), StoreError> {
        ObjectId::parse_str(id).map(|_| ()).map_err(|_| StoreError::InvalidId)
    }

    fn update_with(
        &self,
        id: &str,
        new_email: Option<&str>,
        apply: impl FnOnce(&mut CustomerDocument),
    ) -> Result<CustomerDocument, StoreError> {
        Self::check_id(id)?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut customers = self.customers.lock().unwrap();
        if let Some(email) = new_email {
            if customers.iter().any(|c| c.email == email && c.id != id) {
                return Err(StoreError::DuplicateKey);
            }
        }
        let doc = customers
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(StoreError::NotFound(DOCUMENT_NOT_FOUND))?;
        apply(doc);
        doc.updated_at = Utc::now();
        Ok(doc.clone())
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn count_customers(&self) -> Result<u64, StoreError> {
        document_outage(&self.fail)?;
        Ok(self.customers.lock().unwrap().len() as u64)
    }

    async fn list_customers(&self) -> Result<Vec<CustomerDocument>, StoreError> {
        document_outage(&self.fail)?;
        Ok(self.customers.lock().unwrap().clone())
    }

    async fn create_customer(&self, customer: &NewCustomer) -> Result<CustomerDocument, StoreError> {
        document_outage(&self.fail)?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut customers = self.customers.lock().unwrap();
        if customers.iter().any(|c| c.email == customer.email) {
            return Err(StoreError::DuplicateKey);
        }
        let now = Utc::now();
        let doc = CustomerDocument {
            id: ObjectId::new().to_hex(),
            name: customer.name.clone(),
            email: customer.email.clone(),
            phone: customer.phone.clone(),
            created_at: now,
            updated_at: now,
        };
        customers.push(doc.clone());
        Ok(doc)
    }

    async fn create_lead(&self, lead: &NewLead) -> Result<LeadDocument, StoreError> {
        document_outage(&self.fail)?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut leads = self.leads.lock().unwrap();
        if leads.iter().any(|l| l.email == lead.email) {
            return Err(StoreError::DuplicateKey);
        }
        let now = Utc::now();
        let doc = LeadDocument {
            id: ObjectId::new().to_hex(),
            name: lead.name.clone(),
            email: lead.email.clone(),
            phone: lead.phone.clone(),
            leadsource: lead.leadsource.clone(),
            leadcomments: lead.leadcomments.clone(),
            leadprocessed: lead.leadprocessed.clone(),
            created_by: lead.created_by.clone(),
            created_at: now,
            updated_at: now,
        };
        leads.push(doc.clone());
        Ok(doc)
    }

    async fn replace_customer(&self, id: &str, customer: &NewCustomer) -> Result<CustomerDocument, StoreError> {
        document_outage(&self.fail)?;
        self.update_with(id, Some(&customer.email), |doc| {
            doc.name = customer.name.clone();
            doc.email = customer.email.clone();
            doc.phone = customer.phone.clone();
        })
    }

    async fn patch_customer(&self, id: &str, changes: &CustomerChanges) -> Result<CustomerDocument, StoreError> {
        document_outage(&self.fail)?;
        let new_email = changes
            .iter()
            .find(|(f, _)| *f == CustomerField::Email)
            .map(|(_, v)| v.as_str());
        self.update_with(id, new_email, |doc| {
            for (field, value) in changes.iter() {
                apply_change(&mut doc.name, &mut doc.email, &mut doc.phone, field, value);
            }
        })
    }

    async fn delete_customer(&self, id: &str) -> Result<CustomerDocument, StoreError> {
        document_outage(&self.fail)?;
        Self::check_id(id)?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut customers = self.customers.lock().unwrap();
        let pos = customers
            .iter()
            .position(|c| c.id == id)
            .ok_or(StoreError::NotFound(DOCUMENT_NOT_FOUND))?;
        Ok(customers.remove(pos))
    }

    async fn customers_created_between(&self, range: &DateRange) -> Result<Vec<CustomerDocument>, StoreError> {
        document_outage(&self.fail)?;
        let mut found: Vec<CustomerDocument> = self
            .customers
            .lock()
            .unwrap()
            .iter()
            .filter(|c| range.contains(c.created_at))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }
}
