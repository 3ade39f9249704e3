//! MongoDB `customers` and `leads` collections.

use crate::error::StoreError;
use crate::schema::{CustomerChanges, CustomerDocument, LeadDocument, NewCustomer, NewLead};
use crate::service::{AllowedField, DateRange};
use crate::store::{DocumentStore, DOCUMENT_NOT_FOUND};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{FindOneAndUpdateOptions, FindOptions, IndexOptions, ReturnDocument};
use mongodb::{Collection, Database, IndexModel};
use serde::{Deserialize, Serialize};

pub const CUSTOMERS_COLLECTION: &str = "customers";
pub const LEADS_COLLECTION: &str = "leads";

/// Server error code for a unique index violation.
const DUPLICATE_KEY_CODE: i32 = 11000;

/// Code 11000 becomes `DuplicateKey`, whether reported as a write error
/// (inserts) or a command error (find-and-modify).
pub fn classify_write_error(err: mongodb::error::Error) -> StoreError {
    let duplicate = match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) => e.code == DUPLICATE_KEY_CODE,
        ErrorKind::Command(e) => e.code == DUPLICATE_KEY_CODE,
        _ => false,
    };
    if duplicate {
        StoreError::DuplicateKey
    } else {
        StoreError::Document(err)
    }
}

fn parse_object_id(id: &str) -> Result<ObjectId, StoreError> {
    ObjectId::parse_str(id.trim()).map_err(|_| StoreError::InvalidId)
}

fn to_bson_time(t: DateTime<Utc>) -> BsonDateTime {
    BsonDateTime::from_millis(t.timestamp_millis())
}

fn to_utc(t: BsonDateTime) -> Result<DateTime<Utc>, StoreError> {
    let millis = t.timestamp_millis();
    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or(StoreError::InvalidTimestamp(millis))
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredCustomer {
    #[serde(rename = "_id")]
    id: ObjectId,
    name: String,
    email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    phone: Option<String>,
    #[serde(rename = "createdAt")]
    created_at: BsonDateTime,
    #[serde(rename = "updatedAt")]
    updated_at: BsonDateTime,
}

impl TryFrom<StoredCustomer> for CustomerDocument {
    type Error = StoreError;

    fn try_from(s: StoredCustomer) -> Result<Self, StoreError> {
        Ok(CustomerDocument {
            id: s.id.to_hex(),
            name: s.name,
            email: s.email,
            phone: s.phone,
            created_at: to_utc(s.created_at)?,
            updated_at: to_utc(s.updated_at)?,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredLead {
    #[serde(rename = "_id")]
    id: ObjectId,
    name: String,
    email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    leadsource: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    leadcomments: Option<String>,
    leadprocessed: String,
    created_by: String,
    created_at: BsonDateTime,
    updated_at: BsonDateTime,
}

impl TryFrom<StoredLead> for LeadDocument {
    type Error = StoreError;

    fn try_from(s: StoredLead) -> Result<Self, StoreError> {
        Ok(LeadDocument {
            id: s.id.to_hex(),
            name: s.name,
            email: s.email,
            phone: s.phone,
            leadsource: s.leadsource,
            leadcomments: s.leadcomments,
            leadprocessed: s.leadprocessed,
            created_by: s.created_by,
            created_at: to_utc(s.created_at)?,
            updated_at: to_utc(s.updated_at)?,
        })
    }
}

#[derive(Clone)]
pub struct MongoDocumentStore {
    db: Database,
}

impl MongoDocumentStore {
    pub fn new(db: Database) -> Self {
        MongoDocumentStore { db }
    }

    fn customers(&self) -> Collection<StoredCustomer> {
        self.db.collection(CUSTOMERS_COLLECTION)
    }

    fn leads(&self) -> Collection<StoredLead> {
        self.db.collection(LEADS_COLLECTION)
    }

    /// Round-trip a `ping` command; fails if the server is unreachable.
    pub async fn ping(&self) -> Result<(), StoreError> {
        self.db.run_command(doc! { "ping": 1 }, None).await?;
        Ok(())
    }

    /// Unique `email` index on both collections.
    pub async fn ensure_indexes(&self) -> Result<(), StoreError> {
        let unique_email = || {
            IndexModel::builder()
                .keys(doc! { "email": 1 })
                .options(IndexOptions::builder().unique(true).build())
                .build()
        };
        self.customers().create_index(unique_email(), None).await?;
        self.leads().create_index(unique_email(), None).await?;
        Ok(())
    }

    async fn update_customer(&self, id: &str, update: Document) -> Result<CustomerDocument, StoreError> {
        let oid = parse_object_id(id)?;
        tracing::debug!(collection = CUSTOMERS_COLLECTION, id = %oid, update = %update, "find_one_and_update");
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        self.customers()
            .find_one_and_update(doc! { "_id": oid }, update, options)
            .await
            .map_err(classify_write_error)?
            .ok_or(StoreError::NotFound(DOCUMENT_NOT_FOUND))?
            .try_into()
    }
}

#[async_trait]
impl DocumentStore for MongoDocumentStore {
    async fn count_customers(&self) -> Result<u64, StoreError> {
        Ok(self.customers().count_documents(None, None).await?)
    }

    async fn list_customers(&self) -> Result<Vec<CustomerDocument>, StoreError> {
        let cursor = self.customers().find(None, None).await?;
        let stored: Vec<StoredCustomer> = cursor.try_collect().await?;
        stored.into_iter().map(CustomerDocument::try_from).collect()
    }

    async fn create_customer(&self, customer: &NewCustomer) -> Result<CustomerDocument, StoreError> {
        let now = to_bson_time(Utc::now());
        let stored = StoredCustomer {
            id: ObjectId::new(),
            name: customer.name.clone(),
            email: customer.email.clone(),
            phone: customer.phone.clone(),
            created_at: now,
            updated_at: now,
        };
        tracing::debug!(collection = CUSTOMERS_COLLECTION, email = %stored.email, "insert_one");
        self.customers()
            .insert_one(&stored, None)
            .await
            .map_err(classify_write_error)?;
        stored.try_into()
    }

    async fn create_lead(&self, lead: &NewLead) -> Result<LeadDocument, StoreError> {
        let now = to_bson_time(Utc::now());
        let stored = StoredLead {
            id: ObjectId::new(),
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
        tracing::debug!(collection = LEADS_COLLECTION, email = %stored.email, "insert_one");
        self.leads()
            .insert_one(&stored, None)
            .await
            .map_err(classify_write_error)?;
        stored.try_into()
    }

    async fn replace_customer(&self, id: &str, customer: &NewCustomer) -> Result<CustomerDocument, StoreError> {
        let mut set = doc! {
            "name": customer.name.as_str(),
            "email": customer.email.as_str(),
            "updatedAt": to_bson_time(Utc::now()),
        };
        let update = match customer.phone.as_deref() {
            Some(phone) => {
                set.insert("phone", phone);
                doc! { "$set": set }
            }
            None => doc! { "$set": set, "$unset": { "phone": "" } },
        };
        self.update_customer(id, update).await
    }

    async fn patch_customer(&self, id: &str, changes: &CustomerChanges) -> Result<CustomerDocument, StoreError> {
        let mut set = Document::new();
        for (field, value) in changes.iter() {
            set.insert(field.key(), value.as_str());
        }
        set.insert("updatedAt", to_bson_time(Utc::now()));
        self.update_customer(id, doc! { "$set": set }).await
    }

    async fn delete_customer(&self, id: &str) -> Result<CustomerDocument, StoreError> {
        let oid = parse_object_id(id)?;
        tracing::debug!(collection = CUSTOMERS_COLLECTION, id = %oid, "find_one_and_delete");
        self.customers()
            .find_one_and_delete(doc! { "_id": oid }, None)
            .await?
            .ok_or(StoreError::NotFound(DOCUMENT_NOT_FOUND))?
            .try_into()
    }

    async fn customers_created_between(&self, range: &DateRange) -> Result<Vec<CustomerDocument>, StoreError> {
        let filter = doc! {
            "createdAt": {
                "$gte": to_bson_time(range.start()),
                "$lte": to_bson_time(range.end()),
            }
        };
        tracing::debug!(collection = CUSTOMERS_COLLECTION, filter = %filter, "find");
        let options = FindOptions::builder().sort(doc! { "createdAt": -1 }).build();
        let cursor = self.customers().find(filter, options).await?;
        let stored: Vec<StoredCustomer> = cursor.try_collect().await?;
        stored.into_iter().map(CustomerDocument::try_from).collect()
    }
}
