//! Integration tests against real PostgreSQL and MongoDB instances.
//!
//! Run with: DATABASE_URL="postgres:///crm_test" MONGODB_URI="mongodb://localhost:27017" \
//!   cargo test -p crm-backend --test live_stores -- --ignored --nocapture

use crm_backend::schema::customer_changes;
use crm_backend::{
    ensure_customers_table, CustomerTable, DateRange, DocumentStore, MongoDocumentStore, NewCustomer, NewLead,
    PgCustomerTable, StoreError,
};
use serde_json::json;
use sqlx::postgres::PgPoolOptions;

fn unique_email(prefix: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{prefix}-{nanos}@example.com")
}

fn customer(email: &str) -> NewCustomer {
    NewCustomer {
        name: "Live Test".into(),
        email: email.into(),
        phone: None,
    }
}

async fn pg_table() -> PgCustomerTable {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for live tests");
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("failed to connect to test database");
    ensure_customers_table(&pool).await.expect("create customers table");
    PgCustomerTable::new(pool)
}

async fn mongo_store() -> MongoDocumentStore {
    let uri = std::env::var("MONGODB_URI").expect("MONGODB_URI must be set for live tests");
    let client = mongodb::Client::with_uri_str(&uri).await.expect("mongodb client");
    let store = MongoDocumentStore::new(client.database("crm_live_test"));
    store.ensure_indexes().await.expect("create indexes");
    store
}

#[tokio::test]
#[ignore] // requires DATABASE_URL
async fn postgres_duplicate_email_and_patch() {
    let table = pg_table().await;
    let email = unique_email("pg");
    let id = table.insert_customer(&customer(&email)).await.unwrap();
    assert!(matches!(
        table.insert_customer(&customer(&email)).await,
        Err(StoreError::DuplicateKey)
    ));

    let body = json!({"phone": "555"});
    let changes = customer_changes(body.as_object().unwrap()).unwrap();
    assert_eq!(table.patch_customer(id, &changes).await.unwrap(), 1);
    let row = table
        .list_customers()
        .await
        .unwrap()
        .into_iter()
        .find(|r| r.id == id)
        .unwrap();
    assert_eq!(row.phone.as_deref(), Some("555"));

    assert!(matches!(
        table.patch_customer(i64::MAX, &changes).await,
        Err(StoreError::NotFound(_))
    ));
}

#[tokio::test]
#[ignore] // requires MONGODB_URI
async fn mongo_crud_and_date_range() {
    let store = mongo_store().await;
    let email = unique_email("mongo");
    let doc = store.create_customer(&customer(&email)).await.unwrap();
    assert!(matches!(
        store.create_customer(&customer(&email)).await,
        Err(StoreError::DuplicateKey)
    ));

    let today = doc.created_at.format("%Y-%m-%d").to_string();
    let range = DateRange::parse(Some(&today), Some(&today)).unwrap();
    let found = store.customers_created_between(&range).await.unwrap();
    assert!(found.iter().any(|c| c.id == doc.id));

    let deleted = store.delete_customer(&doc.id).await.unwrap();
    assert_eq!(deleted.email, email);
    assert!(matches!(
        store.delete_customer(&doc.id).await,
        Err(StoreError::NotFound(_))
    ));
}

#[tokio::test]
#[ignore] // requires MONGODB_URI
async fn mongo_lead_gets_default_state() {
    let store = mongo_store().await;
    let body = json!({"name": "Lead", "email": unique_email("lead")});
    let lead = NewLead::from_body(body.as_object().unwrap(), "live-test").unwrap();
    let doc = store.create_lead(&lead).await.unwrap();
    assert_eq!(doc.leadprocessed, "New");
    assert_eq!(doc.created_by, "live-test");
}
