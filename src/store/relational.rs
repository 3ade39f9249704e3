//! PostgreSQL customers table.

use crate::error::StoreError;
use crate::schema::{CustomerChanges, CustomerRow, NewCustomer};
use crate::sql;
use crate::store::CustomerTable;
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

/// Unique violations become `DuplicateKey`; everything else stays a SQL failure.
pub fn classify_write_error(err: sqlx::Error) -> StoreError {
    let unique = matches!(&err, sqlx::Error::Database(db) if db.is_unique_violation());
    if unique {
        StoreError::DuplicateKey
    } else {
        StoreError::Sql(err)
    }
}

/// Create the customers table if it does not exist.
pub async fn ensure_customers_table(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::query(&sql::create_customers_table()).execute(pool).await?;
    Ok(())
}

#[derive(Clone)]
pub struct PgCustomerTable {
    pool: PgPool,
}

impl PgCustomerTable {
    pub fn new(pool: PgPool) -> Self {
        PgCustomerTable { pool }
    }
}

fn row_to_customer(row: &PgRow) -> Result<CustomerRow, sqlx::Error> {
    Ok(CustomerRow {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl CustomerTable for PgCustomerTable {
    async fn ping(&self) -> Result<i32, StoreError> {
        let v: i32 = sqlx::query_scalar("SELECT 1 AS test").fetch_one(&self.pool).await?;
        Ok(v)
    }

    async fn list_customers(&self) -> Result<Vec<CustomerRow>, StoreError> {
        let sql = sql::select_customers();
        tracing::debug!(sql = %sql, "query");
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        let customers = rows.iter().map(row_to_customer).collect::<Result<Vec<_>, _>>()?;
        Ok(customers)
    }

    async fn insert_customer(&self, customer: &NewCustomer) -> Result<i64, StoreError> {
        let sql = sql::insert_customer();
        tracing::debug!(sql = %sql, email = %customer.email, "query");
        let row = sqlx::query(&sql)
            .bind(&customer.name)
            .bind(&customer.email)
            .bind(customer.phone.as_deref())
            .fetch_one(&self.pool)
            .await
            .map_err(classify_write_error)?;
        Ok(row.try_get("id")?)
    }

    async fn customer_exists(&self, id: i64) -> Result<bool, StoreError> {
        let sql = sql::select_customer_exists();
        tracing::debug!(sql = %sql, id, "query");
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
        Ok(row.is_some())
    }

    async fn update_customer(&self, id: i64, customer: &NewCustomer) -> Result<u64, StoreError> {
        let sql = sql::update_customer();
        tracing::debug!(sql = %sql, id, "query");
        let result = sqlx::query(&sql)
            .bind(&customer.name)
            .bind(&customer.email)
            .bind(customer.phone.as_deref())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(classify_write_error)?;
        Ok(result.rows_affected())
    }

    async fn update_customer_fields(&self, id: i64, changes: &CustomerChanges) -> Result<u64, StoreError> {
        let q = sql::update_customer_fields(changes);
        tracing::debug!(sql = %q.sql, params = ?q.params, id, "query");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(p);
        }
        let result = query
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(classify_write_error)?;
        Ok(result.rows_affected())
    }
}
