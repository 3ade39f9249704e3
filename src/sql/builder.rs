//! Builds the parameterized statements of the customers table.

use crate::schema::CustomerChanges;
use crate::service::AllowedField;

pub const CUSTOMERS_TABLE: &str = "customers";

/// Quote identifier for PostgreSQL (safe: only from constants).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

#[derive(Debug, PartialEq, Eq)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<String>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: String) -> u32 {
        let n = self.params.len() as u32 + 1;
        self.params.push(v);
        n
    }
}

pub fn create_customers_table() -> String {
    format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            phone TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
        quoted(CUSTOMERS_TABLE)
    )
}

pub fn select_customers() -> String {
    format!(
        "SELECT id, name, email, phone, created_at, updated_at FROM {} ORDER BY id",
        quoted(CUSTOMERS_TABLE)
    )
}

pub fn select_customer_exists() -> String {
    format!("SELECT 1 FROM {} WHERE id = $1", quoted(CUSTOMERS_TABLE))
}

/// Binds: name, email, phone. Returns the new id.
pub fn insert_customer() -> String {
    format!(
        "INSERT INTO {} (name, email, phone) VALUES ($1, $2, $3) RETURNING id",
        quoted(CUSTOMERS_TABLE)
    )
}

/// Binds: name, email, phone, id.
pub fn update_customer() -> String {
    format!(
        "UPDATE {} SET name = $1, email = $2, phone = $3, updated_at = NOW() WHERE id = $4",
        quoted(CUSTOMERS_TABLE)
    )
}

/// UPDATE with one SET entry per change. Caller binds `params` in order, then the
/// id as the last placeholder.
pub fn update_customer_fields(changes: &CustomerChanges) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut set_parts = Vec::with_capacity(changes.len() + 1);
    for (field, value) in changes.iter() {
        let n = q.push_param(value.clone());
        set_parts.push(format!("{} = ${}", quoted(field.key()), n));
    }
    set_parts.push(format!("{} = NOW()", quoted("updated_at")));
    let id_param = q.params.len() + 1;
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = ${}",
        quoted(CUSTOMERS_TABLE),
        set_parts.join(", "),
        quoted("id"),
        id_param
    );
    q
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::customer_changes;
    use serde_json::json;

    #[test]
    fn set_clause_lists_only_changed_columns() {
        let body = json!({"phone": "555", "name": "Ann", "id": 1, "email; DROP TABLE x": "y"});
        let changes = customer_changes(body.as_object().unwrap()).unwrap();
        let q = update_customer_fields(&changes);
        assert_eq!(
            q.sql,
            r#"UPDATE "customers" SET "name" = $1, "phone" = $2, "updated_at" = NOW() WHERE "id" = $3"#
        );
        assert_eq!(q.params, vec!["Ann".to_string(), "555".to_string()]);
    }

    #[test]
    fn single_field_update_puts_id_second() {
        let body = json!({"email": "X@Y.com"});
        let changes = customer_changes(body.as_object().unwrap()).unwrap();
        let q = update_customer_fields(&changes);
        assert!(q.sql.ends_with(r#"WHERE "id" = $2"#));
        assert_eq!(q.params, vec!["x@y.com".to_string()]);
    }

    #[test]
    fn quoting_escapes_embedded_quotes() {
        assert_eq!(quoted("a\"b"), "\"a\"\"b\"");
    }
}
