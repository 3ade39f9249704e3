//! CRM server: connects both stores, prepares the customers table and email
//! indexes, then serves the API.
//!
//! Run from repo root: `cargo run -p crm-server`

use crm_backend::{app, ensure_customers_table, AppState, AuthConfig, MongoDocumentStore, PgCustomerTable, Settings};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("crm_backend=info,crm_server=info,tower_http=info")),
        )
        .init();

    let settings = Settings::from_env()?;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .connect(&settings.database_url)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "PostgreSQL connection failed");
            e
        })?;
    ensure_customers_table(&pool).await?;
    tracing::info!(max_connections = settings.max_connections, "PostgreSQL pool ready");

    let client = mongodb::Client::with_uri_str(&settings.mongodb_uri).await?;
    let documents = MongoDocumentStore::new(client.database(&settings.mongodb_database));
    documents.ping().await.map_err(|e| {
        tracing::error!(error = %e, "MongoDB connection failed");
        e
    })?;
    documents.ensure_indexes().await?;
    tracing::info!(database = %settings.mongodb_database, "MongoDB connected");

    let state = AppState {
        customers: Arc::new(PgCustomerTable::new(pool)),
        documents: Arc::new(documents),
        auth: Arc::new(AuthConfig::new(settings.auth_token.clone())),
    };

    let listener = TcpListener::bind(settings.bind_addr).await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app(state)).await?;
    Ok(())
}
