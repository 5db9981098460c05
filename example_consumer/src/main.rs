//! Example consumer: serves an `/items` resource backed by PostgreSQL when
//! `DATABASE_URL` is set, otherwise by an in-memory store.
//!
//! Run from repo root: `cargo run -p example-consumer`

use crud_router::{
    common_routes, ColumnSpec, MemoryStore, PgStore, ResourceConfig, ResourceSet, Settings, Storage, TableSpec,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Item {
    id: i64,
    name: String,
}

/// Create and update payload: everything but the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ItemCreate {
    name: String,
}

fn items<M: Storage>(model: Arc<M>, settings: &Settings) -> Result<ResourceConfig<M, Item, ItemCreate, ItemCreate>, crud_router::ConfigError> {
    ResourceConfig::builder()
        .model(model)
        .prefix("/items")
        .tag("Items")
        .page_size(settings.page_size)
        .body_limit(settings.body_limit)
        .build()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("crud_router=info,example_consumer=info")),
        )
        .init();

    let settings = Settings::from_env()?;

    let resources = match &settings.database_url {
        Some(url) => {
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(5)
                .connect(url)
                .await?;
            let table = TableSpec::new(settings.db_schema.clone(), "items").column(ColumnSpec::text("name"));
            let store = PgStore::new(pool, table);
            store.ensure_table().await?;
            ResourceSet::new().mount(items(Arc::new(store), &settings)?)?
        }
        None => {
            tracing::info!("DATABASE_URL not set, serving items from memory");
            ResourceSet::new().mount(items(Arc::new(MemoryStore::new()), &settings)?)?
        }
    };

    let app = common_routes().merge(resources.into_router());
    let listener = TcpListener::bind(&settings.bind_addr).await?;
    tracing::info!("Example consumer listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
