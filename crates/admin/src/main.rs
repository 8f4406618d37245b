use anyhow::Context;

use catalog_infra::{Database, DatabaseConfig, ProductRepository};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    catalog_observability::init();

    let config = DatabaseConfig::from_env().context("invalid database configuration")?;
    let db = Database::connect(&config)
        .await
        .with_context(|| format!("failed to connect to {}", config.redacted_url()))?;

    db.ensure_schema()
        .await
        .context("failed to create products table")?;

    let products = db.products().all().await;
    db.close().await;

    let products = products.context("failed to list products")?;
    tracing::info!(count = products.len(), "products table ready");
    Ok(())
}
