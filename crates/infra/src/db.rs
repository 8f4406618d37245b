//! Database handle: connection pool lifecycle and schema bootstrap.
//!
//! The handle is an explicit value: acquire it once at startup with
//! [`Database::connect`], hand repositories out of it, and release it with
//! [`Database::close`] at shutdown.

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use crate::config::DatabaseConfig;
use crate::repository::PostgresProductRepository;

/// The `products` table. Column limits here are the authoritative length,
/// precision and sign constraints for a product.
pub const PRODUCTS_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS products (
    id          SERIAL PRIMARY KEY,
    name        VARCHAR(63) NOT NULL
                CONSTRAINT products_name_not_empty CHECK (name <> ''),
    description VARCHAR(256),
    price       NUMERIC(10, 2) NOT NULL
                CONSTRAINT products_price_non_negative CHECK (price >= 0)
)
"#;

#[derive(Debug, Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        info!("Connecting to database: {}", config.redacted_url());

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect(&config.url)
            .await?;

        Ok(Self { pool })
    }

    /// Wrap an already-built pool (tests, embedding applications).
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the `products` table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), sqlx::Error> {
        info!("Ensuring products table exists");
        sqlx::query(PRODUCTS_SCHEMA).execute(&self.pool).await?;
        Ok(())
    }

    pub fn products(&self) -> PostgresProductRepository {
        PostgresProductRepository::new(self.pool.clone())
    }

    /// Close every pooled connection; waits for checked-out connections to
    /// be returned first.
    pub async fn close(self) {
        info!("Closing database pool");
        self.pool.close().await;
    }
}
