//! Postgres-backed product repository.
//!
//! ## Error Mapping
//!
//! SQLx errors are mapped to `RepositoryError` as follows:
//!
//! | SQLSTATE | Condition | RepositoryError |
//! |----------|-----------|-----------------|
//! | `22001` | string_data_right_truncation (name/description too long) | `DataValidation` |
//! | `22003` | numeric_value_out_of_range (price over 10 digits) | `DataValidation` |
//! | `22021` | character_not_in_repertoire (e.g. NUL byte in text) | `DataValidation` |
//! | `22P02` | invalid_text_representation | `DataValidation` |
//! | `23502` | not_null_violation | `DataValidation` |
//! | `23514` | check_violation (empty name, negative price) | `DataValidation` |
//! | any other / non-database error | connectivity, pool closed, protocol | `Database` (unmodified) |
//!
//! ## Transactions
//!
//! `create` and `update` first run the shared schema check, so a value that
//! `VARCHAR(n)` would silently trim (trailing spaces) is rejected instead.
//!
//! `create`, `update` and `delete` each run in their own transaction. On any
//! failure the transaction is rolled back explicitly before the error is
//! returned, so a rejected row never becomes visible.

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Postgres, Row, Transaction};
use tracing::{Span, debug, error, info, instrument, warn};

use catalog_products::{Price, Product, ProductId};

use super::{ProductRepository, RepositoryError, check_schema};

/// SQLSTATE codes caused by the row's data rather than the engine.
const DATA_VIOLATION_CODES: &[&str] = &["22001", "22003", "22021", "22P02", "23502", "23514"];

const SELECT_ALL: &str = "SELECT id, name, description, price FROM products ORDER BY id ASC";
const SELECT_BY_ID: &str = "SELECT id, name, description, price FROM products WHERE id = $1";
const SELECT_BY_NAME: &str =
    "SELECT id, name, description, price FROM products WHERE name = $1 ORDER BY id ASC";

/// Postgres-backed product repository.
///
/// Uses the SQLx connection pool (thread-safe, `Send + Sync`); cloning the
/// repository shares the pool.
#[derive(Debug, Clone)]
pub struct PostgresProductRepository {
    pool: Arc<PgPool>,
}

impl PostgresProductRepository {
    /// Create a new repository on top of an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    async fn begin(&self, operation: &str) -> Result<Transaction<'_, Postgres>, RepositoryError> {
        self.pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error(operation, e))
    }
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    #[instrument(
        skip(self, product),
        fields(name = %product.name(), product_id = tracing::field::Empty),
        err
    )]
    async fn create(&self, product: Product) -> Result<Product, RepositoryError> {
        info!("Creating {}", product.name());
        if let Some(ignored) = product.id_typed() {
            debug!(ignored_id = %ignored, "create ignores caller-supplied id");
        }

        if let Err(e) = check_schema(&product) {
            error!("Error creating record: {}", product);
            return Err(e);
        }

        let mut tx = self.begin("create").await?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO products (name, description, price)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(product.name())
        .bind(product.description())
        .bind(product.price().as_decimal())
        .fetch_one(&mut *tx)
        .await
        .and_then(|row| row.try_get::<i32, _>("id"));

        let id = match inserted {
            Ok(id) => ProductId::new(id),
            Err(e) => {
                rollback(tx, "create").await;
                error!("Error creating record: {}", product);
                return Err(map_sqlx_error("insert_product", e));
            }
        };

        commit(tx, "create").await.inspect_err(|_| {
            error!("Error creating record: {}", product);
        })?;

        Span::current().record("product_id", id.get());
        Ok(product.persisted_as(id))
    }

    #[instrument(skip(self, product), fields(product_id = ?product.id_typed()), err)]
    async fn update(&self, product: Product) -> Result<Product, RepositoryError> {
        let Some(id) = product.id_typed() else {
            return Err(RepositoryError::data_validation(
                "update called with empty id field",
            ));
        };
        info!("Saving {}", product.name());

        if let Err(e) = check_schema(&product) {
            error!("Error updating record: {}", product);
            return Err(e);
        }

        let mut tx = self.begin("update").await?;

        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = $1, description = $2, price = $3
            WHERE id = $4
            "#,
        )
        .bind(product.name())
        .bind(product.description())
        .bind(product.price().as_decimal())
        .bind(id.get())
        .execute(&mut *tx)
        .await;

        match result {
            Ok(done) if done.rows_affected() == 0 => {
                rollback(tx, "update").await;
                return Err(RepositoryError::NotFound(id));
            }
            Ok(_) => {}
            Err(e) => {
                rollback(tx, "update").await;
                error!("Error updating record: {}", product);
                return Err(map_sqlx_error("update_product", e));
            }
        }

        commit(tx, "update").await.inspect_err(|_| {
            error!("Error updating record: {}", product);
        })?;

        Ok(product)
    }

    #[instrument(skip(self, product), fields(product_id = ?product.id_typed()), err)]
    async fn delete(&self, product: Product) -> Result<(), RepositoryError> {
        info!("Deleting {}", product.name());

        let Some(id) = product.id_typed() else {
            debug!("delete of transient product is a no-op");
            return Ok(());
        };

        let mut tx = self.begin("delete").await?;

        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.get())
            .execute(&mut *tx)
            .await;

        if let Err(e) = result {
            rollback(tx, "delete").await;
            error!("Error deleting record: {}", product);
            return Err(map_sqlx_error("delete_product", e));
        }

        commit(tx, "delete").await.inspect_err(|_| {
            error!("Error deleting record: {}", product);
        })
    }

    #[instrument(skip(self), err)]
    async fn all(&self) -> Result<Vec<Product>, RepositoryError> {
        info!("Processing all Products");

        let rows = sqlx::query(SELECT_ALL)
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("all_products", e))?;

        rows_to_products(&rows)
    }

    #[instrument(skip(self), fields(product_id = %id), err)]
    async fn find(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        info!("Processing lookup for id {} ...", id);

        let row = sqlx::query(SELECT_BY_ID)
            .bind(id.get())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_product", e))?;

        row.as_ref().map(row_to_product).transpose()
    }

    #[instrument(skip(self), err)]
    async fn find_by_name(&self, name: &str) -> Result<Vec<Product>, RepositoryError> {
        info!("Processing name query for {} ...", name);

        let rows = sqlx::query(SELECT_BY_NAME)
            .bind(name)
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_products_by_name", e))?;

        rows_to_products(&rows)
    }
}

async fn commit(tx: Transaction<'_, Postgres>, operation: &str) -> Result<(), RepositoryError> {
    tx.commit()
        .await
        .map_err(|e| map_sqlx_error(&format!("{operation}: commit_transaction"), e))
}

/// Roll back, logging (not returning) a rollback failure so the original
/// error reaches the caller.
async fn rollback(tx: Transaction<'_, Postgres>, operation: &str) {
    if let Err(e) = tx.rollback().await {
        warn!(operation, error = %e, "rollback failed");
    }
}

/// Map SQLx errors to `RepositoryError`.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().is_some_and(|code| is_data_violation(&code)) {
            return RepositoryError::DataValidation(db_err.message().to_string());
        }
    }

    error!(operation, error = %err, "storage engine failure");
    RepositoryError::Database(err)
}

fn is_data_violation(code: &str) -> bool {
    DATA_VIOLATION_CODES.contains(&code)
}

// SQLx row types

#[derive(Debug)]
struct ProductRow {
    id: i32,
    name: String,
    description: Option<String>,
    price: Decimal,
}

impl<'r> FromRow<'r, PgRow> for ProductRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(ProductRow {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            price: row.try_get("price")?,
        })
    }
}

impl ProductRow {
    fn into_product(self) -> Result<Product, RepositoryError> {
        let price = Price::new(self.price)
            .map_err(|e| RepositoryError::Storage(format!("row {}: {}", self.id, e)))?;
        Ok(Product::with_id(
            ProductId::new(self.id),
            self.name,
            self.description,
            price,
        ))
    }
}

fn row_to_product(row: &PgRow) -> Result<Product, RepositoryError> {
    let row = ProductRow::from_row(row).map_err(|e| map_sqlx_error("decode_product_row", e))?;
    row.into_product()
}

fn rows_to_products(rows: &[PgRow]) -> Result<Vec<Product>, RepositoryError> {
    rows.iter().map(row_to_product).collect()
}
