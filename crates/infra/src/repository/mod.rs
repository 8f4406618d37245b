//! Product persistence.
//!
//! The `ProductRepository` is the only component that talks to the storage
//! engine. Every call runs as its own unit of work: a mutating call either
//! commits completely or leaves storage exactly as it found it.
//!
//! ## Error Semantics
//!
//! - **Constraint violations** (value too long, numeric overflow, check or
//!   not-null violations) → `RepositoryError::DataValidation`, carrying the
//!   engine's message
//! - **Update of a row that does not exist** → `RepositoryError::NotFound`
//! - **Anything else from the engine** (connectivity, pool closed, corrupt
//!   rows) → `RepositoryError::Database` / `RepositoryError::Storage`, fatal
//!   for that call and never retried here
//! - **Absence on lookup** is not an error: `find` returns `Ok(None)` and the
//!   list queries return an empty `Vec`

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use catalog_products::{Product, ProductId};

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryProductRepository;
pub use postgres::PostgresProductRepository;

/// Repository operation error.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A storage constraint rejected the row, or the call broke a precondition
    /// (updating a product that was never persisted).
    #[error("data validation error: {0}")]
    DataValidation(String),

    /// `update` targeted an id with no row behind it.
    #[error("product {0} not found")]
    NotFound(ProductId),

    /// Engine failure unrelated to the data itself.
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),

    /// Failure of a non-SQL engine (e.g. poisoned lock in the in-memory store).
    #[error("storage failure: {0}")]
    Storage(String),
}

impl RepositoryError {
    pub fn data_validation(msg: impl Into<String>) -> Self {
        Self::DataValidation(msg.into())
    }

    /// Whether the failure was caused by the caller's data rather than the engine.
    pub fn is_client_fault(&self) -> bool {
        matches!(self, Self::DataValidation(_) | Self::NotFound(_))
    }
}

/// Reject a row the `products` table would refuse, before any engine work.
///
/// Postgres truncates an over-long `VARCHAR` value without error when the
/// excess is all spaces; this check catches those too.
pub(crate) fn check_schema(product: &Product) -> Result<(), RepositoryError> {
    let violations = product.violations();
    if violations.is_empty() {
        Ok(())
    } else {
        Err(RepositoryError::data_validation(violations.join("; ")))
    }
}

/// CRUD plus name lookup for products.
///
/// `create`, `update` and `delete` take the product by value: `create` and
/// `update` hand back the durable instance, `delete` consumes it so the
/// stale copy cannot be reused.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Insert a new row. Storage assigns the id; any id already on the
    /// product is ignored.
    async fn create(&self, product: Product) -> Result<Product, RepositoryError>;

    /// Overwrite every column of an existing row with the product's values.
    async fn update(&self, product: Product) -> Result<Product, RepositoryError>;

    /// Remove the product's row. Idempotent: a missing row is not an error.
    async fn delete(&self, product: Product) -> Result<(), RepositoryError>;

    /// Every product, ordered by id.
    async fn all(&self) -> Result<Vec<Product>, RepositoryError>;

    /// Point lookup by primary key.
    async fn find(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;

    /// Exact, case-sensitive name match, ordered by id.
    async fn find_by_name(&self, name: &str) -> Result<Vec<Product>, RepositoryError>;
}

#[async_trait]
impl<R> ProductRepository for Arc<R>
where
    R: ProductRepository + ?Sized,
{
    async fn create(&self, product: Product) -> Result<Product, RepositoryError> {
        (**self).create(product).await
    }

    async fn update(&self, product: Product) -> Result<Product, RepositoryError> {
        (**self).update(product).await
    }

    async fn delete(&self, product: Product) -> Result<(), RepositoryError> {
        (**self).delete(product).await
    }

    async fn all(&self) -> Result<Vec<Product>, RepositoryError> {
        (**self).all().await
    }

    async fn find(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        (**self).find(id).await
    }

    async fn find_by_name(&self, name: &str) -> Result<Vec<Product>, RepositoryError> {
        (**self).find_by_name(name).await
    }
}
