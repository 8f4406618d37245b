//! Product catalog use cases (application-level orchestration).
//!
//! `ProductCatalog` is what the HTTP layer calls. It turns wire payloads into
//! products, drives the repository, and reports outcomes without any notion
//! of status codes:
//!
//! ```text
//! create(payload)      deserialize → repository.create
//! update(id, payload)  repository.find → apply_wire → repository.update
//! delete(id)           repository.find → repository.delete
//! get / list / find_by_name   straight repository reads
//! ```
//!
//! Absence is `Ok(None)` / `Ok(false)` / an empty `Vec`, never an error.

use serde_json::Value as JsonValue;
use thiserror::Error;
use tracing::{info, warn};

use catalog_products::{Product, ProductId, ValidationError};

use crate::repository::{ProductRepository, RepositoryError};

#[derive(Debug, Error)]
pub enum CatalogError {
    /// The payload was rejected before storage was touched.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The repository rejected or failed the operation.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl CatalogError {
    /// Whether the caller should be told its request was at fault, as
    /// opposed to the service failing.
    pub fn is_client_error(&self) -> bool {
        match self {
            CatalogError::Validation(_) => true,
            CatalogError::Repository(e) => e.is_client_fault(),
        }
    }
}

/// Product use cases on top of any `ProductRepository`.
#[derive(Debug, Clone)]
pub struct ProductCatalog<R> {
    repository: R,
}

impl<R> ProductCatalog<R>
where
    R: ProductRepository,
{
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub async fn create(&self, payload: &JsonValue) -> Result<Product, CatalogError> {
        info!("Request to Create a Product");
        let product = Product::deserialize(payload)?;
        let product = self.repository.create(product).await?;

        if let Some(id) = product.id_typed() {
            info!("Product with new ID: {} created.", id);
        }
        Ok(product)
    }

    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, CatalogError> {
        info!("Request to retrieve Product with id: {}", id);
        let found = self.repository.find(id).await?;
        if found.is_none() {
            warn!("Product with id: {} not found.", id);
        }
        Ok(found)
    }

    /// Full overwrite of an existing product from a payload.
    ///
    /// Returns `Ok(None)` when no product has this id, including when it
    /// disappears between the lookup and the write.
    pub async fn update(
        &self,
        id: ProductId,
        payload: &JsonValue,
    ) -> Result<Option<Product>, CatalogError> {
        info!("Request to update Product with id: {}", id);

        let Some(mut product) = self.repository.find(id).await? else {
            warn!("Product with id: {} not found.", id);
            return Ok(None);
        };

        product.apply_wire(payload)?;

        match self.repository.update(product).await {
            Ok(updated) => {
                info!("Product with id: {} updated.", id);
                Ok(Some(updated))
            }
            Err(RepositoryError::NotFound(_)) => {
                warn!("Product with id: {} removed before update.", id);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Delete by id. Returns whether a product existed.
    pub async fn delete(&self, id: ProductId) -> Result<bool, CatalogError> {
        info!("Request to delete Product with id: {}", id);

        let Some(product) = self.repository.find(id).await? else {
            warn!("Product with id: {} not found.", id);
            return Ok(false);
        };

        self.repository.delete(product).await?;
        info!("Product with ID: {} deleted.", id);
        Ok(true)
    }

    pub async fn list(&self) -> Result<Vec<Product>, CatalogError> {
        info!("Request for product list");
        let products = self.repository.all().await?;
        info!("Returning {} products", products.len());
        Ok(products)
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Vec<Product>, CatalogError> {
        info!("Request to retrieve Products with name: {}", name);
        let products = self.repository.find_by_name(name).await?;
        info!("Returning {} product(s)", products.len());
        Ok(products)
    }
}
