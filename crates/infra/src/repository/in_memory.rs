use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use tracing::{debug, error, info};

use catalog_products::{Product, ProductId};

use super::{ProductRepository, RepositoryError, check_schema};

#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<ProductId, Product>,
    /// Last id handed out. Never rewound, so deleted ids are not reused.
    last_id: i32,
}

/// In-memory product store for tests/dev.
///
/// Applies the same schema checks as the `products` table and reports them
/// with the same messages, so callers see identical failure behavior.
#[derive(Debug, Default)]
pub struct InMemoryProductRepository {
    table: RwLock<Table>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> RepositoryError {
        RepositoryError::Storage("lock poisoned".to_string())
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, product: Product) -> Result<Product, RepositoryError> {
        info!("Creating {}", product.name());

        if let Err(e) = check_schema(&product) {
            error!("Error creating record: {}", product);
            return Err(e);
        }

        let mut table = self.table.write().map_err(|_| Self::poisoned())?;
        let next = table
            .last_id
            .checked_add(1)
            .ok_or_else(|| RepositoryError::Storage("id sequence exhausted".to_string()))?;
        table.last_id = next;

        let id = ProductId::new(next);
        let stored = product.persisted_as(id);
        table.rows.insert(id, stored.clone());
        Ok(stored)
    }

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

        let mut table = self.table.write().map_err(|_| Self::poisoned())?;
        match table.rows.get_mut(&id) {
            Some(row) => {
                *row = product.clone();
                Ok(product)
            }
            None => Err(RepositoryError::NotFound(id)),
        }
    }

    async fn delete(&self, product: Product) -> Result<(), RepositoryError> {
        info!("Deleting {}", product.name());

        let Some(id) = product.id_typed() else {
            debug!("delete of transient product is a no-op");
            return Ok(());
        };

        let mut table = self.table.write().map_err(|_| Self::poisoned())?;
        table.rows.remove(&id);
        Ok(())
    }

    async fn all(&self) -> Result<Vec<Product>, RepositoryError> {
        info!("Processing all Products");
        let table = self.table.read().map_err(|_| Self::poisoned())?;
        Ok(table.rows.values().cloned().collect())
    }

    async fn find(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        info!("Processing lookup for id {} ...", id);
        let table = self.table.read().map_err(|_| Self::poisoned())?;
        Ok(table.rows.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Vec<Product>, RepositoryError> {
        info!("Processing name query for {} ...", name);
        let table = self.table.read().map_err(|_| Self::poisoned())?;
        Ok(table
            .rows
            .values()
            .filter(|p| p.name() == name)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_products::Price;

    fn product(name: &str) -> Product {
        Product::new(name, Some("a product".to_string()), Price::from_cents(1250))
    }

    #[tokio::test]
    async fn create_assigns_increasing_ids() {
        let repo = InMemoryProductRepository::new();
        let a = repo.create(product("a")).await.unwrap();
        let b = repo.create(product("b")).await.unwrap();

        assert_eq!(a.id_typed(), Some(ProductId::new(1)));
        assert_eq!(b.id_typed(), Some(ProductId::new(2)));
    }

    #[tokio::test]
    async fn create_ignores_caller_supplied_id() {
        let repo = InMemoryProductRepository::new();
        let stored = repo
            .create(product("a").persisted_as(ProductId::new(99)))
            .await
            .unwrap();
        assert_eq!(stored.id_typed(), Some(ProductId::new(1)));
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let repo = InMemoryProductRepository::new();
        let a = repo.create(product("a")).await.unwrap();
        repo.delete(a).await.unwrap();

        let b = repo.create(product("b")).await.unwrap();
        assert_eq!(b.id_typed(), Some(ProductId::new(2)));
    }

    #[tokio::test]
    async fn create_rejects_schema_violation_without_writing() {
        let repo = InMemoryProductRepository::new();
        let err = repo.create(product(&"x".repeat(100))).await.unwrap_err();

        match err {
            RepositoryError::DataValidation(msg) => assert!(msg.contains("value too long")),
            other => panic!("Expected DataValidation, got {other:?}"),
        }
        assert!(repo.all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_rejects_every_column_limit_without_writing() {
        let repo = InMemoryProductRepository::new();

        let padded_name = format!("{}{}", "x".repeat(63), "   ");
        let overlong_description = Product::new("a", Some("d".repeat(257)), Price::ZERO);
        let overflowing_price =
            Product::new("a", None, Price::parse("123456789").unwrap());
        let nul_name = Product::new("a\0b", None, Price::ZERO);

        for (rejected, expected) in [
            (product(&padded_name), "character varying(63)"),
            (overlong_description, "character varying(256)"),
            (overflowing_price, "numeric field overflow"),
            (nul_name, "0x00"),
        ] {
            match repo.create(rejected).await.unwrap_err() {
                RepositoryError::DataValidation(msg) => assert!(msg.contains(expected), "{msg}"),
                other => panic!("Expected DataValidation, got {other:?}"),
            }
        }
        assert!(repo.all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_rejects_padded_name_and_keeps_row() {
        let repo = InMemoryProductRepository::new();
        let stored = repo.create(product("a")).await.unwrap();
        let id = stored.id_typed().unwrap();

        let mut padded = stored.clone();
        padded.set_name(format!("{}{}", "x".repeat(60), " ".repeat(10)));
        assert!(matches!(
            repo.update(padded).await,
            Err(RepositoryError::DataValidation(_))
        ));
        assert_eq!(repo.find(id).await.unwrap(), Some(stored));
    }

    #[tokio::test]
    async fn update_requires_id() {
        let repo = InMemoryProductRepository::new();
        let err = repo.update(product("a")).await.unwrap_err();
        match err {
            RepositoryError::DataValidation(msg) => assert!(msg.contains("empty id")),
            other => panic!("Expected DataValidation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn update_of_missing_row_is_not_found() {
        let repo = InMemoryProductRepository::new();
        let err = repo
            .update(product("a").persisted_as(ProductId::new(5)))
            .await
            .unwrap_err();
        match err {
            RepositoryError::NotFound(id) => assert_eq!(id, ProductId::new(5)),
            other => panic!("Expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn failed_update_keeps_previous_row() {
        let repo = InMemoryProductRepository::new();
        let mut stored = repo.create(product("a")).await.unwrap();
        let id = stored.id_typed().unwrap();

        stored.set_name("x".repeat(100));
        assert!(repo.update(stored).await.is_err());

        let found = repo.find(id).await.unwrap().unwrap();
        assert_eq!(found.name(), "a");
    }

    #[tokio::test]
    async fn delete_of_transient_product_is_noop() {
        let repo = InMemoryProductRepository::new();
        repo.create(product("a")).await.unwrap();
        repo.delete(product("a")).await.unwrap();
        assert_eq!(repo.all().await.unwrap().len(), 1);
    }
}
