//! Infrastructure layer: product persistence, database handle, config.

pub mod catalog;
pub mod config;
pub mod db;
pub mod repository;


pub use catalog::{CatalogError, ProductCatalog};
pub use config::{ConfigError, DatabaseConfig};
pub use db::Database;
pub use repository::{
    InMemoryProductRepository, PostgresProductRepository, ProductRepository, RepositoryError,
};
