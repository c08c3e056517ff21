//! Restaurant catalog port
//!
//! Read-only supplier of restaurant records. Adapters normalize whatever
//! shape their source uses into [`Restaurant`] values.

use async_trait::async_trait;
use tablepick_domain::Restaurant;
use thiserror::Error;

/// Errors raised by catalog adapters (restaurants, questions, tag mappings)
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog not found: {0}")]
    NotFound(String),

    #[error("Failed to read catalog: {0}")]
    Io(String),

    #[error("Malformed catalog: {0}")]
    Malformed(String),
}

#[async_trait]
pub trait RestaurantCatalog: Send + Sync {
    /// All restaurants, in catalog order
    ///
    /// Order matters: equal scores keep it.
    async fn restaurants(&self) -> Result<Vec<Restaurant>, CatalogError>;
}
