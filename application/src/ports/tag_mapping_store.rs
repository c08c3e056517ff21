//! Tag mapping store port
//!
//! The fun-answer → weighted-tag table is loaded lazily and cached by the
//! adapter. Callers that know the source changed call [`TagMappingStore::invalidate`];
//! nothing else clears the cache.

use super::restaurant_catalog::CatalogError;
use async_trait::async_trait;
use std::sync::Arc;
use tablepick_domain::TagMapping;

#[async_trait]
pub trait TagMappingStore: Send + Sync {
    /// Current mapping, loading it on first use
    async fn mapping(&self) -> Result<Arc<TagMapping>, CatalogError>;

    /// Drop any cached mapping so the next call reloads it
    fn invalidate(&self);
}

/// Fixed in-memory mapping; `invalidate` is a no-op
pub struct StaticTagMappings {
    mapping: Arc<TagMapping>,
}

impl StaticTagMappings {
    pub fn new(mapping: TagMapping) -> Self {
        Self {
            mapping: Arc::new(mapping),
        }
    }
}

impl Default for StaticTagMappings {
    fn default() -> Self {
        Self::new(TagMapping::new())
    }
}

#[async_trait]
impl TagMappingStore for StaticTagMappings {
    async fn mapping(&self) -> Result<Arc<TagMapping>, CatalogError> {
        Ok(Arc::clone(&self.mapping))
    }

    fn invalidate(&self) {}
}
