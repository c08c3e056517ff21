//! File-backed tag mapping store
//!
//! The file maps fun-answer labels to restaurant tags. A tag may be a plain
//! string (weight 1.0) or `{"tag": ..., "weight": ...}`:
//!
//! ```json
//! {
//!   "Cozy": ["warm", {"tag": "quiet", "weight": 0.5}],
//!   "Lively": ["late night", "music"]
//! }
//! ```
//!
//! The parsed table is cached after the first load. [`TagMappingStore::invalidate`]
//! drops the cache; nothing else does.

use super::error::{CatalogLoadError, read_json};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use tablepick_application::{CatalogError, StaticTagMappings, TagMappingStore};
use tablepick_domain::TagMapping;
use tablepick_domain::scoring::WeightedTag;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTag {
    Name(String),
    Weighted(WeightedTag),
}

impl From<RawTag> for WeightedTag {
    fn from(raw: RawTag) -> Self {
        match raw {
            RawTag::Name(tag) => WeightedTag::new(tag, 1.0),
            RawTag::Weighted(tag) => tag,
        }
    }
}

pub struct FileTagMappingStore {
    path: PathBuf,
    cache: RwLock<Option<Arc<TagMapping>>>,
}

impl FileTagMappingStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: RwLock::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn cached(&self) -> Option<Arc<TagMapping>> {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(Arc::clone)
    }

    pub async fn load(&self) -> Result<TagMapping, CatalogLoadError> {
        let document = read_json(&self.path).await?;
        let raw: HashMap<String, Vec<RawTag>> =
            serde_json::from_value(document).map_err(|source| CatalogLoadError::Json {
                path: self.path.clone(),
                source,
            })?;

        let mut mapping = TagMapping::new();
        for (label, tags) in raw {
            mapping.insert(&label, tags.into_iter().map(WeightedTag::from));
        }
        Ok(mapping)
    }
}

#[async_trait]
impl TagMappingStore for FileTagMappingStore {
    async fn mapping(&self) -> Result<Arc<TagMapping>, CatalogError> {
        if let Some(mapping) = self.cached() {
            return Ok(mapping);
        }

        let mapping = Arc::new(self.load().await?);
        info!(
            "Loaded {} tag mappings from {}",
            mapping.len(),
            self.path.display()
        );
        *self.cache.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&mapping));
        Ok(mapping)
    }

    fn invalidate(&self) {
        debug!("Invalidating tag mapping cache for {}", self.path.display());
        *self.cache.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

/// Tag mappings from the configured file, or an empty table when none is set
pub enum ConfiguredTagMappings {
    File(FileTagMappingStore),
    Empty(StaticTagMappings),
}

impl ConfiguredTagMappings {
    pub fn from_path(path: Option<PathBuf>) -> Self {
        match path {
            Some(path) => Self::File(FileTagMappingStore::new(path)),
            None => Self::Empty(StaticTagMappings::default()),
        }
    }
}

#[async_trait]
impl TagMappingStore for ConfiguredTagMappings {
    async fn mapping(&self) -> Result<Arc<TagMapping>, CatalogError> {
        match self {
            Self::File(store) => store.mapping().await,
            Self::Empty(store) => store.mapping().await,
        }
    }

    fn invalidate(&self) {
        match self {
            Self::File(store) => store.invalidate(),
            Self::Empty(store) => store.invalidate(),
        }
    }
}
