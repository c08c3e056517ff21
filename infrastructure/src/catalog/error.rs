//! Errors raised while reading catalog files

use std::path::PathBuf;
use tablepick_application::CatalogError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogLoadError {
    #[error("{} does not exist", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unexpected layout in {}: {reason}", .path.display())]
    Layout { path: PathBuf, reason: String },
}

impl CatalogLoadError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            CatalogLoadError::NotFound(path.to_path_buf())
        } else {
            CatalogLoadError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

impl From<CatalogLoadError> for CatalogError {
    fn from(error: CatalogLoadError) -> Self {
        match &error {
            CatalogLoadError::NotFound(path) => CatalogError::NotFound(path.display().to_string()),
            CatalogLoadError::Io { .. } => CatalogError::Io(error.to_string()),
            CatalogLoadError::Json { .. } | CatalogLoadError::Layout { .. } => {
                CatalogError::Malformed(error.to_string())
            }
        }
    }
}

/// Read and parse a JSON file
pub(crate) async fn read_json(path: &std::path::Path) -> Result<serde_json::Value, CatalogLoadError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| CatalogLoadError::io(path, e))?;
    serde_json::from_str(&text).map_err(|source| CatalogLoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_maps_to_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_json(&dir.path().join("absent.json")).await.unwrap_err();
        assert!(matches!(err, CatalogLoadError::NotFound(_)));
        assert!(matches!(CatalogError::from(err), CatalogError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_bad_json_maps_to_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = read_json(&path).await.unwrap_err();
        assert!(matches!(err, CatalogLoadError::Json { .. }));
        assert!(matches!(CatalogError::from(err), CatalogError::Malformed(_)));
    }
}
