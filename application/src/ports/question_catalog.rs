//! Question catalog port

use super::restaurant_catalog::CatalogError;
use async_trait::async_trait;
use tablepick_domain::Questionnaire;

/// Supplies the ordered questionnaire, optionally filtered by a mode tag
#[async_trait]
pub trait QuestionCatalog: Send + Sync {
    async fn questionnaire(&self, mode: Option<&str>) -> Result<Questionnaire, CatalogError>;
}
