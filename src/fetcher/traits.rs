use crate::model::FetchError;

/// Anything that can produce the value-list HTML.
#[async_trait::async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch(&self) -> Result<String, FetchError>;
}
