use async_trait::async_trait;

use crate::error::StoreError;
use crate::types::{Document, MatchQuery};

#[async_trait]
pub trait VectorStore: Send + Sync {
    fn name(&self) -> &'static str;

    /// Records at or above `query.threshold`, most similar first, at most `query.limit`.
    async fn match_documents(&self, query: MatchQuery) -> Result<Vec<Document>, StoreError>;
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    fn name(&self) -> &'static str;

    async fn list_documents(&self) -> Result<Vec<Document>, StoreError>;
}
