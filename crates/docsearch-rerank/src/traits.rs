use async_trait::async_trait;

use crate::error::ProviderError;
use crate::types::{RerankRequest, RerankResponse};

#[async_trait]
pub trait RerankProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Items come back most relevant first, each pointing at a position in
    /// `request.documents`.
    async fn rerank(&self, request: RerankRequest) -> Result<RerankResponse, ProviderError>;
}
