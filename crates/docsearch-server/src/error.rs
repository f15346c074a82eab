use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use docsearch_embed::ProviderError as EmbeddingProviderError;
use docsearch_rerank::ProviderError as RerankProviderError;
use docsearch_store::StoreError;
use serde::Serialize;
use thiserror::Error;

/// Failures of a single search request.
///
/// `Display` carries the upstream detail for the log. Callers only ever see
/// [`SearchError::public_message`].
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("request carries no query")]
    MissingQuery,

    #[error("invalid request body: {0}")]
    InvalidBody(String),

    #[error("request body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },

    #[error("embedding request failed: {0}")]
    Embedding(#[source] EmbeddingProviderError),

    #[error("vector search failed: {0}")]
    VectorSearch(#[source] StoreError),

    #[error("document listing failed: {0}")]
    DocumentList(#[source] StoreError),

    #[error("rerank request failed: {0}")]
    Rerank(#[source] RerankProviderError),

    #[error("malformed upstream response: {0}")]
    MalformedUpstream(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl SearchError {
    pub const fn public_message(&self) -> &'static str {
        match self {
            Self::MissingQuery => "query is required: send a JSON body like {\"query\": \"...\"}",
            Self::InvalidBody(_) => "invalid request body",
            Self::BodyTooLarge { .. } => "request body too large",
            Self::VectorSearch(_) => "failed to search documents",
            Self::DocumentList(_) => "failed to fetch documents",
            Self::Embedding(_) | Self::Rerank(_) | Self::MalformedUpstream(_) => {
                "internal server error"
            }
        }
    }

    pub(crate) fn log(&self) {
        match self {
            Self::MissingQuery | Self::InvalidBody(_) | Self::BodyTooLarge { .. } => {
                tracing::warn!(error = %self, "rejected search request");
            }
            _ => tracing::error!(error = %self, "search request failed"),
        }
    }
}

impl ResponseError for SearchError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingQuery | Self::InvalidBody(_) => StatusCode::BAD_REQUEST,
            Self::BodyTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.public_message().to_string(),
        })
    }
}
