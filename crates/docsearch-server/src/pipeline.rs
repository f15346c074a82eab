//! The query pipeline: embed the query, fetch similar documents, rerank them.
//!
//! Each step is a single awaited call against an external service. Nothing is retried and
//! nothing runs in parallel; the first failure ends the request.

use std::sync::Arc;

use docsearch_embed::{EmbeddingProvider, EmbeddingRequest, EmbeddingTask};
use docsearch_rerank::{RerankProvider, RerankRequest};
use docsearch_store::{Document, DocumentStore, MatchQuery, VectorStore};
use serde::Serialize;

use crate::error::SearchError;

pub const MATCH_THRESHOLD: f32 = 0.3;
pub const MATCH_COUNT: usize = 10;
pub const RERANK_TOP_N: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineSettings {
    pub match_threshold: f32,
    pub match_count: usize,
    pub rerank_top_n: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            match_threshold: MATCH_THRESHOLD,
            match_count: MATCH_COUNT,
            rerank_top_n: RERANK_TOP_N,
        }
    }
}

/// One reranked hit, in the order the rerank service returned it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedDocument {
    pub title: String,
    pub content: String,
    pub relevance_score: f64,
}

struct Candidate {
    index: usize,
    title: String,
    content: String,
}

#[derive(Clone)]
pub struct SearchPipeline {
    embedder: Arc<dyn EmbeddingProvider>,
    vectors: Arc<dyn VectorStore>,
    documents: Arc<dyn DocumentStore>,
    reranker: Arc<dyn RerankProvider>,
    settings: PipelineSettings,
}

impl SearchPipeline {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        vectors: Arc<dyn VectorStore>,
        documents: Arc<dyn DocumentStore>,
        reranker: Arc<dyn RerankProvider>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            embedder,
            vectors,
            documents,
            reranker,
            settings,
        }
    }

    pub fn embedder_name(&self) -> &'static str {
        self.embedder.name()
    }

    pub fn reranker_name(&self) -> &'static str {
        self.reranker.name()
    }

    /// Every stored document, unfiltered.
    pub async fn all_documents(&self) -> Result<Vec<Document>, SearchError> {
        self.documents
            .list_documents()
            .await
            .map_err(SearchError::DocumentList)
    }

    /// Runs the ranked path for a non-empty query. The text is used exactly as given.
    pub async fn ranked(&self, query: &str) -> Result<Vec<RankedDocument>, SearchError> {
        let embedding = self
            .embedder
            .embed(EmbeddingRequest::single(query).with_task(EmbeddingTask::Query))
            .await
            .and_then(docsearch_embed::EmbeddingResponse::into_single)
            .map_err(SearchError::Embedding)?;

        let matches = self
            .vectors
            .match_documents(MatchQuery {
                embedding,
                threshold: self.settings.match_threshold,
                limit: self.settings.match_count,
            })
            .await
            .map_err(SearchError::VectorSearch)?;

        if matches.is_empty() {
            tracing::debug!("no documents above the similarity threshold");
            return Ok(Vec::new());
        }

        let candidates: Vec<Candidate> = matches
            .into_iter()
            .enumerate()
            .map(|(index, doc)| Candidate {
                index,
                title: doc.title,
                content: doc.content,
            })
            .collect();

        let request = RerankRequest::new(
            query,
            candidates.iter().map(|c| c.content.clone()).collect(),
        )
        .top_n(self.settings.rerank_top_n);
        let reranked = self
            .reranker
            .rerank(request)
            .await
            .map_err(SearchError::Rerank)?;

        tracing::debug!(
            embed_model = self.embedder.model(),
            rerank_model = %reranked.model,
            candidates = candidates.len(),
            returned = reranked.items.len(),
            "rerank finished"
        );

        reranked
            .items
            .into_iter()
            .take(self.settings.rerank_top_n)
            .map(|item| {
                let candidate = candidates
                    .iter()
                    .find(|c| c.index == item.index)
                    .ok_or_else(|| {
                        SearchError::MalformedUpstream(format!(
                            "{} referenced candidate {} of {}",
                            reranked.provider,
                            item.index,
                            candidates.len()
                        ))
                    })?;
                Ok(RankedDocument {
                    title: candidate.title.clone(),
                    content: candidate.content.clone(),
                    relevance_score: item.score,
                })
            })
            .collect()
    }
}
