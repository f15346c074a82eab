use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::MissingQueryPolicy;
use crate::error::SearchError;
use crate::server::AppState;

/// Largest accepted `/search` body.
pub const MAX_BODY_BYTES: usize = 256 * 1024;

#[derive(Debug, Default, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: Option<String>,
}

impl SearchRequest {
    /// The query if it is present and non-empty. No trimming: `" "` is a query.
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref().filter(|q| !q.is_empty())
    }
}

#[derive(Debug, Serialize)]
pub struct SearchResponse<T> {
    pub data: Vec<T>,
}

/// An absent or blank body is an empty request, anything else must be a JSON object.
pub fn parse_search_request(body: &[u8]) -> Result<SearchRequest, SearchError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(SearchRequest::default());
    }
    serde_json::from_slice(body).map_err(|e| SearchError::InvalidBody(e.to_string()))
}

pub async fn search(
    state: web::Data<AppState>,
    payload: web::Payload,
) -> Result<HttpResponse, SearchError> {
    let result = run_search(&state, payload).await;
    if let Err(err) = &result {
        err.log();
    }
    result
}

async fn read_body(payload: web::Payload) -> Result<web::Bytes, SearchError> {
    match payload.to_bytes_limited(MAX_BODY_BYTES).await {
        Ok(Ok(body)) => Ok(body),
        Ok(Err(err)) => Err(SearchError::InvalidBody(err.to_string())),
        Err(_) => Err(SearchError::BodyTooLarge {
            limit: MAX_BODY_BYTES,
        }),
    }
}

async fn run_search(
    state: &AppState,
    payload: web::Payload,
) -> Result<HttpResponse, SearchError> {
    let body = read_body(payload).await?;
    let request = parse_search_request(&body)?;

    if let Some(query) = request.query() {
        tracing::debug!(query_len = query.len(), "ranked search");
        let data = state.pipeline.ranked(query).await?;
        return Ok(HttpResponse::Ok().json(SearchResponse { data }));
    }

    match state.missing_query {
        MissingQueryPolicy::ListAll => {
            let data = state.pipeline.all_documents().await?;
            tracing::debug!(documents = data.len(), "listing all documents");
            Ok(HttpResponse::Ok().json(SearchResponse { data }))
        }
        MissingQueryPolicy::Reject => Err(SearchError::MissingQuery),
    }
}

pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "embed_provider": state.pipeline.embedder_name(),
        "rerank_provider": state.pipeline.reranker_name(),
    }))
}
