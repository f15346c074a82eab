use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::{CohereRerankConfig, http_client};
use crate::error::ProviderError;
use crate::traits::RerankProvider;
use crate::types::{RerankItem, RerankRequest, RerankResponse};

#[derive(Clone)]
pub struct CohereRerankProvider {
    config: CohereRerankConfig,
    client: Client,
}

impl CohereRerankProvider {
    pub fn new(config: CohereRerankConfig) -> Result<Self, ProviderError> {
        if config.api_key.trim().is_empty() {
            return Err(ProviderError::Config("cohere api key is empty".to_string()));
        }
        let client = http_client(config.timeout)?;
        Ok(Self { config, client })
    }
}

#[async_trait::async_trait]
impl RerankProvider for CohereRerankProvider {
    fn name(&self) -> &'static str {
        "cohere"
    }

    async fn rerank(&self, request: RerankRequest) -> Result<RerankResponse, ProviderError> {
        if request.documents.is_empty() {
            return Err(ProviderError::Config(
                "rerank documents is empty".to_string(),
            ));
        }

        let payload = CohereRerankPayload {
            model: &self.config.model,
            query: &request.query,
            documents: &request.documents,
            top_n: request.top_n.unwrap_or(10),
            return_documents: false,
        };

        tracing::debug!(
            provider = self.name(),
            model = %self.config.model,
            documents = request.documents.len(),
            top_n = payload.top_n,
            "requesting rerank"
        );

        let res = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            return Err(ProviderError::Api { status, body });
        }

        let parsed: CohereRerankResponse = res.json().await?;
        let items = parsed
            .results
            .into_iter()
            .map(|it| RerankItem {
                index: it.index,
                score: it.score,
            })
            .collect();

        Ok(RerankResponse {
            provider: self.name().to_string(),
            model: self.config.model.clone(),
            items,
        })
    }
}

#[derive(Debug, Serialize)]
struct CohereRerankPayload<'a> {
    model: &'a str,
    query: &'a str,
    documents: &'a [String],
    top_n: usize,
    return_documents: bool,
}

#[derive(Debug, Deserialize)]
struct CohereRerankResponse {
    results: Vec<CohereRerankItem>,
}

#[derive(Debug, Deserialize)]
struct CohereRerankItem {
    index: usize,
    #[serde(alias = "relevance_score", alias = "score")]
    score: f64,
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn provider_for(server: &MockServer) -> CohereRerankProvider {
        let mut cfg = CohereRerankConfig::new("co-key");
        cfg.endpoint = format!("{}/v2/rerank", server.uri());
        CohereRerankProvider::new(cfg).expect("build provider")
    }

    #[test]
    fn cohere_response_score_aliases_parse() {
        let v1 = r#"{"results":[{"index":1,"relevance_score":0.91}]}"#;
        let p1: CohereRerankResponse = serde_json::from_str(v1).expect("parse cohere v1");
        let first = p1.results.first().expect("one result");
        assert_eq!(first.index, 1);
        assert!((first.score - 0.91).abs() < 1e-6);

        let v2 = r#"{"results":[{"index":0,"score":0.77}]}"#;
        let p2: CohereRerankResponse = serde_json::from_str(v2).expect("parse cohere v2");
        let first = p2.results.first().expect("one result");
        assert_eq!(first.index, 0);
        assert!((first.score - 0.77).abs() < 1e-6);
    }

    #[tokio::test]
    async fn relevance_score_is_passed_through_unrounded() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{"index": 0, "relevance_score": 0.123_456_789}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let res = provider_for(&server)
            .rerank(RerankRequest::new("q", vec!["d".to_string()]))
            .await
            .expect("rerank");
        assert_eq!(
            res.items,
            vec![RerankItem {
                index: 0,
                score: 0.123_456_789
            }]
        );
    }

    #[tokio::test]
    async fn results_keep_provider_order() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/rerank"))
            .and(header("authorization", "Bearer co-key"))
            .and(body_json(json!({
                "model": "rerank-v3.5",
                "query": "ownership",
                "documents": ["a", "b", "c"],
                "top_n": 3,
                "return_documents": false
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "r-1",
                "results": [
                    {"index": 2, "relevance_score": 0.9},
                    {"index": 0, "relevance_score": 0.7},
                    {"index": 1, "relevance_score": 0.2}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let request = RerankRequest::new(
            "ownership",
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
        )
        .top_n(3);
        let res = provider_for(&server).rerank(request).await.expect("rerank");
        let order: Vec<usize> = res.items.iter().map(|it| it.index).collect();
        assert_eq!(order, vec![2, 0, 1]);
        assert_eq!(res.provider, "cohere");
    }

    #[tokio::test]
    async fn upstream_failure_keeps_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .rerank(RerankRequest::new("q", vec!["d".to_string()]))
            .await
            .expect_err("500 must fail");
        match err {
            ProviderError::Api { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn empty_documents_never_reach_the_network() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .rerank(RerankRequest::new("q", Vec::new()))
            .await
            .expect_err("empty documents must fail");
        assert!(matches!(err, ProviderError::Config(_)));
    }
}
