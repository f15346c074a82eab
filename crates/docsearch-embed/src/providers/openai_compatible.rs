use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::OpenAiCompatibleConfig;
use crate::error::ProviderError;
use crate::traits::EmbeddingProvider;
use crate::types::{EmbeddingRequest, EmbeddingResponse, EmbeddingTask};

#[derive(Clone)]
pub struct OpenAiCompatibleEmbeddingProvider {
    config: OpenAiCompatibleConfig,
    client: Client,
}

impl OpenAiCompatibleEmbeddingProvider {
    pub fn new(config: OpenAiCompatibleConfig) -> Result<Self, ProviderError> {
        if config.api_key.trim().is_empty() {
            return Err(ProviderError::Config("embedding api key is empty".to_string()));
        }
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self { config, client })
    }

    fn task_name(&self, task: Option<EmbeddingTask>) -> Option<&str> {
        match task? {
            EmbeddingTask::Query => self.config.task_query.as_deref(),
            EmbeddingTask::Passage => self.config.task_passage.as_deref(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/embeddings",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for OpenAiCompatibleEmbeddingProvider {
    fn name(&self) -> &'static str {
        "openai-compatible"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, ProviderError> {
        let input = match request.inputs.as_slice() {
            [] => {
                return Err(ProviderError::Config(
                    "embedding input is empty".to_string(),
                ));
            }
            [single] => Input::Single(single),
            many => Input::Batch(many),
        };

        let payload = OpenAiEmbeddingRequest {
            model: &self.config.model,
            input,
            dimensions: request.dimensions.or(self.config.dimensions),
            task: self.task_name(request.task),
        };

        tracing::debug!(
            provider = self.name(),
            model = %self.config.model,
            inputs = request.inputs.len(),
            "requesting embeddings"
        );

        let res = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            return Err(ProviderError::Api { status, body });
        }

        let parsed: OpenAiEmbeddingResponse = res.json().await?;
        if parsed.data.is_empty() {
            return Err(ProviderError::InvalidResponse(
                "no embeddings in response".to_string(),
            ));
        }

        let mut data = parsed.data;
        data.sort_by_key(|it| it.index);
        let vectors = data.into_iter().map(|it| it.embedding).collect();

        Ok(EmbeddingResponse {
            provider: self.name().to_string(),
            model: parsed.model.unwrap_or_else(|| self.config.model.clone()),
            vectors,
            usage_tokens: parsed.usage.and_then(|u| u.total_tokens),
        })
    }
}

#[derive(Debug, Serialize)]
struct OpenAiEmbeddingRequest<'a> {
    model: &'a str,
    input: Input<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    task: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Input<'a> {
    Single(&'a str),
    Batch(&'a [String]),
}

#[derive(Debug, Deserialize)]
struct OpenAiEmbeddingResponse {
    #[serde(default)]
    model: Option<String>,
    data: Vec<EmbeddingItem>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingItem {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    total_tokens: Option<u64>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn provider_for(server: &MockServer) -> OpenAiCompatibleEmbeddingProvider {
        let mut cfg = OpenAiCompatibleConfig::new("sk-test", "text-embedding-3-small");
        cfg.base_url = server.uri();
        OpenAiCompatibleEmbeddingProvider::new(cfg).expect("build provider")
    }

    #[tokio::test]
    async fn sends_query_text_verbatim_with_fixed_model() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/embeddings"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_json(json!({
                "model": "text-embedding-3-small",
                "input": "  Rust Async  "
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "model": "text-embedding-3-small",
                "data": [{"index": 0, "embedding": [0.25, -0.5, 1.0]}],
                "usage": {"prompt_tokens": 3, "total_tokens": 3}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let res = provider_for(&server)
            .embed(EmbeddingRequest::single("  Rust Async  "))
            .await
            .expect("embed");
        assert_eq!(res.provider, "openai-compatible");
        assert_eq!(res.usage_tokens, Some(3));
        assert_eq!(res.into_single().expect("single"), vec![0.25, -0.5, 1.0]);
    }

    #[tokio::test]
    async fn batch_vectors_follow_returned_index() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/embeddings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    {"index": 1, "embedding": [2.0]},
                    {"index": 0, "embedding": [1.0]}
                ]
            })))
            .mount(&server)
            .await;

        let request = EmbeddingRequest {
            inputs: vec!["a".to_string(), "b".to_string()],
            task: None,
            dimensions: None,
        };
        let res = provider_for(&server).embed(request).await.expect("embed");
        assert_eq!(res.vectors, vec![vec![1.0], vec![2.0]]);
        assert_eq!(res.model, "text-embedding-3-small");
    }

    #[tokio::test]
    async fn non_success_status_is_reported_as_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .embed(EmbeddingRequest::single("q"))
            .await
            .expect_err("429 must fail");
        assert_eq!(err.status(), Some(429));
    }

    #[tokio::test]
    async fn empty_data_is_invalid() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .embed(EmbeddingRequest::single("q"))
            .await
            .expect_err("empty data must fail");
        assert!(matches!(err, ProviderError::InvalidResponse(_)));
    }

    #[test]
    fn empty_api_key_is_rejected() {
        let cfg = OpenAiCompatibleConfig::new("  ", "m");
        assert!(matches!(
            OpenAiCompatibleEmbeddingProvider::new(cfg),
            Err(ProviderError::Config(_))
        ));
    }
}
