use crate::config::OpenAiCompatibleConfig;
use crate::error::ProviderError;
use crate::providers::openai_compatible::OpenAiCompatibleEmbeddingProvider;
use crate::traits::EmbeddingProvider;
use crate::types::{EmbeddingRequest, EmbeddingResponse};

/// Jina speaks the OpenAI embeddings dialect plus a `task` field.
#[derive(Clone)]
pub struct JinaEmbeddingProvider {
    inner: OpenAiCompatibleEmbeddingProvider,
}

impl JinaEmbeddingProvider {
    pub fn new(mut config: OpenAiCompatibleConfig) -> Result<Self, ProviderError> {
        if config.base_url.trim().is_empty() {
            config.base_url = "https://api.jina.ai".to_string();
        }
        Ok(Self {
            inner: OpenAiCompatibleEmbeddingProvider::new(config)?,
        })
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for JinaEmbeddingProvider {
    fn name(&self) -> &'static str {
        "jina"
    }

    fn model(&self) -> &str {
        self.inner.model()
    }

    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, ProviderError> {
        let mut res = self.inner.embed(request).await?;
        res.provider = self.name().to_string();
        Ok(res)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::types::EmbeddingTask;

    #[tokio::test]
    async fn query_task_is_forwarded() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/embeddings"))
            .and(body_partial_json(json!({
                "model": "jina-embeddings-v3",
                "task": "retrieval.query"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "model": "jina-embeddings-v3",
                "data": [{"index": 0, "embedding": [0.5]}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut cfg = OpenAiCompatibleConfig::jina("jina-key", "jina-embeddings-v3");
        cfg.base_url = server.uri();
        let provider = JinaEmbeddingProvider::new(cfg).expect("build provider");
        let res = provider
            .embed(EmbeddingRequest::single("query").with_task(EmbeddingTask::Query))
            .await
            .expect("embed");
        assert_eq!(res.provider, "jina");
        assert_eq!(res.vectors, vec![vec![0.5]]);
    }
}
