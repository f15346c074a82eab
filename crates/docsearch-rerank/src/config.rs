use std::time::Duration;

#[derive(Debug, Clone)]
pub struct CohereRerankConfig {
    pub api_key: String,
    pub model: String,
    pub endpoint: String,
    pub timeout: Option<Duration>,
}

impl CohereRerankConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: "rerank-v3.5".to_string(),
            endpoint: "https://api.cohere.com/v2/rerank".to_string(),
            timeout: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct JinaRerankConfig {
    pub api_key: String,
    pub model: String,
    pub endpoint: String,
    pub timeout: Option<Duration>,
}

impl JinaRerankConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: "jina-reranker-v2-base-multilingual".to_string(),
            endpoint: "https://api.jina.ai/v1/rerank".to_string(),
            timeout: None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum RerankProviderConfig {
    Cohere(CohereRerankConfig),
    Jina(JinaRerankConfig),
}

impl RerankProviderConfig {
    pub const fn provider_name(&self) -> &'static str {
        match self {
            Self::Cohere(_) => "cohere",
            Self::Jina(_) => "jina",
        }
    }
}

pub(crate) fn http_client(timeout: Option<Duration>) -> reqwest::Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build()
}
