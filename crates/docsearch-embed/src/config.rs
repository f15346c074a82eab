use std::time::Duration;

pub const DEFAULT_OPENAI_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_JINA_MODEL: &str = "jina-embeddings-v3";

#[derive(Debug, Clone)]
pub struct OpenAiCompatibleConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    /// `None` leaves the HTTP client's own defaults in place.
    pub timeout: Option<Duration>,
    pub dimensions: Option<usize>,
    pub task_query: Option<String>,
    pub task_passage: Option<String>,
}

impl OpenAiCompatibleConfig {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: "https://api.openai.com".to_string(),
            model: model.into(),
            timeout: None,
            dimensions: None,
            task_query: None,
            task_passage: None,
        }
    }

    /// Same wire format, pointed at Jina with its retrieval task names.
    pub fn jina(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: "https://api.jina.ai".to_string(),
            task_query: Some("retrieval.query".to_string()),
            task_passage: Some("retrieval.passage".to_string()),
            ..Self::new(api_key, model)
        }
    }
}

#[derive(Debug, Clone)]
pub enum EmbeddingProviderConfig {
    OpenAiCompatible(OpenAiCompatibleConfig),
    Jina(OpenAiCompatibleConfig),
}

impl EmbeddingProviderConfig {
    pub fn model(&self) -> &str {
        match self {
            Self::OpenAiCompatible(c) | Self::Jina(c) => c.model.as_str(),
        }
    }
}
