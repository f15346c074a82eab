use crate::error::ProviderError;

/// Retrieval role of the embedded text, for providers that embed queries and passages
/// differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingTask {
    Query,
    Passage,
}

#[derive(Debug, Clone)]
pub struct EmbeddingRequest {
    pub inputs: Vec<String>,
    pub task: Option<EmbeddingTask>,
    pub dimensions: Option<usize>,
}

impl EmbeddingRequest {
    pub fn single(input: impl Into<String>) -> Self {
        Self {
            inputs: vec![input.into()],
            task: None,
            dimensions: None,
        }
    }

    #[must_use]
    pub const fn with_task(mut self, task: EmbeddingTask) -> Self {
        self.task = Some(task);
        self
    }
}

#[derive(Debug, Clone)]
pub struct EmbeddingResponse {
    pub provider: String,
    pub model: String,
    pub vectors: Vec<Vec<f32>>,
    pub usage_tokens: Option<u64>,
}

impl EmbeddingResponse {
    /// Extracts the only vector of a single-input response.
    ///
    /// Fails when the provider returned no vector, more than one, or an empty one.
    pub fn into_single(self) -> Result<Vec<f32>, ProviderError> {
        let count = self.vectors.len();
        let mut vectors = self.vectors.into_iter();
        match (vectors.next(), vectors.next()) {
            (Some(v), None) if !v.is_empty() => Ok(v),
            (Some(_), None) => Err(ProviderError::InvalidResponse(format!(
                "{} returned an empty embedding",
                self.provider
            ))),
            _ => Err(ProviderError::InvalidResponse(format!(
                "{} returned {count} embeddings, expected exactly one",
                self.provider
            ))),
        }
    }
}
