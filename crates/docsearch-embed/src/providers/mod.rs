pub mod jina;
pub mod openai_compatible;

pub use jina::JinaEmbeddingProvider;
pub use openai_compatible::OpenAiCompatibleEmbeddingProvider;
