use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A stored record. The id is whatever the backend uses (integer, uuid, ...), passed through
/// untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: Value,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct MatchQuery {
    pub embedding: Vec<f32>,
    pub threshold: f32,
    pub limit: usize,
}
