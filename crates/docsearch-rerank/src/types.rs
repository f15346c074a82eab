#[derive(Debug, Clone)]
pub struct RerankRequest {
    pub query: String,
    pub documents: Vec<String>,
    pub top_n: Option<usize>,
}

impl RerankRequest {
    pub fn new(query: impl Into<String>, documents: Vec<String>) -> Self {
        Self {
            query: query.into(),
            documents,
            top_n: None,
        }
    }

    #[must_use]
    pub const fn top_n(mut self, n: usize) -> Self {
        self.top_n = Some(n);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RerankItem {
    pub index: usize,
    pub score: f64,
}

#[derive(Debug, Clone)]
pub struct RerankResponse {
    pub provider: String,
    pub model: String,
    pub items: Vec<RerankItem>,
}
