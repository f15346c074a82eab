use std::time::Duration;

#[derive(Debug, Clone)]
pub struct PostgrestConfig {
    /// Project URL; the REST root is `{base_url}/rest/v1`.
    pub base_url: String,
    pub service_key: String,
    pub match_function: String,
    pub documents_table: String,
    pub timeout: Option<Duration>,
}

impl PostgrestConfig {
    pub fn new(base_url: impl Into<String>, service_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            service_key: service_key.into(),
            match_function: "match_documents".to_string(),
            documents_table: "documents".to_string(),
            timeout: None,
        }
    }

    pub(crate) fn rest_root(&self) -> String {
        format!("{}/rest/v1", self.base_url.trim_end_matches('/'))
    }
}
