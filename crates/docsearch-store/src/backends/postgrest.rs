use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;

use crate::config::PostgrestConfig;
use crate::error::StoreError;
use crate::traits::{DocumentStore, VectorStore};
use crate::types::{Document, MatchQuery};

const DOCUMENT_COLUMNS: &str = "id,title,content";

/// PostgREST (Supabase) backend serving both the similarity RPC and the plain table read.
#[derive(Clone)]
pub struct PostgrestStore {
    config: PostgrestConfig,
    client: Client,
}

impl PostgrestStore {
    pub fn new(config: PostgrestConfig) -> Result<Self, StoreError> {
        if config.base_url.trim().is_empty() {
            return Err(StoreError::Config("store url is empty".to_string()));
        }
        if config.service_key.trim().is_empty() {
            return Err(StoreError::Config("store service key is empty".to_string()));
        }
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self { config, client })
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        req.header("apikey", &self.config.service_key)
            .bearer_auth(&self.config.service_key)
    }

    async fn read_documents(res: Response) -> Result<Vec<Document>, StoreError> {
        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            return Err(StoreError::Api { status, body });
        }
        Ok(res.json().await?)
    }
}

#[derive(Debug, Serialize)]
struct MatchParams<'a> {
    query_embedding: &'a [f32],
    match_threshold: f32,
}

#[async_trait::async_trait]
impl VectorStore for PostgrestStore {
    fn name(&self) -> &'static str {
        "postgrest"
    }

    async fn match_documents(&self, query: MatchQuery) -> Result<Vec<Document>, StoreError> {
        let url = format!(
            "{}/rpc/{}",
            self.config.rest_root(),
            self.config.match_function
        );
        let params = MatchParams {
            query_embedding: &query.embedding,
            match_threshold: query.threshold,
        };
        let limit = query.limit.to_string();

        let res = self
            .authorized(self.client.post(url))
            .query(&[("select", DOCUMENT_COLUMNS), ("limit", limit.as_str())])
            .json(&params)
            .send()
            .await?;
        let docs = Self::read_documents(res).await?;
        tracing::debug!(
            function = %self.config.match_function,
            matched = docs.len(),
            "similarity search finished"
        );
        Ok(docs)
    }
}

#[async_trait::async_trait]
impl DocumentStore for PostgrestStore {
    fn name(&self) -> &'static str {
        "postgrest"
    }

    async fn list_documents(&self) -> Result<Vec<Document>, StoreError> {
        let url = format!(
            "{}/{}",
            self.config.rest_root(),
            self.config.documents_table
        );
        let res = self
            .authorized(self.client.get(url))
            .query(&[("select", DOCUMENT_COLUMNS)])
            .send()
            .await?;
        Self::read_documents(res).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn store_for(server: &MockServer) -> PostgrestStore {
        PostgrestStore::new(PostgrestConfig::new(server.uri(), "service-key")).expect("store")
    }

    #[tokio::test]
    async fn match_calls_rpc_with_threshold_and_limit() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/rpc/match_documents"))
            .and(header("apikey", "service-key"))
            .and(header("authorization", "Bearer service-key"))
            .and(query_param("select", "id,title,content"))
            .and(query_param("limit", "10"))
            .and(body_json(json!({
                "query_embedding": [0.5, 0.25],
                "match_threshold": 0.3
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 7, "title": "Borrowing", "content": "References..."},
                {"id": 3, "title": "Lifetimes", "content": "Scopes..."}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let docs = store_for(&server)
            .match_documents(MatchQuery {
                embedding: vec![0.5, 0.25],
                threshold: 0.3,
                limit: 10,
            })
            .await
            .expect("match");
        let titles: Vec<&str> = docs.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(titles, vec!["Borrowing", "Lifetimes"]);
        assert_eq!(docs.first().map(|d| d.id.clone()), Some(json!(7)));
    }

    #[tokio::test]
    async fn rpc_error_is_surfaced_with_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(404).set_body_string(r#"{"message":"function not found"}"#),
            )
            .mount(&server)
            .await;

        let err = store_for(&server)
            .match_documents(MatchQuery {
                embedding: vec![1.0],
                threshold: 0.3,
                limit: 10,
            })
            .await
            .expect_err("404 must fail");
        assert!(matches!(err, StoreError::Api { status: 404, .. }));
    }

    #[tokio::test]
    async fn list_reads_whole_table() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/documents"))
            .and(query_param("select", "id,title,content"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "a1", "title": "One", "content": "1"},
                {"id": "b2", "title": "Two", "content": "2"},
                {"id": "c3", "title": "Three", "content": "3"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let docs = store_for(&server).list_documents().await.expect("list");
        assert_eq!(docs.len(), 3);
        assert_eq!(
            docs.last(),
            Some(&Document {
                id: json!("c3"),
                title: "Three".to_string(),
                content: "3".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn malformed_rows_are_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1}])))
            .mount(&server)
            .await;

        let err = store_for(&server)
            .list_documents()
            .await
            .expect_err("missing columns must fail");
        assert!(matches!(err, StoreError::Http(_)));
    }

    #[test]
    fn rest_root_tolerates_trailing_slash() {
        let cfg = PostgrestConfig::new("https://proj.supabase.co/", "k");
        assert_eq!(cfg.rest_root(), "https://proj.supabase.co/rest/v1");
    }
}
