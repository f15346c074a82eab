use std::io;
use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use docsearch_embed::build_embedding_provider;
use docsearch_rerank::build_rerank_provider;
use docsearch_store::PostgrestStore;
use tracing_actix_web::TracingLogger;

use crate::config::{MissingQueryPolicy, ServerConfig};
use crate::handlers;
use crate::pipeline::SearchPipeline;

/// Shared by every worker; built once at startup.
pub struct AppState {
    pub pipeline: SearchPipeline,
    pub missing_query: MissingQueryPolicy,
}

impl AppState {
    pub fn new(pipeline: SearchPipeline, missing_query: MissingQueryPolicy) -> Self {
        Self {
            pipeline,
            missing_query,
        }
    }

    /// Creates the upstream clients described by `config`.
    pub fn from_config(config: &ServerConfig) -> io::Result<Self> {
        let embedder = build_embedding_provider(config.embed.clone()).map_err(io::Error::other)?;
        let reranker = build_rerank_provider(config.rerank.clone()).map_err(io::Error::other)?;
        let store = Arc::new(PostgrestStore::new(config.store.clone()).map_err(io::Error::other)?);

        let pipeline = SearchPipeline::new(
            embedder,
            store.clone(),
            store,
            reranker,
            config.pipeline,
        );
        Ok(Self::new(pipeline, config.missing_query))
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(handlers::health))
        .route("/search", web::post().to(handlers::search));
}

pub async fn serve_http(config: ServerConfig) -> io::Result<()> {
    let state = web::Data::new(AppState::from_config(&config)?);
    tracing::info!(
        host = %config.host,
        port = config.port,
        embed_provider = state.pipeline.embedder_name(),
        embed_model = config.embed.model(),
        rerank_provider = state.pipeline.reranker_name(),
        missing_query = ?config.missing_query,
        "docsearch listening"
    );

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
