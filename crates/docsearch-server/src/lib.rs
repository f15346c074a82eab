pub mod config;
pub mod error;
pub mod handlers;
pub mod pipeline;
pub mod server;

pub use config::{ConfigError, MissingQueryPolicy, ServerConfig};
pub use error::SearchError;
pub use pipeline::{PipelineSettings, RankedDocument, SearchPipeline};
pub use server::{configure, serve_http, AppState};
