use std::io;

use docsearch_server::ServerConfig;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env().map_err(|err| {
        tracing::error!(error = %err, "invalid configuration");
        io::Error::new(io::ErrorKind::InvalidInput, err)
    })?;

    docsearch_server::serve_http(config).await
}
