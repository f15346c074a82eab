use std::time::Duration;

use docsearch_embed::{
    EmbeddingProviderConfig, OpenAiCompatibleConfig, DEFAULT_JINA_MODEL, DEFAULT_OPENAI_MODEL,
};
use docsearch_rerank::{CohereRerankConfig, JinaRerankConfig, RerankProviderConfig};
use docsearch_store::PostgrestConfig;
use thiserror::Error;

use crate::pipeline::PipelineSettings;

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not configured")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// What `POST /search` does when the body carries no usable query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingQueryPolicy {
    /// 200 with every stored document.
    #[default]
    ListAll,
    /// 400 asking the caller for a query.
    Reject,
}

impl MissingQueryPolicy {
    fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "list-all" | "list_all" | "all" => Some(Self::ListAll),
            "reject" | "require" | "required" => Some(Self::Reject),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub missing_query: MissingQueryPolicy,
    pub pipeline: PipelineSettings,
    pub embed: EmbeddingProviderConfig,
    pub rerank: RerankProviderConfig,
    pub store: PostgrestConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key/value source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let port = match env.get("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::Invalid {
                key: "PORT",
                value: raw,
                reason: "expected a port number",
            })?,
            None => DEFAULT_PORT,
        };

        let missing_query = match env.get("SEARCH_MISSING_QUERY") {
            Some(raw) => MissingQueryPolicy::parse(&raw).ok_or(ConfigError::Invalid {
                key: "SEARCH_MISSING_QUERY",
                value: raw,
                reason: "expected list-all or reject",
            })?,
            None => MissingQueryPolicy::default(),
        };

        let timeout = match env.get("UPSTREAM_TIMEOUT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "UPSTREAM_TIMEOUT_SECS",
                        value: raw,
                        reason: "expected a positive number of seconds",
                    })
                }
            },
            None => None,
        };

        Ok(Self {
            host: env.get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            missing_query,
            pipeline: PipelineSettings::default(),
            embed: embed_config(&env, timeout)?,
            rerank: rerank_config(&env, timeout)?,
            store: store_config(&env, timeout)?,
        })
    }
}

struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn first_of(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|k| self.get(k))
    }
}

fn embed_config<F>(
    env: &Env<F>,
    timeout: Option<Duration>,
) -> Result<EmbeddingProviderConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let provider = env
        .get("EMBED_PROVIDER")
        .map_or_else(|| "openai-compatible".to_string(), |p| p.to_ascii_lowercase());

    let mut cfg = match provider.as_str() {
        "openai-compatible" | "openai" => {
            let api_key = env
                .first_of(&["EMBED_API_KEY", "OPENAI_API_KEY"])
                .ok_or(ConfigError::Missing("EMBED_API_KEY"))?;
            let model = env
                .get("EMBED_MODEL")
                .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string());
            OpenAiCompatibleConfig::new(api_key, model)
        }
        "jina" => {
            let api_key = env
                .first_of(&["EMBED_API_KEY", "JINA_API_KEY"])
                .ok_or(ConfigError::Missing("EMBED_API_KEY"))?;
            let model = env
                .get("EMBED_MODEL")
                .unwrap_or_else(|| DEFAULT_JINA_MODEL.to_string());
            OpenAiCompatibleConfig::jina(api_key, model)
        }
        _ => {
            return Err(ConfigError::Invalid {
                key: "EMBED_PROVIDER",
                value: provider.clone(),
                reason: "expected openai-compatible or jina",
            })
        }
    };
    if let Some(base_url) = env.get("EMBED_BASE_URL") {
        cfg.base_url = base_url;
    }
    cfg.timeout = timeout;

    Ok(if provider == "jina" {
        EmbeddingProviderConfig::Jina(cfg)
    } else {
        EmbeddingProviderConfig::OpenAiCompatible(cfg)
    })
}

fn rerank_config<F>(
    env: &Env<F>,
    timeout: Option<Duration>,
) -> Result<RerankProviderConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let provider = env
        .get("RERANK_PROVIDER")
        .map_or_else(|| "cohere".to_string(), |p| p.to_ascii_lowercase());
    let model = env.get("RERANK_MODEL");
    let endpoint = env.get("RERANK_ENDPOINT");

    match provider.as_str() {
        "cohere" => {
            let api_key = env
                .first_of(&["RERANK_API_KEY", "COHERE_API_KEY"])
                .ok_or(ConfigError::Missing("RERANK_API_KEY"))?;
            let mut cfg = CohereRerankConfig::new(api_key);
            if let Some(model) = model {
                cfg.model = model;
            }
            if let Some(endpoint) = endpoint {
                cfg.endpoint = endpoint;
            }
            cfg.timeout = timeout;
            Ok(RerankProviderConfig::Cohere(cfg))
        }
        "jina" => {
            let api_key = env
                .first_of(&["RERANK_API_KEY", "JINA_API_KEY"])
                .ok_or(ConfigError::Missing("RERANK_API_KEY"))?;
            let mut cfg = JinaRerankConfig::new(api_key);
            if let Some(model) = model {
                cfg.model = model;
            }
            if let Some(endpoint) = endpoint {
                cfg.endpoint = endpoint;
            }
            cfg.timeout = timeout;
            Ok(RerankProviderConfig::Jina(cfg))
        }
        _ => Err(ConfigError::Invalid {
            key: "RERANK_PROVIDER",
            value: provider.clone(),
            reason: "expected cohere or jina",
        }),
    }
}

fn store_config<F>(env: &Env<F>, timeout: Option<Duration>) -> Result<PostgrestConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let url = env
        .get("SUPABASE_URL")
        .ok_or(ConfigError::Missing("SUPABASE_URL"))?;
    let key = env
        .first_of(&["SUPABASE_SERVICE_KEY", "SUPABASE_KEY"])
        .ok_or(ConfigError::Missing("SUPABASE_SERVICE_KEY"))?;

    let mut cfg = PostgrestConfig::new(url, key);
    if let Some(function) = env.get("SUPABASE_MATCH_FUNCTION") {
        cfg.match_function = function;
    }
    if let Some(table) = env.get("SUPABASE_DOCUMENTS_TABLE") {
        cfg.documents_table = table;
    }
    cfg.timeout = timeout;
    Ok(cfg)
}
