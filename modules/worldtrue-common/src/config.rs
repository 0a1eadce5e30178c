use std::env;
use std::str::FromStr;

use tracing::info;

use crate::error::WorldTrueError;

const DEFAULT_RESEARCH_MODEL: &str = "claude-sonnet-4-20250514";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Research backend
    pub anthropic_api_key: Option<String>,
    pub research_model: String,
    /// When set, similarity searches go to this WorldTrue research endpoint
    /// instead of calling the LLM directly.
    pub research_api_url: Option<String>,

    // Suggestion cache
    pub cache_capacity: Option<usize>,
    pub cache_ttl_secs: Option<u64>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, WorldTrueError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup. Blank values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, WorldTrueError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let config = Self {
            anthropic_api_key: get("ANTHROPIC_API_KEY"),
            research_model: get("RESEARCH_MODEL")
                .unwrap_or_else(|| DEFAULT_RESEARCH_MODEL.to_string()),
            research_api_url: get("RESEARCH_API_URL"),
            cache_capacity: parse_optional(
                get("SUGGESTION_CACHE_CAPACITY"),
                "SUGGESTION_CACHE_CAPACITY",
            )?,
            cache_ttl_secs: parse_optional(
                get("SUGGESTION_CACHE_TTL_SECS"),
                "SUGGESTION_CACHE_TTL_SECS",
            )?,
        };

        if config.research_api_url.is_none() && config.anthropic_api_key.is_none() {
            return Err(WorldTrueError::Config(
                "ANTHROPIC_API_KEY is required unless RESEARCH_API_URL is set".to_string(),
            ));
        }
        if config.cache_capacity == Some(0) {
            return Err(WorldTrueError::Config(
                "SUGGESTION_CACHE_CAPACITY must be greater than zero".to_string(),
            ));
        }

        Ok(config)
    }

    /// Log the effective configuration with secrets masked.
    pub fn log_redacted(&self) {
        info!(
            anthropic_api_key = redact(self.anthropic_api_key.as_deref()),
            research_model = self.research_model.as_str(),
            research_api_url = self.research_api_url.as_deref().unwrap_or("<unset>"),
            cache_capacity = ?self.cache_capacity,
            cache_ttl_secs = ?self.cache_ttl_secs,
            "Loaded config"
        );
    }
}

fn parse_optional<T: FromStr>(raw: Option<String>, key: &str) -> Result<Option<T>, WorldTrueError> {
    raw.map(|v| {
        v.trim()
            .parse()
            .map_err(|_| WorldTrueError::Config(format!("{key} must be a number, got {v:?}")))
    })
    .transpose()
}

fn redact(secret: Option<&str>) -> &'static str {
    match secret {
        Some(_) => "<redacted>",
        None => "<unset>",
    }
}
