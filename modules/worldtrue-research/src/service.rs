use std::sync::Arc;

use ai_client::Claude;
use async_trait::async_trait;
use tracing::info;
use worldtrue_common::Config;

use crate::error::ResearchError;
use crate::http::HttpResearcher;
use crate::llm::LlmResearcher;
use crate::types::{ResearchDepth, ResearchResponse};

/// Looks up historical events for a natural-language query.
///
/// Implementations return validated responses; callers never see a payload
/// that failed `ResearchResponse::validate`.
#[async_trait]
pub trait ResearchService: Send + Sync {
    async fn research(
        &self,
        query: &str,
        depth: ResearchDepth,
    ) -> Result<ResearchResponse, ResearchError>;
}

#[async_trait]
impl<T: ResearchService + ?Sized> ResearchService for Arc<T> {
    async fn research(
        &self,
        query: &str,
        depth: ResearchDepth,
    ) -> Result<ResearchResponse, ResearchError> {
        (**self).research(query, depth).await
    }
}

/// Pick the research backend the configuration asks for: the WorldTrue
/// endpoint when `research_api_url` is set, otherwise Claude directly.
pub fn research_service(config: &Config) -> Result<Arc<dyn ResearchService>, ResearchError> {
    if let Some(url) = &config.research_api_url {
        info!(url = %url, "Using HTTP research backend");
        return Ok(Arc::new(HttpResearcher::new(url)));
    }

    let api_key = config.anthropic_api_key.as_deref().ok_or_else(|| {
        ResearchError::Config("ANTHROPIC_API_KEY is required for the LLM backend".to_string())
    })?;
    info!(model = %config.research_model, "Using LLM research backend");
    Ok(Arc::new(LlmResearcher::new(Claude::new(
        api_key,
        config.research_model.as_str(),
    ))))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: Option<&str>, url: Option<&str>) -> Config {
        Config {
            anthropic_api_key: api_key.map(str::to_string),
            research_model: "claude-test".to_string(),
            research_api_url: url.map(str::to_string),
            cache_capacity: None,
            cache_ttl_secs: None,
        }
    }

    #[test]
    fn backend_requires_key_or_url() {
        assert!(matches!(
            research_service(&config(None, None)),
            Err(ResearchError::Config(_))
        ));
        assert!(research_service(&config(Some("sk-ant-test"), None)).is_ok());
        assert!(research_service(&config(None, Some("http://localhost:3000"))).is_ok());
    }
}
