use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::ResearchError;
use crate::service::ResearchService;
use crate::types::{ResearchDepth, ResearchRequest, ResearchResponse};

/// Research through a WorldTrue server's `/api/research` endpoint.
pub struct HttpResearcher {
    endpoint: String,
    http: reqwest::Client,
}

impl HttpResearcher {
    pub fn new(base_url: &str) -> Self {
        Self {
            endpoint: format!("{}/api/research", base_url.trim_end_matches('/')),
            http: reqwest::Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ResearchService for HttpResearcher {
    async fn research(
        &self,
        query: &str,
        depth: ResearchDepth,
    ) -> Result<ResearchResponse, ResearchError> {
        let request = ResearchRequest {
            query: query.to_string(),
            depth,
        };
        debug!(endpoint = %self.endpoint, %depth, query, "Research request");

        let response = self.http.post(&self.endpoint).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Research endpoint returned an error");
            return Err(ResearchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let mut parsed: ResearchResponse = serde_json::from_slice(&bytes)
            .map_err(|e| ResearchError::Malformed(e.to_string()))?;
        parsed.events.truncate(depth.event_count());
        parsed.validate()?;
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_base_url() {
        assert_eq!(
            HttpResearcher::new("http://localhost:3000/").endpoint(),
            "http://localhost:3000/api/research"
        );
        assert_eq!(
            HttpResearcher::new("https://worldtrue.example").endpoint(),
            "https://worldtrue.example/api/research"
        );
    }

    #[tokio::test]
    async fn connection_refused_is_transport_error() {
        let err = HttpResearcher::new("http://127.0.0.1:9")
            .research("anything", ResearchDepth::Quick)
            .await
            .unwrap_err();
        assert!(matches!(err, ResearchError::Transport(_)), "got {err:?}");
    }
}
