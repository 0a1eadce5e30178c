use ai_client::Claude;
use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::ResearchError;
use crate::service::ResearchService;
use crate::types::{ResearchDepth, ResearchResponse};

/// Research backed directly by a Claude structured-output call.
pub struct LlmResearcher {
    claude: Claude,
}

impl LlmResearcher {
    pub fn new(claude: Claude) -> Self {
        Self { claude }
    }
}

pub(crate) fn system_prompt(depth: ResearchDepth) -> String {
    format!(
        "You are a historian helping users explore events on a world map.\n\
         Return at most {count} real, verifiable historical or news events that answer the query.\n\
         For each event give:\n\
         - title: the common name of the event\n\
         - description: one or two sentences\n\
         - date: year (negative for BCE), plus month and day when known\n\
         - location: the place name at the time, and modernName if it differs today\n\
         - type: a short lowercase category such as battle, treaty, discovery, disaster\n\
         Do not invent events. Return fewer results rather than guessing.",
        count = depth.event_count()
    )
}

#[async_trait]
impl ResearchService for LlmResearcher {
    async fn research(
        &self,
        query: &str,
        depth: ResearchDepth,
    ) -> Result<ResearchResponse, ResearchError> {
        debug!(model = self.claude.model(), %depth, query, "LLM research request");

        let mut response: ResearchResponse =
            self.claude.extract(system_prompt(depth), query).await?;
        response.events.truncate(depth.event_count());
        response.validate()?;

        info!(events = response.events.len(), %depth, "LLM research complete");
        Ok(response)
    }
}
