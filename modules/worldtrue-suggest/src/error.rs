use thiserror::Error;
use worldtrue_research::ResearchError;

#[derive(Debug, Error)]
pub enum SuggestError {
    /// The research backend failed or returned something unusable.
    #[error("Similar-event lookup failed: {0}")]
    Fetch(#[from] ResearchError),

    #[error("No event with id {0} on the map")]
    UnknownEvent(String),
}
