pub mod error;
pub mod http;
pub mod llm;
pub mod service;
pub mod types;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use error::ResearchError;
pub use http::HttpResearcher;
pub use llm::LlmResearcher;
pub use service::{research_service, ResearchService};
pub use types::{
    EventDate, EventLocation, ResearchDepth, ResearchRequest, ResearchResponse, ResearchedEvent,
};
