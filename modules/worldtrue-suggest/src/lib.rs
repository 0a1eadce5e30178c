//! Suggested-event core for the WorldTrue map: camera zoom selection,
//! the similar-events cache, the pending-suggestions queue, and the
//! orchestrator that ties them to a research backend.

pub mod cache;
pub mod error;
pub mod map_view;
pub mod orchestrator;
pub mod pending;
pub mod zoom;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use cache::{cache_key, CachePolicy, SuggestionCache};
pub use error::SuggestError;
pub use map_view::{CameraTransition, MapSnapshot, MapViewController};
pub use orchestrator::{
    similarity_query, RequestToken, SuggestionObserver, SuggestionOrchestrator, MAX_SUGGESTIONS,
};
pub use pending::{PendingOutcome, PendingQueue};
pub use zoom::{nearest_distance, zoom_for, zoom_for_distance, MAX_ZOOM, MIN_ZOOM, SOLITARY_ZOOM};
