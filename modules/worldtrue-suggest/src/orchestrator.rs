use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, info, warn};
use worldtrue_common::{format_year, Event, SuggestedEvent, SuggestedEventWithSource};
use worldtrue_research::{ResearchDepth, ResearchService};

use crate::cache::{cache_key, SuggestionCache};
use crate::error::SuggestError;

/// At most this many suggestions are kept from a single research response.
pub const MAX_SUGGESTIONS: usize = 5;

/// Side channel for UI state driven by similarity searches.
pub trait SuggestionObserver {
    /// A network lookup started (`true`) or finished (`false`).
    fn searching_changed(&mut self, searching: bool);

    /// Suggestions became available, from the cache or a fresh lookup.
    fn suggestions_found(&mut self, suggestions: &[SuggestedEventWithSource]);
}

impl<O: SuggestionObserver + ?Sized> SuggestionObserver for Arc<Mutex<O>> {
    fn searching_changed(&mut self, searching: bool) {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .searching_changed(searching);
    }

    fn suggestions_found(&mut self, suggestions: &[SuggestedEventWithSource]) {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .suggestions_found(suggestions);
    }
}

/// Identifies one similarity search. Only the most recently issued token is
/// current; results for any other token are cached but not reported.
#[derive(Debug, Clone)]
pub struct RequestToken {
    generation: u64,
    active: Arc<AtomicU64>,
}

impl RequestToken {
    pub fn is_current(&self) -> bool {
        self.active.load(Ordering::SeqCst) == self.generation
    }
}

/// Natural-language query sent to the research backend for `source`.
pub fn similarity_query(source: &Event) -> String {
    format!(
        "Historical events similar to \"{}\" ({})",
        source.title,
        format_year(source.year)
    )
}

pub struct SuggestionOrchestrator {
    researcher: Arc<dyn ResearchService>,
    cache: Arc<SuggestionCache>,
    active: Arc<AtomicU64>,
    // generation of the miss whose spinner is on, 0 when none
    outstanding: AtomicU64,
}

impl SuggestionOrchestrator {
    pub fn new(researcher: Arc<dyn ResearchService>, cache: Arc<SuggestionCache>) -> Self {
        Self {
            researcher,
            cache,
            active: Arc::new(AtomicU64::new(0)),
            outstanding: AtomicU64::new(0),
        }
    }

    pub fn cache(&self) -> &SuggestionCache {
        &self.cache
    }

    /// Start a new request, superseding every earlier token.
    pub fn begin(&self) -> RequestToken {
        let generation = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        RequestToken {
            generation,
            active: self.active.clone(),
        }
    }

    /// Drop interest in any in-flight search, e.g. when another event is
    /// hovered. The search still completes and fills the cache, and the
    /// observer is told searching stopped.
    pub fn reset<O>(&self, observer: &mut O)
    where
        O: SuggestionObserver + ?Sized,
    {
        self.begin();
        if self.take_outstanding() {
            observer.searching_changed(false);
        }
    }

    /// Claim the searching flag from a superseded miss, if one was running.
    fn take_outstanding(&self) -> bool {
        self.outstanding.swap(0, Ordering::SeqCst) != 0
    }

    /// Suggestions of events similar to `source`.
    ///
    /// A non-empty cache entry is returned without a network call, and the
    /// observer hears about it before this returns. On a miss the research
    /// backend is asked for a quick result set; non-empty results are cached
    /// and reported. Failures are returned as errors and never cached, so a
    /// later call retries.
    pub async fn find_similar<O>(
        &self,
        source: &Event,
        observer: &mut O,
    ) -> Result<Vec<SuggestedEvent>, SuggestError>
    where
        O: SuggestionObserver + ?Sized,
    {
        let key = cache_key(source);
        let token = self.begin();
        let interrupted = self.take_outstanding();

        if let Some(cached) = self.cache.get(&key).filter(|s| !s.is_empty()) {
            debug!(key = %key, count = cached.len(), "Similar events served from cache");
            if interrupted {
                observer.searching_changed(false);
            }
            observer.suggestions_found(&annotate(&cached, source));
            return Ok(cached);
        }

        self.outstanding.store(token.generation, Ordering::SeqCst);
        observer.searching_changed(true);
        let outcome = self
            .researcher
            .research(&similarity_query(source), ResearchDepth::Quick)
            .await;
        let current = token.is_current();
        if current {
            let _ = self.outstanding.compare_exchange(
                token.generation,
                0,
                Ordering::SeqCst,
                Ordering::SeqCst,
            );
            observer.searching_changed(false);
        } else {
            debug!(key = %key, "Similar-event search superseded; result will not be reported");
        }

        let response = match outcome {
            Ok(response) => response,
            Err(e) => {
                warn!(key = %key, error = %e, "Similar-event search failed");
                return Err(e.into());
            }
        };

        let suggestions: Vec<SuggestedEvent> = response
            .events
            .into_iter()
            .take(MAX_SUGGESTIONS)
            .map(|e| e.into_suggestion())
            .collect();

        if suggestions.is_empty() {
            info!(key = %key, "Research returned no similar events");
            return Ok(suggestions);
        }

        self.cache.put(key.as_str(), suggestions.clone());
        info!(key = %key, count = suggestions.len(), "Cached similar events");

        if current {
            observer.suggestions_found(&annotate(&suggestions, source));
        }
        Ok(suggestions)
    }

    /// Like `find_similar`, but a failed lookup is logged and reported as no
    /// suggestions.
    pub async fn find_similar_or_empty<O>(
        &self,
        source: &Event,
        observer: &mut O,
    ) -> Vec<SuggestedEvent>
    where
        O: SuggestionObserver + ?Sized,
    {
        self.find_similar(source, observer).await.unwrap_or_default()
    }
}

fn annotate(suggestions: &[SuggestedEvent], source: &Event) -> Vec<SuggestedEventWithSource> {
    suggestions
        .iter()
        .cloned()
        .map(|s| s.with_source(source))
        .collect()
}
