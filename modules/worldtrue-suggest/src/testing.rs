// Test helpers for the suggestion core.

use worldtrue_common::{Event, SuggestedEventWithSource};

use crate::orchestrator::SuggestionObserver;

/// Observer that records every notification in order.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    pub searching: Vec<bool>,
    pub found: Vec<Vec<SuggestedEventWithSource>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Titles from every `suggestions_found` call, flattened.
    pub fn found_titles(&self) -> Vec<String> {
        self.found
            .iter()
            .flatten()
            .map(|s| s.title().to_string())
            .collect()
    }
}

impl SuggestionObserver for RecordingObserver {
    fn searching_changed(&mut self, searching: bool) {
        self.searching.push(searching);
    }

    fn suggestions_found(&mut self, suggestions: &[SuggestedEventWithSource]) {
        self.found.push(suggestions.to_vec());
    }
}

/// Source event used across the flow tests.
pub fn battle_of_x() -> Event {
    Event::new("e1", "Battle of X", 1800, 48.2, 16.4)
}
