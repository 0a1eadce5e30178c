use indexmap::IndexMap;
use tracing::{debug, info};
use worldtrue_common::SuggestedEventWithSource;

/// How a pending suggestion left the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingOutcome {
    AddedToMap,
    Dismissed,
}

/// Suggestions awaiting an add-to-map or dismiss decision.
///
/// Insertion order is preserved and titles are unique: the first suggestion
/// seen with a given title wins, later ones are dropped.
#[derive(Debug, Clone, Default)]
pub struct PendingQueue {
    items: IndexMap<String, SuggestedEventWithSource>,
}

impl PendingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append suggestions whose titles are not already pending. Returns how
    /// many were appended.
    pub fn add_batch<I>(&mut self, batch: I) -> usize
    where
        I: IntoIterator<Item = SuggestedEventWithSource>,
    {
        let before = self.items.len();
        for item in batch {
            if self.items.contains_key(item.title()) {
                debug!(title = item.title(), "Dropping duplicate pending suggestion");
                continue;
            }
            self.items.insert(item.title().to_string(), item);
        }
        self.items.len() - before
    }

    /// Remove the suggestion with this title. Unknown titles are a no-op.
    pub fn remove_by_title(&mut self, title: &str) -> bool {
        self.items.shift_remove(title).is_some()
    }

    /// Take a suggestion out of the queue so it can be placed on the map.
    pub fn accept(&mut self, title: &str) -> Option<SuggestedEventWithSource> {
        let item = self.items.shift_remove(title)?;
        log_outcome(&item, PendingOutcome::AddedToMap);
        Some(item)
    }

    pub fn dismiss(&mut self, title: &str) -> bool {
        match self.items.shift_remove(title) {
            Some(item) => {
                log_outcome(&item, PendingOutcome::Dismissed);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, title: &str) -> Option<&SuggestedEventWithSource> {
        self.items.get(title)
    }

    pub fn contains(&self, title: &str) -> bool {
        self.items.contains_key(title)
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SuggestedEventWithSource> {
        self.items.values()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn log_outcome(item: &SuggestedEventWithSource, outcome: PendingOutcome) {
    info!(
        title = item.title(),
        source_event_id = %item.source_event_id,
        ?outcome,
        "Pending suggestion resolved"
    );
}
