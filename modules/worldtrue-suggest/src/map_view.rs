use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;
use worldtrue_common::{Event, GeoPoint, SuggestedEvent, SuggestedEventWithSource};

use crate::error::SuggestError;
use crate::orchestrator::{SuggestionObserver, SuggestionOrchestrator};
use crate::pending::PendingQueue;
use crate::zoom::zoom_for;

/// Where the camera should fly when an event is highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraTransition {
    pub center: GeoPoint,
    pub zoom: f64,
}

/// Render-only view of the controller's state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapSnapshot {
    pub highlighted_event_id: Option<String>,
    pub event_count: usize,
    pub pending_count: usize,
    pub searching: bool,
}

/// Marker, highlight and suggestion state for one map.
#[derive(Debug, Default)]
pub struct MapViewController {
    events: Vec<Event>,
    highlighted: Option<String>,
    searching: bool,
    pending: PendingQueue,
}

impl MapViewController {
    pub fn new(events: Vec<Event>) -> Self {
        Self {
            events,
            ..Self::default()
        }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn event(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    /// Replace the on-map events. A highlight on a removed event is cleared.
    pub fn set_events(&mut self, events: Vec<Event>) {
        self.events = events;
        if let Some(id) = &self.highlighted {
            if self.event(id).is_none() {
                self.highlighted = None;
            }
        }
    }

    pub fn add_event(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn highlighted(&self) -> Option<&str> {
        self.highlighted.as_deref()
    }

    pub fn pending(&self) -> &PendingQueue {
        &self.pending
    }

    pub fn is_searching(&self) -> bool {
        self.searching
    }

    /// Change the highlighted event. Returns a camera transition when a
    /// different, known event becomes highlighted.
    pub fn highlight(&mut self, id: Option<&str>) -> Option<CameraTransition> {
        if self.highlighted.as_deref() == id {
            return None;
        }

        let Some(id) = id else {
            self.highlighted = None;
            return None;
        };

        let Some(target) = self.event(id) else {
            warn!(id, "Highlight requested for an event not on the map");
            self.highlighted = None;
            return None;
        };

        let center = target.point();
        let zoom = zoom_for(
            center,
            self.events.iter().filter(|e| e.id != id).map(Event::point),
        );
        debug!(id, zoom, "Highlight changed");

        self.highlighted = Some(id.to_string());
        Some(CameraTransition { center, zoom })
    }

    /// Look up events similar to the on-map event `id`, feeding the pending
    /// queue. Any earlier search for this map stops being reported.
    ///
    /// Failures are returned for callers that want to tell them apart; UI
    /// code should use [`Self::explore_or_empty`].
    pub async fn explore(
        &mut self,
        orchestrator: &SuggestionOrchestrator,
        id: &str,
    ) -> Result<Vec<SuggestedEvent>, SuggestError> {
        let source = self
            .event(id)
            .cloned()
            .ok_or_else(|| SuggestError::UnknownEvent(id.to_string()))?;
        orchestrator.find_similar(&source, self).await
    }

    /// Like `explore`, but any failure is logged and yields no suggestions.
    pub async fn explore_or_empty(
        &mut self,
        orchestrator: &SuggestionOrchestrator,
        id: &str,
    ) -> Vec<SuggestedEvent> {
        let Some(source) = self.event(id).cloned() else {
            warn!(id, "Explore requested for an event not on the map");
            return Vec::new();
        };
        orchestrator.find_similar_or_empty(&source, self).await
    }

    /// Move a pending suggestion onto the map at the given coordinates.
    pub fn add_pending_to_map(
        &mut self,
        title: &str,
        latitude: f64,
        longitude: f64,
    ) -> Option<Event> {
        let accepted = self.pending.accept(title)?;
        let event = Event::new(
            format!("suggested-{}", Uuid::new_v4()),
            accepted.event.title,
            accepted.event.year,
            latitude,
            longitude,
        );
        self.events.push(event.clone());
        Some(event)
    }

    pub fn dismiss_pending(&mut self, title: &str) -> bool {
        self.pending.dismiss(title)
    }

    pub fn snapshot(&self) -> MapSnapshot {
        MapSnapshot {
            highlighted_event_id: self.highlighted.clone(),
            event_count: self.events.len(),
            pending_count: self.pending.len(),
            searching: self.searching,
        }
    }
}

impl SuggestionObserver for MapViewController {
    fn searching_changed(&mut self, searching: bool) {
        self.searching = searching;
    }

    fn suggestions_found(&mut self, suggestions: &[SuggestedEventWithSource]) {
        let added = self.pending.add_batch(suggestions.iter().cloned());
        debug!(offered = suggestions.len(), added, "Pending suggestions updated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zoom::SOLITARY_ZOOM;

    fn map() -> MapViewController {
        MapViewController::new(vec![
            Event::new("paris", "Storming of the Bastille", 1789, 48.853, 2.369),
            Event::new("versailles", "Women's March on Versailles", 1789, 48.805, 2.120),
            Event::new("sydney", "First Fleet arrives", 1788, -33.86, 151.21),
        ])
    }

    #[test]
    fn highlight_zooms_on_nearest_other_event() {
        let mut map = map();
        let transition = map.highlight(Some("paris")).unwrap();
        assert_eq!(transition.center, GeoPoint::new(48.853, 2.369));
        assert_eq!(transition.zoom, 8.0);
        assert_eq!(map.highlighted(), Some("paris"));

        let transition = map.highlight(Some("sydney")).unwrap();
        assert_eq!(transition.zoom, 3.0);
    }

    #[test]
    fn highlighted_event_is_not_its_own_neighbor() {
        let mut map = MapViewController::new(vec![Event::new("only", "Alone", 1, 10.0, 10.0)]);
        assert_eq!(map.highlight(Some("only")).unwrap().zoom, SOLITARY_ZOOM);
    }

    #[test]
    fn same_highlight_twice_has_no_new_transition() {
        let mut map = map();
        assert!(map.highlight(Some("paris")).is_some());
        assert!(map.highlight(Some("paris")).is_none());
    }

    #[test]
    fn clearing_or_unknown_highlight_has_no_transition() {
        let mut map = map();
        map.highlight(Some("paris"));
        assert!(map.highlight(None).is_none());
        assert_eq!(map.highlighted(), None);

        assert!(map.highlight(Some("atlantis")).is_none());
        assert_eq!(map.highlighted(), None);
    }

    #[test]
    fn set_events_clears_stale_highlight() {
        let mut map = map();
        map.highlight(Some("sydney"));
        map.set_events(vec![Event::new("paris", "Storming of the Bastille", 1789, 48.853, 2.369)]);
        assert_eq!(map.highlighted(), None);
    }

    #[test]
    fn observer_feeds_pending_queue_and_searching_flag() {
        let mut map = map();
        let source = map.event("paris").unwrap().clone();
        let found = vec![SuggestedEvent {
            title: "Tennis Court Oath".into(),
            description: String::new(),
            year: 1789,
            location: "Versailles, France".into(),
            kind: "political".into(),
        }
        .with_source(&source)];

        map.searching_changed(true);
        assert!(map.snapshot().searching);

        map.suggestions_found(&found);
        map.suggestions_found(&found);
        map.searching_changed(false);

        let snapshot = map.snapshot();
        assert_eq!(snapshot.pending_count, 1);
        assert!(!snapshot.searching);

        let added = map.add_pending_to_map("Tennis Court Oath", 48.80, 2.13).unwrap();
        assert!(added.id.starts_with("suggested-"));
        assert_eq!(added.year, 1789);
        assert_eq!(map.events().len(), 4);
        assert!(map.pending().is_empty());
        assert!(map.add_pending_to_map("Tennis Court Oath", 0.0, 0.0).is_none());
    }
}
