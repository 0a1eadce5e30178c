use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// --- Geo Types ---

/// A WGS84 coordinate pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Flat-plane distance in degrees: `sqrt(Δlat² + Δlng²)`.
    ///
    /// Not a great-circle distance and no antimeridian wraparound. Only good
    /// for ranking neighbors against each other.
    pub fn planar_distance(&self, other: &GeoPoint) -> f64 {
        let d_lat = self.lat - other.lat;
        let d_lng = self.lng - other.lng;
        (d_lat * d_lat + d_lng * d_lng).sqrt()
    }
}

// --- Events ---

/// An event plotted on the map. Negative years are BCE.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    pub year: i32,
    pub latitude: f64,
    pub longitude: f64,
}

impl Event {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        year: i32,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            year,
            latitude,
            longitude,
        }
    }

    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// A candidate event returned by a similarity search, not yet on the map.
///
/// Identity for dedup is `title`, compared exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SuggestedEvent {
    pub title: String,
    pub description: String,
    pub year: i32,
    /// Free-text place name.
    pub location: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl SuggestedEvent {
    /// Annotate with the on-map event that motivated the suggestion.
    pub fn with_source(self, source: &Event) -> SuggestedEventWithSource {
        SuggestedEventWithSource {
            event: self,
            source_event_id: source.id.clone(),
            source_event_title: source.title.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedEventWithSource {
    #[serde(flatten)]
    pub event: SuggestedEvent,
    pub source_event_id: String,
    pub source_event_title: String,
}

impl SuggestedEventWithSource {
    pub fn title(&self) -> &str {
        &self.event.title
    }
}

/// Render a signed year for display and prompts: `1800 CE`, `44 BCE`.
pub fn format_year(year: i32) -> String {
    if year < 0 {
        format!("{} BCE", year.unsigned_abs())
    } else {
        format!("{year} CE")
    }
}
