use ai_client::truncate_to_char_boundary;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use worldtrue_common::SuggestedEvent;

use crate::error::ResearchError;

/// Descriptions longer than this are cut at a char boundary.
pub const MAX_DESCRIPTION_BYTES: usize = 1000;

// --- Depth ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResearchDepth {
    #[default]
    Quick,
    Medium,
    Deep,
}

impl ResearchDepth {
    /// How many events to ask the backend for.
    pub fn event_count(&self) -> usize {
        match self {
            ResearchDepth::Quick => 5,
            ResearchDepth::Medium => 10,
            ResearchDepth::Deep => 20,
        }
    }
}

impl std::fmt::Display for ResearchDepth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResearchDepth::Quick => write!(f, "quick"),
            ResearchDepth::Medium => write!(f, "medium"),
            ResearchDepth::Deep => write!(f, "deep"),
        }
    }
}

// --- Wire Types ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchRequest {
    pub query: String,
    pub depth: ResearchDepth,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct ResearchResponse {
    pub events: Vec<ResearchedEvent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ResearchedEvent {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub date: EventDate,
    pub location: EventLocation,
    /// Category tag, e.g. "battle", "treaty", "disaster".
    #[serde(rename = "type", default)]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EventDate {
    /// Negative for BCE.
    pub year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventLocation {
    /// Place name as it was known at the time.
    pub name: String,
    /// Present-day name, preferred for display and geocoding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modern_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

// --- Validation & Normalization ---

impl ResearchResponse {
    /// Reject payloads that parsed but cannot be shown as suggestions.
    pub fn validate(&self) -> Result<(), ResearchError> {
        for (i, event) in self.events.iter().enumerate() {
            if event.title.trim().is_empty() {
                return Err(ResearchError::Invalid(format!("event {i} has a blank title")));
            }
            if let Some(month) = event.date.month {
                if !(1..=12).contains(&month) {
                    return Err(ResearchError::Invalid(format!(
                        "event {i} has month {month} outside 1-12"
                    )));
                }
            }
            if let Some(lat) = event.location.latitude {
                if !(-90.0..=90.0).contains(&lat) {
                    return Err(ResearchError::Invalid(format!(
                        "event {i} has latitude {lat} outside [-90, 90]"
                    )));
                }
            }
            if let Some(lng) = event.location.longitude {
                if !(-180.0..=180.0).contains(&lng) {
                    return Err(ResearchError::Invalid(format!(
                        "event {i} has longitude {lng} outside [-180, 180]"
                    )));
                }
            }
        }
        Ok(())
    }
}

impl EventLocation {
    /// Modern name when the backend gave a non-blank one, otherwise the historical name.
    pub fn display_name(&self) -> &str {
        self.modern_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| self.name.trim())
    }
}

impl ResearchedEvent {
    pub fn into_suggestion(self) -> SuggestedEvent {
        let description = truncate_to_char_boundary(self.description.trim(), MAX_DESCRIPTION_BYTES);
        SuggestedEvent {
            title: self.title.trim().to_string(),
            description: description.to_string(),
            year: self.date.year,
            location: self.location.display_name().to_string(),
            kind: self.kind.trim().to_string(),
        }
    }
}
