// Test doubles for the research boundary.
//
// MockResearcher answers from a scripted outcome, records every query, and
// can be gated so a request stays in flight until the test releases it.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use crate::error::ResearchError;
use crate::service::ResearchService;
use crate::types::{EventDate, EventLocation, ResearchDepth, ResearchResponse, ResearchedEvent};

/// Build a response with `n` events titled `"<prefix> 1"`, `"<prefix> 2"`, ...
pub fn sample_response(prefix: &str, n: usize) -> ResearchResponse {
    ResearchResponse {
        events: (1..=n)
            .map(|i| ResearchedEvent {
                title: format!("{prefix} {i}"),
                description: format!("Description of {prefix} {i}"),
                date: EventDate {
                    year: 1800 + i as i32,
                    month: None,
                    day: None,
                },
                location: EventLocation {
                    name: format!("Old place {i}"),
                    modern_name: Some(format!("Modern place {i}")),
                    latitude: None,
                    longitude: None,
                },
                kind: "battle".to_string(),
            })
            .collect(),
    }
}

pub struct MockResearcher {
    outcome: Mutex<Result<ResearchResponse, ResearchError>>,
    calls: AtomicUsize,
    queries: Mutex<Vec<(String, ResearchDepth)>>,
    gate: Option<Arc<Semaphore>>,
}

impl MockResearcher {
    pub fn returning(response: ResearchResponse) -> Self {
        Self {
            outcome: Mutex::new(Ok(response)),
            calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    pub fn failing(error: ResearchError) -> Self {
        Self {
            outcome: Mutex::new(Err(error)),
            ..Self::returning(ResearchResponse::default())
        }
    }

    /// Requests block until the returned semaphore gets a permit per request.
    pub fn gated(mut self) -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        self.gate = Some(gate.clone());
        (self, gate)
    }

    pub fn set_outcome(&self, outcome: Result<ResearchResponse, ResearchError>) {
        *self.outcome.lock().unwrap() = outcome;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<(String, ResearchDepth)> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResearchService for MockResearcher {
    async fn research(
        &self,
        query: &str,
        depth: ResearchDepth,
    ) -> Result<ResearchResponse, ResearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries
            .lock()
            .unwrap()
            .push((query.to_string(), depth));

        if let Some(gate) = &self.gate {
            gate.acquire()
                .await
                .map_err(|e| ResearchError::Transport(e.to_string()))?
                .forget();
        }

        let outcome = self.outcome.lock().unwrap().clone();
        let mut response = outcome?;
        response.events.truncate(depth.event_count());
        response.validate()?;
        Ok(response)
    }
}
