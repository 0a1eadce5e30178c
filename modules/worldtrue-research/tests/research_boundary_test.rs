//! Behaviour every ResearchService caller relies on, exercised through the mock.

use std::sync::Arc;

use worldtrue_research::testing::{sample_response, MockResearcher};
use worldtrue_research::{ResearchDepth, ResearchError, ResearchService};

#[tokio::test]
async fn mock_records_queries_and_counts_calls() {
    let mock = MockResearcher::returning(sample_response("Battle", 3));

    let response = mock.research("Battles near Waterloo", ResearchDepth::Quick).await.unwrap();

    assert_eq!(response.events.len(), 3);
    assert_eq!(mock.calls(), 1);
    assert_eq!(
        mock.queries(),
        vec![("Battles near Waterloo".to_string(), ResearchDepth::Quick)]
    );
}

#[tokio::test]
async fn scripted_failure_propagates() {
    let mock = MockResearcher::failing(ResearchError::Status {
        status: 502,
        body: "bad gateway".into(),
    });

    let err = mock.research("q", ResearchDepth::Quick).await.unwrap_err();
    assert!(matches!(err, ResearchError::Status { status: 502, .. }));
    assert_eq!(mock.calls(), 1);
}

#[tokio::test]
async fn invalid_payload_surfaces_as_validation_error() {
    let mut response = sample_response("Treaty", 2);
    response.events[1].title = String::new();
    let mock = MockResearcher::returning(response);

    let err = mock.research("q", ResearchDepth::Quick).await.unwrap_err();
    assert!(matches!(err, ResearchError::Invalid(_)));
}

#[tokio::test]
async fn events_past_the_depth_limit_are_not_validated() {
    let mut response = sample_response("Treaty", 12);
    response.events[7].title = " ".into();
    let mock = MockResearcher::returning(response);

    let quick = mock.research("q", ResearchDepth::Quick).await.unwrap();
    assert_eq!(quick.events.len(), 5);
    assert_eq!(quick.events[4].title, "Treaty 5");

    let err = mock.research("q", ResearchDepth::Medium).await.unwrap_err();
    assert!(matches!(err, ResearchError::Invalid(_)));
}

#[tokio::test]
async fn outcome_can_change_between_calls() {
    let mock = MockResearcher::failing(ResearchError::Transport("offline".into()));
    assert!(mock.research("q", ResearchDepth::Quick).await.is_err());

    mock.set_outcome(Ok(sample_response("Siege", 1)));
    let response = mock.research("q", ResearchDepth::Quick).await.unwrap();
    assert_eq!(response.events[0].title, "Siege 1");
    assert_eq!(mock.calls(), 2);
}

#[tokio::test]
async fn gated_request_waits_for_release() {
    let (mock, gate) = MockResearcher::returning(sample_response("Battle", 1)).gated();
    let mock = Arc::new(mock);

    let handle = tokio::spawn({
        let mock = mock.clone();
        async move { mock.research("q", ResearchDepth::Quick).await }
    });

    tokio::task::yield_now().await;
    assert!(!handle.is_finished());

    gate.add_permits(1);
    let response = handle.await.unwrap().unwrap();
    assert_eq!(response.events.len(), 1);
}

#[tokio::test]
async fn arc_wrapped_service_delegates() {
    let mock = Arc::new(MockResearcher::returning(sample_response("Battle", 2)));
    let service: Arc<dyn ResearchService> = mock.clone();

    let response = service.research("q", ResearchDepth::Medium).await.unwrap();
    assert_eq!(response.events.len(), 2);
    assert_eq!(mock.queries()[0].1, ResearchDepth::Medium);
}
