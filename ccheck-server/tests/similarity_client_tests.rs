//! Similarity client tests against an in-process mock service

mod helpers;

use axum::http::StatusCode;
use ccheck_common::config::TextConfig;
use ccheck_common::CheckOutcome;
use ccheck_server::checkers::similarity_client::{MSG_TOO_SHORT, MSG_UNREACHABLE};
use ccheck_server::checkers::{SimilarityClient, TextScorer};
use helpers::{similarity_mock, similarity_mock_delayed};
use std::time::Duration;

const PASSAGE: &str = "It was the best of times, it was the worst of times.";

fn client(endpoint: &str) -> SimilarityClient {
    SimilarityClient::new(endpoint, "reference corpus passage", Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_high_score_flagged() {
    let (endpoint, captured) = similarity_mock(StatusCode::OK, r#"{"score": 0.95}"#).await;

    let outcome = client(&endpoint).score_text(PASSAGE).await;

    match outcome {
        CheckOutcome::Flagged(msg) => assert!(msg.contains("0.95"), "{}", msg),
        other => panic!("expected flagged, got {:?}", other),
    }

    let body = captured.last_body();
    assert_eq!(body["text1"], PASSAGE);
    assert_eq!(body["text2"], "reference corpus passage");
}

#[tokio::test]
async fn test_low_score_cleared_two_decimals() {
    let (endpoint, _) = similarity_mock(StatusCode::OK, r#"{"score": 0.3}"#).await;

    let outcome = client(&endpoint).score_text(PASSAGE).await;

    match outcome {
        CheckOutcome::Cleared(msg) => assert!(msg.contains("0.30"), "{}", msg),
        other => panic!("expected cleared, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_score_counts_as_zero() {
    let (endpoint, _) = similarity_mock(StatusCode::OK, r#"{"matches": []}"#).await;

    let outcome = client(&endpoint).score_text(PASSAGE).await;

    match outcome {
        CheckOutcome::Cleared(msg) => assert!(msg.contains("0.00"), "{}", msg),
        other => panic!("expected cleared, got {:?}", other),
    }
}

#[tokio::test]
async fn test_short_text_never_calls_service() {
    let (endpoint, captured) = similarity_mock(StatusCode::OK, r#"{"score": 0.99}"#).await;
    let client = client(&endpoint);

    for text in ["", "short", "nineteen characters"] {
        assert!(text.chars().count() < 20);
        let outcome = client.score_text(text).await;
        assert_eq!(outcome, CheckOutcome::Inconclusive(MSG_TOO_SHORT.to_string()));
    }

    assert_eq!(captured.hits(), 0);
}

#[tokio::test]
async fn test_exactly_min_length_is_scored() {
    let (endpoint, captured) = similarity_mock(StatusCode::OK, r#"{"score": 0.1}"#).await;

    let text = "x".repeat(20);
    let outcome = client(&endpoint).score_text(&text).await;

    assert!(matches!(outcome, CheckOutcome::Cleared(_)));
    assert_eq!(captured.hits(), 1);
}

#[tokio::test]
async fn test_non_200_is_transport_error() {
    for status in [StatusCode::BAD_GATEWAY, StatusCode::NOT_FOUND, StatusCode::FORBIDDEN] {
        let (endpoint, _) = similarity_mock(status, r#"{"score": 0.95}"#).await;
        let outcome = client(&endpoint).score_text(PASSAGE).await;
        assert_eq!(
            outcome,
            CheckOutcome::TransportError(MSG_UNREACHABLE.to_string()),
            "status {}",
            status
        );
    }
}

#[tokio::test]
async fn test_malformed_body_is_transport_error() {
    for body in ["not json", r#"{"score": "very high"}"#, r#"{"score": null}"#] {
        let (endpoint, _) = similarity_mock(StatusCode::OK, body).await;
        let outcome = client(&endpoint).score_text(PASSAGE).await;
        assert_eq!(
            outcome,
            CheckOutcome::TransportError(MSG_UNREACHABLE.to_string()),
            "body {}",
            body
        );
    }
}

#[tokio::test]
async fn test_out_of_range_score_is_transport_error() {
    for body in [r#"{"score": 1.7}"#, r#"{"score": -0.2}"#] {
        let (endpoint, captured) = similarity_mock(StatusCode::OK, body).await;
        let outcome = client(&endpoint).score_text(PASSAGE).await;
        assert_eq!(
            outcome,
            CheckOutcome::TransportError(MSG_UNREACHABLE.to_string()),
            "body {}",
            body
        );
        assert_eq!(captured.hits(), 1);
    }
}

#[tokio::test]
async fn test_boundary_scores_accepted() {
    let (endpoint, _) = similarity_mock(StatusCode::OK, r#"{"score": 1.0}"#).await;
    assert!(matches!(
        client(&endpoint).score_text(PASSAGE).await,
        CheckOutcome::Flagged(_)
    ));

    let (endpoint, _) = similarity_mock(StatusCode::OK, r#"{"score": 0}"#).await;
    assert!(matches!(
        client(&endpoint).score_text(PASSAGE).await,
        CheckOutcome::Cleared(_)
    ));
}

#[tokio::test]
async fn test_timeout_is_transport_error() {
    let (endpoint, _) =
        similarity_mock_delayed(StatusCode::OK, r#"{"score": 0.95}"#, Duration::from_secs(3)).await;
    let client =
        SimilarityClient::new(&endpoint, "reference", Duration::from_millis(200)).unwrap();

    let outcome = client.score_text(PASSAGE).await;

    assert_eq!(outcome, CheckOutcome::TransportError(MSG_UNREACHABLE.to_string()));
}

#[tokio::test]
async fn test_from_config_applies_threshold_and_min_length() {
    let (endpoint, captured) = similarity_mock(StatusCode::OK, r#"{"score": 0.6}"#).await;
    let config = TextConfig {
        endpoint: endpoint.clone(),
        threshold: 0.5,
        min_length: 5,
        ..TextConfig::default()
    };
    let client = SimilarityClient::from_config(&config, "custom reference").unwrap();

    let outcome = client.score_text("six ch").await;

    match outcome {
        CheckOutcome::Flagged(msg) => assert!(msg.contains("0.60"), "{}", msg),
        other => panic!("expected flagged, got {:?}", other),
    }
    assert_eq!(captured.last_body()["text2"], "custom reference");
}
