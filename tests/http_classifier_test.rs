//! Integration tests for the HTTP classifier client against a mock server

use blackout::adapters::classifier::{HttpClassifier, SemanticClassifier};
use blackout::config::schema::ClassifierConfig;
use blackout::config::secret_string;
use blackout::domain::ClassifierError;

fn config_for(server: &mockito::Server) -> ClassifierConfig {
    ClassifierConfig {
        endpoint: format!("{}/v1/classify", server.url()),
        api_key: None,
        timeout_seconds: 5,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_flat_array_response() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/classify")
        .with_status(200)
        .with_body(r#"["John Doe", "12 MG Road, Pune"]"#)
        .create_async()
        .await;

    let classifier = HttpClassifier::new(&config_for(&server)).unwrap();
    let phrases = classifier
        .forbidden_phrases("Patient John Doe lives at 12 MG Road, Pune", &[])
        .await
        .unwrap();

    assert_eq!(phrases, vec!["John Doe", "12 MG Road, Pune"]);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_prose_wrapped_response() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v1/classify")
        .with_status(200)
        .with_body("Here are the sensitive phrases:\n[\"John Doe\"]\nHope that helps!")
        .create_async()
        .await;

    let classifier = HttpClassifier::new(&config_for(&server)).unwrap();
    let phrases = classifier.forbidden_phrases("text", &[]).await.unwrap();
    assert_eq!(phrases, vec!["John Doe"]);
}

#[tokio::test]
async fn test_garbage_body_yields_empty_not_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v1/classify")
        .with_status(200)
        .with_body("I could not find anything sensitive in this document.")
        .create_async()
        .await;

    let classifier = HttpClassifier::new(&config_for(&server)).unwrap();
    let phrases = classifier.forbidden_phrases("text", &[]).await.unwrap();
    assert!(phrases.is_empty());
}

#[tokio::test]
async fn test_rate_limit_maps_to_retryable_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v1/classify")
        .with_status(429)
        .with_header("retry-after", "7")
        .create_async()
        .await;

    let classifier = HttpClassifier::new(&config_for(&server)).unwrap();
    let err = classifier.forbidden_phrases("text", &[]).await.unwrap_err();

    match err {
        ClassifierError::RateLimited(ref after) => assert_eq!(after, "7"),
        other => panic!("expected RateLimited, got {other:?}"),
    }
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_server_error_not_retryable() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v1/classify")
        .with_status(503)
        .with_body("overloaded")
        .create_async()
        .await;

    let classifier = HttpClassifier::new(&config_for(&server)).unwrap();
    let err = classifier.forbidden_phrases("text", &[]).await.unwrap_err();

    assert!(matches!(err, ClassifierError::ServerError { status: 503, .. }));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_unauthorized_maps_to_authentication_failed() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v1/classify")
        .with_status(401)
        .create_async()
        .await;

    let classifier = HttpClassifier::new(&config_for(&server)).unwrap();
    let err = classifier.forbidden_phrases("text", &[]).await.unwrap_err();
    assert!(matches!(err, ClassifierError::AuthenticationFailed(_)));
}

#[tokio::test]
async fn test_other_client_error_carries_status() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v1/classify")
        .with_status(422)
        .with_body("document too large")
        .create_async()
        .await;

    let classifier = HttpClassifier::new(&config_for(&server)).unwrap();
    let err = classifier.forbidden_phrases("text", &[]).await.unwrap_err();

    match err {
        ClassifierError::ClientError { status, message } => {
            assert_eq!(status, 422);
            assert_eq!(message, "document too large");
        }
        other => panic!("expected ClientError, got {other:?}"),
    }
}

#[tokio::test]
async fn test_api_key_sent_as_bearer_token() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/classify")
        .match_header("authorization", "Bearer test-api-key")
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let config = ClassifierConfig {
        api_key: Some(secret_string("test-api-key".to_string())),
        ..config_for(&server)
    };
    let classifier = HttpClassifier::new(&config).unwrap();
    classifier.forbidden_phrases("text", &[]).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_legacy_entities_with_labels() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v1/classify")
        .with_status(200)
        .with_body(
            r#"[{"text": "John Doe", "category": "name"},
                {"text": "diabetes", "category": "diagnosis"}]"#,
        )
        .create_async()
        .await;

    let classifier = HttpClassifier::new(&config_for(&server)).unwrap();
    let labeled = classifier.classify_entities("text", &[]).await.unwrap();

    assert_eq!(labeled.len(), 2);
    assert_eq!(labeled[0].text, "John Doe");
    assert_eq!(labeled[0].category.as_deref(), Some("name"));
    assert_eq!(labeled[1].category.as_deref(), Some("diagnosis"));
}

#[tokio::test]
async fn test_required_categories_forwarded_in_request_body() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/classify")
        .match_body(mockito::Matcher::PartialJson(serde_json::json!({
            "required_categories": ["name"]
        })))
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let classifier = HttpClassifier::new(&config_for(&server)).unwrap();
    classifier
        .forbidden_phrases("text", &["name".to_string()])
        .await
        .unwrap();
    mock.assert_async().await;
}
