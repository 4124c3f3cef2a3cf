use pagescope::ai::{AiConfig, AiError, CompletionClient, OpenAiClient};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, header, method, path},
};

fn config_for(server: &MockServer) -> AiConfig {
    AiConfig {
        api_key: Some("sk-test".to_string()),
        base_url: format!("{}/v1", server.uri()),
        model: "test-model".to_string(),
        ..AiConfig::default()
    }
}

#[tokio::test]
async fn test_complete_returns_first_choice() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "test-model",
            "max_tokens": 50,
            "messages": [{ "role": "user", "content": "Summarise this" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-1",
            "choices": [
                { "index": 0, "message": { "role": "assistant", "content": "A summary." } }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = OpenAiClient::new(&config_for(&server)).unwrap();
    let text = client.complete("Summarise this", 50, 0.3).await.unwrap();

    assert_eq!(text, "A summary.");
}

#[tokio::test]
async fn test_rate_limit_carries_retry_after() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
        .mount(&server)
        .await;

    let client = OpenAiClient::new(&config_for(&server)).unwrap();
    let err = client.complete("hi", 10, 0.0).await.unwrap_err();

    assert!(matches!(err, AiError::RateLimited { retry_after_secs: Some(7) }));
}

#[tokio::test]
async fn test_api_error_message_is_extracted() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": { "message": "Incorrect API key provided", "type": "invalid_request_error" }
        })))
        .mount(&server)
        .await;

    let client = OpenAiClient::new(&config_for(&server)).unwrap();
    let err = client.complete("hi", 10, 0.0).await.unwrap_err();

    match err {
        AiError::Api { status, message } => {
            assert_eq!(status.as_u16(), 401);
            assert_eq!(message, "Incorrect API key provided");
        }
        other => panic!("expected API error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_no_choices_is_empty_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let client = OpenAiClient::new(&config_for(&server)).unwrap();
    let err = client.complete("hi", 10, 0.0).await.unwrap_err();

    assert!(matches!(err, AiError::EmptyResponse));
}

#[tokio::test]
async fn test_garbage_body_is_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = OpenAiClient::new(&config_for(&server)).unwrap();
    let err = client.complete("hi", 10, 0.0).await.unwrap_err();

    assert!(matches!(err, AiError::InvalidResponse(_)), "got {err:?}");
}
