//! HTTP-level tests for the OpenAI adapter against a local stub server.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use chatterm::{
    ChatSession, CompletionClient, OpenAiClient, PromptRenderer, RenderMode, SessionConfig,
    Transcript, QUOTA_REMEDIATION,
};

fn client_for(server: &MockServer) -> OpenAiClient {
    OpenAiClient::new("sk-test", format!("{}/v1", server.uri()), Duration::from_secs(5))
}

fn body_of(req: &Request) -> serde_json::Value {
    serde_json::from_slice(&req.body).unwrap_or_default()
}

fn transcript_with(text: &str) -> Transcript {
    let mut transcript = Transcript::new();
    transcript.push_user(text);
    transcript
}

#[tokio::test]
async fn test_role_list_goes_to_chat_completions() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-5",
            "max_completion_tokens": 8000,
            "messages": [
                {"role": "system", "content": "SYS"},
                {"role": "user", "content": "Hi"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"finish_reason": "stop", "message": {"role": "assistant", "content": "Hello!"}}],
            "usage": {"prompt_tokens": 9, "completion_tokens": 3, "total_tokens": 12}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = SessionConfig::new("gpt-5").with_system_prompt("SYS");
    let request = PromptRenderer::RoleList.build_request(&config, &transcript_with("Hi"));
    let response = client_for(&server)
        .complete(&request)
        .await
        .expect("completion failed");

    assert_eq!(response.text(), Some("Hello!"));
    assert_eq!(response.usage.map(|u| u.total_tokens), Some(12));
}

#[tokio::test]
async fn test_flat_prompt_goes_to_responses_with_options() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/responses"))
        .and(body_partial_json(json!({
            "model": "gpt-5",
            "input": "SYS\n\nUser: Hi\nAssistant:",
            "text": {"verbosity": "medium", "format": {"type": "text"}},
            "reasoning": {"effort": "medium"}
        })))
        .and(|req: &Request| body_of(req).get("temperature").is_none())
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "completed",
            "output": [
                {"type": "reasoning", "summary": []},
                {"type": "message", "content": [{"type": "output_text", "text": "Hello!"}]}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = SessionConfig::new("gpt-5")
        .with_system_prompt("SYS")
        .with_render_mode(RenderMode::FlatPrompt);
    let request = PromptRenderer::FlatPrompt.build_request(&config, &transcript_with("Hi"));
    let response = client_for(&server)
        .complete(&request)
        .await
        .expect("completion failed");

    assert_eq!(response.text(), Some("Hello!"));
}

#[tokio::test]
async fn test_classic_model_flat_prompt_sends_temperature_not_reasoning() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/responses"))
        .and(body_partial_json(json!({"model": "gpt-4o", "temperature": 0.5})))
        .and(|req: &Request| body_of(req).get("reasoning").is_none())
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "completed",
            "output": [{"type": "message", "content": [{"type": "output_text", "text": "Hi!"}]}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = SessionConfig::new("gpt-4o")
        .with_temperature(0.5)
        .with_render_mode(RenderMode::FlatPrompt);
    let request = PromptRenderer::FlatPrompt.build_request(&config, &transcript_with("Hello"));
    let response = client_for(&server)
        .complete(&request)
        .await
        .expect("completion failed");

    assert_eq!(response.text(), Some("Hi!"));
}

#[tokio::test]
async fn test_error_message_carries_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(401).set_body_string(r#"{"error":{"code":"invalid_api_key"}}"#),
        )
        .mount(&server)
        .await;

    let request =
        PromptRenderer::RoleList.build_request(&SessionConfig::default(), &transcript_with("Hi"));
    let err = client_for(&server)
        .complete(&request)
        .await
        .expect_err("should fail");

    let message = err.to_string();
    assert!(message.contains("401"), "{message}");
    assert!(message.contains("invalid_api_key"), "{message}");
}

#[tokio::test]
async fn test_session_maps_http_429_to_remediation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": {"type": "insufficient_quota", "message": "You exceeded your current quota"}
        })))
        .mount(&server)
        .await;

    let mut session = ChatSession::new(
        SessionConfig::default(),
        std::sync::Arc::new(client_for(&server)),
    );
    let outcome = session.submit("Hi").await.expect("submit failed");

    assert_eq!(outcome.text(), QUOTA_REMEDIATION);
    assert_eq!(session.transcript().len(), 1);
}
