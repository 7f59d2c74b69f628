//! Integration tests for HTTP handlers
#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use axum_test::TestServer;
use bytes::Bytes;
use futures::stream;
use presentation_http::{
    config::AppConfig, routes::create_router, state::AppState,
};
use relay_core::{
    CompletionPort, CompletionRequest, DeltaStream, RelayError,
};
use relay_speech::{Speaker, SpeechError, SpeechPort, SynthesizedAudio};
use secrecy::SecretString;
use serde_json::json;

/// Scripted completion relay
///
/// Validates like the real relay, then replays a fixed script. Counts how
/// many times the upstream would have been contacted.
struct MockCompletion {
    fragments: Vec<String>,
    failure: Option<fn() -> RelayError>,
    calls: AtomicUsize,
}

impl MockCompletion {
    fn answering(fragments: &[&str]) -> Self {
        Self {
            fragments: fragments.iter().map(ToString::to_string).collect(),
            failure: None,
            calls: AtomicUsize::new(0),
        }
    }

    fn failing(failure: fn() -> RelayError) -> Self {
        Self {
            fragments: Vec::new(),
            failure: Some(failure),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionPort for MockCompletion {
    async fn collect(&self, request: CompletionRequest) -> Result<String, RelayError> {
        request.validate()?;
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(failure) = self.failure {
            return Err(failure());
        }
        Ok(self.fragments.concat())
    }

    async fn stream(&self, request: CompletionRequest) -> Result<DeltaStream, RelayError> {
        request.validate()?;
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut items: Vec<Result<String, RelayError>> =
            self.fragments.iter().cloned().map(Ok).collect();
        if let Some(failure) = self.failure {
            items.push(Err(failure()));
        }
        Ok(Box::pin(stream::iter(items)))
    }
}

/// Scripted speech relay
struct MockSpeech {
    audio: Vec<u8>,
    calls: AtomicUsize,
}

impl MockSpeech {
    fn returning(audio: &[u8]) -> Self {
        Self {
            audio: audio.to_vec(),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeechPort for MockSpeech {
    async fn synthesize(
        &self,
        _speaker: Speaker,
        text: &str,
    ) -> Result<SynthesizedAudio, SpeechError> {
        if text.trim().is_empty() {
            return Err(SpeechError::InvalidText(
                "text must not be empty".to_string(),
            ));
        }
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(SynthesizedAudio::mp3(Bytes::from(self.audio.clone())))
    }
}

fn configured_app_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.completion.api_key = Some(SecretString::from("test-key"));
    config.speech.api_key = Some(SecretString::from("xi-test-key"));
    config.speech.voice_a = Some("voice-a".to_string());
    config.speech.voice_b = Some("voice-b".to_string());
    config
}

fn test_server(completion: Arc<MockCompletion>, speech: Arc<MockSpeech>) -> TestServer {
    test_server_with_config(completion, speech, configured_app_config())
}

fn test_server_with_config(
    completion: Arc<MockCompletion>,
    speech: Arc<MockSpeech>,
    config: AppConfig,
) -> TestServer {
    let state = AppState {
        completion,
        speech,
        config: Arc::new(config),
    };
    TestServer::new(create_router(state)).expect("test server")
}

fn user_messages(content: &str) -> serde_json::Value {
    json!({ "messages": [{ "role": "user", "content": content }] })
}

#[tokio::test]
async fn chat_returns_aggregated_text() {
    let completion = Arc::new(MockCompletion::answering(&["Hej ", "med ", "dig"]));
    let server = test_server(Arc::clone(&completion), Arc::new(MockSpeech::returning(b"")));

    let response = server.post("/v1/chat").json(&user_messages("Hej")).await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["text"], "Hej med dig");
    assert_eq!(completion.calls(), 1);
}

#[tokio::test]
async fn chat_rejects_empty_messages_without_upstream_call() {
    let completion = Arc::new(MockCompletion::answering(&["unused"]));
    let server = test_server(Arc::clone(&completion), Arc::new(MockSpeech::returning(b"")));

    let response = server.post("/v1/chat").json(&json!({ "messages": [] })).await;

    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "bad_request");
    assert_eq!(completion.calls(), 0);
}

#[tokio::test]
async fn chat_passes_upstream_error_status_through() {
    let completion = Arc::new(MockCompletion::failing(|| RelayError::UpstreamStatus {
        status: 500,
        detail: "upstream exploded".to_string(),
    }));
    let server = test_server(completion, Arc::new(MockSpeech::returning(b"")));

    let response = server.post("/v1/chat").json(&user_messages("Hej")).await;

    response.assert_status(axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "upstream_error");
    assert_eq!(body["details"], "upstream exploded");
}

#[tokio::test]
async fn chat_maps_empty_completion_to_bad_gateway() {
    let completion = Arc::new(MockCompletion::failing(|| RelayError::EmptyCompletion));
    let server = test_server(completion, Arc::new(MockSpeech::returning(b"")));

    let response = server.post("/v1/chat").json(&user_messages("Hej")).await;

    response.assert_status(axum::http::StatusCode::BAD_GATEWAY);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "empty_completion");
}

#[tokio::test]
async fn chat_stream_emits_delta_events_and_sentinel() {
    let completion = Arc::new(MockCompletion::answering(&["Hej ", "med ", "dig"]));
    let server = test_server(completion, Arc::new(MockSpeech::returning(b"")));

    let response = server
        .post("/v1/chat/stream")
        .json(&user_messages("Hej"))
        .await;

    response.assert_status_ok();
    let body = response.text();
    assert!(body.contains(r#"data: {"delta":"Hej "}"#));
    assert!(body.contains(r#"data: {"delta":"med "}"#));
    assert!(body.contains(r#"data: {"delta":"dig"}"#));
    assert!(body.contains("data: [DONE]"));
    // Sentinel must come last
    let done_pos = body.find("data: [DONE]").unwrap();
    let last_delta_pos = body.rfind(r#""delta""#).unwrap();
    assert!(done_pos > last_delta_pos);
}

#[tokio::test]
async fn chat_stream_reports_midstream_failure_in_band() {
    let completion = Arc::new(MockCompletion {
        fragments: vec!["Hej ".to_string()],
        failure: Some(|| RelayError::StreamInterrupted("connection reset".to_string())),
        calls: AtomicUsize::new(0),
    });
    let server = test_server(completion, Arc::new(MockSpeech::returning(b"")));

    let response = server
        .post("/v1/chat/stream")
        .json(&user_messages("Hej"))
        .await;

    // The stream was already committed with 200; the failure arrives in-band
    response.assert_status_ok();
    let body = response.text();
    assert!(body.contains(r#"data: {"delta":"Hej "}"#));
    assert!(body.contains(r#""error""#));
    assert!(body.contains("data: [DONE]"));
}

#[tokio::test]
async fn chat_stream_rejects_invalid_request_before_streaming() {
    let completion = Arc::new(MockCompletion::answering(&["unused"]));
    let server = test_server(Arc::clone(&completion), Arc::new(MockSpeech::returning(b"")));

    let response = server
        .post("/v1/chat/stream")
        .json(&json!({ "messages": [{ "role": "user", "content": "   " }] }))
        .await;

    response.assert_status_bad_request();
    assert_eq!(completion.calls(), 0);
}

#[tokio::test]
async fn speech_returns_base64_audio() {
    let speech = Arc::new(MockSpeech::returning(b"abc"));
    let server = test_server(Arc::new(MockCompletion::answering(&[])), Arc::clone(&speech));

    let response = server
        .post("/v1/speech")
        .json(&json!({ "speaker": "A", "text": "Velkommen" }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["base64"], "YWJj");
    assert_eq!(body["mime"], "audio/mpeg");
    assert_eq!(speech.calls(), 1);
}

#[tokio::test]
async fn speech_rejects_unknown_speaker() {
    let speech = Arc::new(MockSpeech::returning(b"abc"));
    let server = test_server(Arc::new(MockCompletion::answering(&[])), Arc::clone(&speech));

    let response = server
        .post("/v1/speech")
        .json(&json!({ "speaker": "C", "text": "Hej" }))
        .await;

    assert!(response.status_code().is_client_error());
    assert_eq!(speech.calls(), 0);
}

#[tokio::test]
async fn speech_rejects_blank_text_without_upstream_call() {
    let speech = Arc::new(MockSpeech::returning(b"abc"));
    let server = test_server(Arc::new(MockCompletion::answering(&[])), Arc::clone(&speech));

    let response = server
        .post("/v1/speech")
        .json(&json!({ "speaker": "B", "text": "   " }))
        .await;

    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "bad_request");
    assert_eq!(speech.calls(), 0);
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let server = test_server(
        Arc::new(MockCompletion::answering(&[])),
        Arc::new(MockSpeech::returning(b"")),
    );

    let response = server.get("/health").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ok");
    assert!(body["version"].as_str().is_some());
}

#[tokio::test]
async fn ready_endpoint_reports_configured_relays() {
    let server = test_server(
        Arc::new(MockCompletion::answering(&[])),
        Arc::new(MockSpeech::returning(b"")),
    );

    let response = server.get("/ready").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["ready"], true);
}

#[tokio::test]
async fn ready_endpoint_fails_when_unconfigured() {
    let server = test_server_with_config(
        Arc::new(MockCompletion::answering(&[])),
        Arc::new(MockSpeech::returning(b"")),
        AppConfig::default(),
    );

    let response = server.get("/ready").await;

    response.assert_status(axum::http::StatusCode::SERVICE_UNAVAILABLE);
    let body: serde_json::Value = response.json();
    assert_eq!(body["ready"], false);
    assert_eq!(body["completion"]["configured"], false);
    assert_eq!(body["speech"]["configured"], false);
}
