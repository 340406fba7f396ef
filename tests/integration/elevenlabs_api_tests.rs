/*!
 * Integration tests for the ElevenLabs client against a mock server
 */

use std::time::{Duration, Instant};

use questvox::app_config::TtsConfig;
use questvox::errors::ProviderError;
use questvox::providers::elevenlabs::ElevenLabs;
use questvox::providers::{SpeechProvider, SpeechRequest};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ElevenLabs {
    let config = TtsConfig {
        api_key: "test-key".to_string(),
        endpoint: server.uri(),
        retry_count: 2,
        retry_backoff_ms: 1,
        rate_limit: None,
        ..TtsConfig::default()
    };
    ElevenLabs::from_config(&config).unwrap()
}

/// Test voice listing
#[tokio::test]
async fn test_listVoices_shouldSendKeyAndParseVoices() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/voices"))
        .and(header("xi-api-key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "voices": [
                { "voice_id": "v1", "name": "Cook" },
                { "voice_id": "v2" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let voices = client_for(&server).list_voices().await.unwrap();

    assert_eq!(voices.len(), 2);
    assert_eq!(voices[0].voice_id, "v1");
    assert_eq!(voices[0].name, "Cook");
    assert_eq!(voices[1].name, "");
}

/// Test synthesis request shape and returned audio
#[tokio::test]
async fn test_synthesize_shouldPostTextWithContext() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/text-to-speech/v-cook"))
        .and(query_param("output_format", "mp3_44100_96"))
        .and(header("xi-api-key", "test-key"))
        .and(body_partial_json(json!({
            "text": "What am I to do?",
            "model_id": "eleven_multilingual_v2",
            "previous_text": "Hello.",
            "next_text": "What's wrong?",
            "voice_settings": { "use_speaker_boost": true }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ID3audio".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let request = SpeechRequest::new("v-cook", "What am I to do?")
        .previous_text(Some("Hello."))
        .next_text(Some("What's wrong?"));
    let audio = client_for(&server).synthesize(&request).await.unwrap();

    assert_eq!(audio.as_ref(), b"ID3audio");
}

/// Test that empty text never reaches the API
#[tokio::test]
async fn test_synthesize_withBlankText_shouldFailWithoutRequest() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = client_for(&server).synthesize(&SpeechRequest::new("v", "   ")).await;

    assert!(matches!(result, Err(ProviderError::RequestFailed(_))));
}

/// Test retry on server errors
#[tokio::test]
async fn test_synthesize_withTransientServerError_shouldRetry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ok".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let audio = client_for(&server).synthesize(&SpeechRequest::new("v", "Hi.")).await.unwrap();

    assert_eq!(audio.as_ref(), b"ok");
}

/// Test that authentication failures are not retried
#[tokio::test]
async fn test_synthesize_withUnauthorized_shouldFailImmediately() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
        .expect(1)
        .mount(&server)
        .await;

    let error = client_for(&server)
        .synthesize(&SpeechRequest::new("v", "Hi."))
        .await
        .unwrap_err();

    assert!(matches!(error, ProviderError::AuthenticationError(ref message) if message == "invalid key"));
}

/// Test that rate limiting gives up after the configured retries
#[tokio::test]
async fn test_synthesize_withPersistentRateLimit_shouldExhaustRetries() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429))
        .expect(3)
        .mount(&server)
        .await;

    let error = client_for(&server)
        .synthesize(&SpeechRequest::new("v", "Hi."))
        .await
        .unwrap_err();

    assert!(matches!(error, ProviderError::RateLimitExceeded(_)));
}

/// Test that other client errors are reported with their status
#[tokio::test]
async fn test_synthesize_withBadRequest_shouldReturnApiError() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(422).set_body_string("unknown voice"))
        .expect(1)
        .mount(&server)
        .await;

    let error = client_for(&server)
        .synthesize(&SpeechRequest::new("v", "Hi."))
        .await
        .unwrap_err();

    assert!(matches!(error, ProviderError::ApiError { status_code: 422, .. }));
}

/// Test client-side request spacing
#[tokio::test]
async fn test_synthesize_withRateLimit_shouldSpaceRequests() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ok".to_vec()))
        .mount(&server)
        .await;

    let config = TtsConfig {
        api_key: "test-key".to_string(),
        endpoint: server.uri(),
        rate_limit: Some(600),
        ..TtsConfig::default()
    };
    let client = ElevenLabs::from_config(&config).unwrap();
    let request = SpeechRequest::new("v", "Hi.");

    let started = Instant::now();
    client.synthesize(&request).await.unwrap();
    client.synthesize(&request).await.unwrap();

    assert!(started.elapsed() >= Duration::from_millis(100));
}

/// Test that the configured request timeout is applied to the HTTP client
#[tokio::test]
async fn test_fromConfig_withShortTimeout_shouldAbortSlowResponses() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/voices"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "voices": [] }))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let config = TtsConfig {
        api_key: "test-key".to_string(),
        endpoint: server.uri(),
        timeout_secs: 1,
        retry_count: 0,
        rate_limit: None,
        ..TtsConfig::default()
    };
    let client = ElevenLabs::from_config(&config).unwrap();

    let started = Instant::now();
    let error = client.list_voices().await.unwrap_err();

    assert!(matches!(error, ProviderError::ConnectionError(_)));
    assert!(started.elapsed() < Duration::from_secs(4));
}
