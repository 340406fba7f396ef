/*!
 * Tests for provider implementations
 */

use questvox::errors::ProviderError;
use questvox::providers::mock::{MockBehavior, MockSpeechProvider};
use questvox::providers::{SpeechProvider, SpeechRequest};

/// Test the request builder
#[test]
fn test_speechRequest_builder_shouldSetContext() {
    let request = SpeechRequest::new("voice", "Hello.")
        .previous_text(Some("Before."))
        .next_text(None::<String>);

    assert_eq!(request.voice_id, "voice");
    assert_eq!(request.text, "Hello.");
    assert_eq!(request.previous_text.as_deref(), Some("Before."));
    assert_eq!(request.next_text, None);
}

/// Test the working mock
#[tokio::test]
async fn test_mockProvider_working_shouldReturnAudioAndRecordRequests() {
    let provider = MockSpeechProvider::working().with_voices(&[("v1", "Cook")]);
    let request = SpeechRequest::new("v1", "Hi.");

    let audio = provider.synthesize(&request).await.unwrap();

    assert_eq!(audio, MockSpeechProvider::audio_for(&request));
    assert_eq!(provider.request_count(), 1);
    assert_eq!(provider.requests(), vec![request]);
    assert_eq!(provider.list_voices().await.unwrap()[0].name, "Cook");
}

/// Test the failing mock
#[tokio::test]
async fn test_mockProvider_failing_shouldReturnErrors() {
    let provider = MockSpeechProvider::failing();

    let error = provider.synthesize(&SpeechRequest::new("v", "Hi.")).await.unwrap_err();
    assert!(matches!(error, ProviderError::ApiError { status_code: 503, .. }));
    assert!(provider.list_voices().await.is_err());
}

/// Test the intermittent mock
#[tokio::test]
async fn test_mockProvider_intermittent_shouldFailEveryNthRequest() {
    let provider = MockSpeechProvider::new(MockBehavior::Intermittent { fail_every: 3 });
    let request = SpeechRequest::new("v", "Hi.");

    let mut outcomes = Vec::new();
    for _ in 0..6 {
        outcomes.push(provider.synthesize(&request).await.is_ok());
    }

    assert_eq!(outcomes, vec![true, true, false, true, true, false]);
}

/// Test that mock clones share their request log
#[test]
fn test_mockProvider_clone_shouldShareRequestLog() {
    let provider = MockSpeechProvider::working();
    let clone = provider.clone();

    tokio_test::block_on(clone.synthesize(&SpeechRequest::new("v", "Hi."))).unwrap();

    assert_eq!(provider.request_count(), 1);
    assert_eq!(provider.requests()[0].text, "Hi.");
}
