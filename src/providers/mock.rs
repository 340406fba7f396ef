/*!
 * Mock speech provider for testing.
 *
 * This module provides a mock provider that simulates different behaviors:
 * - `MockSpeechProvider::working()` - Always returns audio
 * - `MockSpeechProvider::intermittent(n)` - Fails every nth request
 * - `MockSpeechProvider::failing()` - Always fails with an error
 */

use async_trait::async_trait;
use bytes::Bytes;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::errors::ProviderError;
use crate::providers::{SpeechProvider, SpeechRequest, VoiceInfo};

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds
    Working,
    /// Fails intermittently (every Nth request)
    Intermittent { fail_every: usize },
    /// Always fails with an error
    Failing,
}

/// Mock provider for testing voiceover generation
#[derive(Debug, Clone)]
pub struct MockSpeechProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Voices returned by `list_voices`
    voices: Vec<VoiceInfo>,
    /// Request counter for intermittent failures
    request_count: Arc<AtomicUsize>,
    /// Every synthesis request received, in order
    requests: Arc<Mutex<Vec<SpeechRequest>>>,
}

impl MockSpeechProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            voices: Vec::new(),
            request_count: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create an intermittently failing mock provider
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every: fail_every.max(1) })
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Offer the given (voice id, name) pairs from `list_voices`
    pub fn with_voices(mut self, voices: &[(&str, &str)]) -> Self {
        self.voices = voices
            .iter()
            .map(|(voice_id, name)| VoiceInfo {
                voice_id: voice_id.to_string(),
                name: name.to_string(),
            })
            .collect();
        self
    }

    /// Synthesis requests received so far
    pub fn requests(&self) -> Vec<SpeechRequest> {
        self.requests.lock().map(|requests| requests.clone()).unwrap_or_default()
    }

    /// Number of synthesis requests received so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Audio the mock returns for a request
    pub fn audio_for(request: &SpeechRequest) -> Bytes {
        Bytes::from(format!("AUDIO[{}]:{}", request.voice_id, request.text))
    }
}

#[async_trait]
impl SpeechProvider for MockSpeechProvider {
    async fn list_voices(&self) -> Result<Vec<VoiceInfo>, ProviderError> {
        match self.behavior {
            MockBehavior::Failing => Err(ProviderError::ConnectionError("Mock connection failure".to_string())),
            _ => Ok(self.voices.clone()),
        }
    }

    async fn synthesize(&self, request: &SpeechRequest) -> Result<Bytes, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        match self.behavior {
            MockBehavior::Working => Ok(Self::audio_for(request)),

            MockBehavior::Intermittent { fail_every } => {
                if count % fail_every == fail_every - 1 {
                    Err(ProviderError::ApiError {
                        status_code: 500,
                        message: format!("Simulated intermittent failure on request {}", count + 1),
                    })
                } else {
                    Ok(Self::audio_for(request))
                }
            }

            MockBehavior::Failing => Err(ProviderError::ApiError {
                status_code: 503,
                message: "Service unavailable".to_string(),
            }),
        }
    }
}
