use std::fmt;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use bytes::Bytes;
use log::{debug, error, warn};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::app_config::{TtsConfig, VoiceSettings};
use crate::errors::ProviderError;

use super::{SpeechProvider, SpeechRequest, VoiceInfo};

/// ElevenLabs client for interacting with the text-to-speech API
pub struct ElevenLabs {
    /// HTTP client for API requests
    client: Client,
    /// API key sent as `xi-api-key`
    api_key: String,
    /// API endpoint URL
    endpoint: String,
    /// Synthesis model
    model_id: String,
    /// Requested audio encoding
    output_format: String,
    /// Voice tuning applied to every request
    voice_settings: VoiceSettings,
    /// Maximum number of retry attempts
    max_retries: u32,
    /// Base backoff time in milliseconds for exponential backoff
    backoff_base_ms: u64,
    /// Optional rate limit in requests per minute
    rate_limit: Option<u32>,
    /// When the previous request was sent
    last_request: Mutex<Option<Instant>>,
}

/// Text-to-speech request body
#[derive(Debug, Serialize)]
pub struct TextToSpeechBody<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: &'a VoiceSettings,
    #[serde(skip_serializing_if = "Option::is_none")]
    previous_text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    next_text: Option<&'a str>,
}

/// Voice listing response
#[derive(Debug, Deserialize)]
pub struct VoicesResponse {
    pub voices: Vec<VoiceEntry>,
}

/// Individual voice in a listing
#[derive(Debug, Deserialize)]
pub struct VoiceEntry {
    pub voice_id: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl fmt::Debug for ElevenLabs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElevenLabs")
            .field("endpoint", &self.endpoint)
            .field("model_id", &self.model_id)
            .field("output_format", &self.output_format)
            .field("max_retries", &self.max_retries)
            .field("rate_limit", &self.rate_limit)
            .finish_non_exhaustive()
    }
}

impl ElevenLabs {
    /// Create a new ElevenLabs client from configuration
    pub fn from_config(config: &TtsConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProviderError::ConnectionError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model_id: config.model_id.clone(),
            output_format: config.output_format.clone(),
            voice_settings: config.voice_settings.clone(),
            max_retries: config.retry_count,
            backoff_base_ms: config.retry_backoff_ms,
            rate_limit: config.rate_limit,
            last_request: Mutex::new(None),
        })
    }

    /// Wait until the configured request spacing has elapsed
    async fn throttle(&self) {
        let Some(rate_limit) = self.rate_limit.filter(|limit| *limit > 0) else {
            return;
        };
        let spacing = Duration::from_millis(60_000 / rate_limit as u64);

        let mut last_request = self.last_request.lock().await;
        if let Some(previous) = *last_request {
            let elapsed = previous.elapsed();
            if elapsed < spacing {
                tokio::time::sleep(spacing - elapsed).await;
            }
        }
        *last_request = Some(Instant::now());
    }

    /// Map a non-success response onto a provider error
    async fn error_from_response(response: Response) -> ProviderError {
        let status = response.status();
        let message = response.text().await
            .unwrap_or_else(|_| "Failed to get error response text".to_string());

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::AuthenticationError(message),
            StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimitExceeded(message),
            _ => ProviderError::ApiError {
                status_code: status.as_u16(),
                message,
            },
        }
    }

    /// Send a request built by `build`, retrying transient failures
    async fn send_with_retry<F>(&self, build: F) -> Result<Response, ProviderError>
    where
        F: Fn() -> reqwest::RequestBuilder,
    {
        let mut attempt = 0;

        loop {
            self.throttle().await;

            let error = match build().send().await {
                Ok(response) if response.status().is_success() => return Ok(response),
                Ok(response) => Self::error_from_response(response).await,
                Err(e) => ProviderError::ConnectionError(e.to_string()),
            };

            if !error.is_retryable() || attempt >= self.max_retries {
                error!("ElevenLabs request failed: {}", error);
                return Err(error);
            }

            attempt += 1;
            let backoff_ms = backoff_delay_ms(self.backoff_base_ms, attempt);
            warn!(
                "ElevenLabs request failed: {} - retrying in {}ms (attempt {}/{})",
                error, backoff_ms, attempt + 1, self.max_retries + 1
            );
            tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
        }
    }
}

#[async_trait]
impl SpeechProvider for ElevenLabs {
    async fn list_voices(&self) -> Result<Vec<VoiceInfo>, ProviderError> {
        let url = format!("{}/v1/voices", self.endpoint);

        let response = self
            .send_with_retry(|| self.client.get(&url).header("xi-api-key", &self.api_key))
            .await?;

        let voices = response.json::<VoicesResponse>().await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        Ok(voices.voices
            .into_iter()
            .map(|voice| VoiceInfo {
                voice_id: voice.voice_id,
                name: voice.name.unwrap_or_default(),
            })
            .collect())
    }

    async fn synthesize(&self, request: &SpeechRequest) -> Result<Bytes, ProviderError> {
        let text = request.text.trim();
        if text.is_empty() {
            return Err(ProviderError::RequestFailed("Text is empty".to_string()));
        }

        let url = format!("{}/v1/text-to-speech/{}", self.endpoint, request.voice_id);
        let body = TextToSpeechBody {
            text,
            model_id: &self.model_id,
            voice_settings: &self.voice_settings,
            previous_text: request.previous_text.as_deref(),
            next_text: request.next_text.as_deref(),
        };

        debug!("Synthesizing with voice {}: {:.50}", request.voice_id, text);

        let response = self
            .send_with_retry(|| {
                self.client
                    .post(&url)
                    .query(&[("output_format", self.output_format.as_str())])
                    .header("xi-api-key", &self.api_key)
                    .header("accept", "audio/mpeg")
                    .json(&body)
            })
            .await?;

        let audio = response.bytes().await
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))?;

        if audio.is_empty() {
            return Err(ProviderError::ParseError("Empty audio response".to_string()));
        }

        Ok(audio)
    }
}

/// Delay before retry number `attempt` (1-based): `base * 2^(attempt-1)`, saturating
fn backoff_delay_ms(base_ms: u64, attempt: u32) -> u64 {
    let factor = 1u64.checked_shl(attempt.saturating_sub(1)).unwrap_or(u64::MAX);
    base_ms.saturating_mul(factor)
}
