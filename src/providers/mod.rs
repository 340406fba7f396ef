/*!
 * Provider implementations for text-to-speech services.
 *
 * This module contains client implementations for speech providers:
 * - ElevenLabs: ElevenLabs text-to-speech API integration
 * - Mock: Scriptable in-process provider for tests
 */

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::errors::ProviderError;

/// A voice offered by a speech provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceInfo {
    pub voice_id: String,
    pub name: String,
}

/// One line to synthesize, with the lines around it as prosody context
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechRequest {
    /// Voice to speak with
    pub voice_id: String,
    /// Text to speak
    pub text: String,
    /// Line spoken just before this one
    pub previous_text: Option<String>,
    /// Line spoken just after this one
    pub next_text: Option<String>,
}

impl SpeechRequest {
    pub fn new(voice_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            voice_id: voice_id.into(),
            text: text.into(),
            previous_text: None,
            next_text: None,
        }
    }

    /// Set the preceding line
    pub fn previous_text(mut self, previous_text: Option<impl Into<String>>) -> Self {
        self.previous_text = previous_text.map(Into::into);
        self
    }

    /// Set the following line
    pub fn next_text(mut self, next_text: Option<impl Into<String>>) -> Self {
        self.next_text = next_text.map(Into::into);
        self
    }
}

/// Common trait for all speech providers
///
/// This trait defines the interface that all provider implementations must follow,
/// allowing them to be used interchangeably by the voiceover generator.
#[async_trait]
pub trait SpeechProvider: Send + Sync + Debug {
    /// List the voices available to this account
    async fn list_voices(&self) -> Result<Vec<VoiceInfo>, ProviderError>;

    /// Synthesize one line and return the encoded audio
    async fn synthesize(&self, request: &SpeechRequest) -> Result<Bytes, ProviderError>;
}

pub mod elevenlabs;
pub mod mock;
