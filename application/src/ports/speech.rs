//! Text-to-speech port

use async_trait::async_trait;
use sales_intel_domain::AudioClip;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpeechError {
    #[error("Connection error: {0}")]
    Transport(String),

    #[error("TTS API error: {status}")]
    Status { status: u16, body: String },

    #[error("TTS API returned no audio")]
    EmptyAudio,
}

/// Collaborator that turns narration text into encoded audio
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<AudioClip, SpeechError>;
}

/// Synthesizer used when no speech credential is configured
pub struct DisabledSpeech;

#[async_trait]
impl SpeechSynthesizer for DisabledSpeech {
    async fn synthesize(&self, _text: &str) -> Result<AudioClip, SpeechError> {
        Err(SpeechError::EmptyAudio)
    }
}
