//! Application layer for sales-intel
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::DispatchConfig;
pub use ports::{
    audio_player::{AudioPlayer, NoAudioPlayer, PlayerError},
    dispatch_logger::{DispatchEvent, DispatchLogger, NoDispatchLogger},
    llm::{DisabledNarrator, DisabledSummarizer, LlmError, Narrator, Summarizer},
    progress::{DispatchProgress, NoProgress},
    search_backend::{SearchBackend, SearchError},
    speech::{DisabledSpeech, SpeechError, SpeechSynthesizer},
};
pub use use_cases::dispatch_query::{DispatchError, DispatchQueryUseCase};
pub use use_cases::request_fence::{DispatchTicket, RequestFence};
