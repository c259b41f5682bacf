//! Infrastructure layer for sales-intel
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod audio;
pub mod config;
pub mod logging;
pub mod openai;
pub mod search;

// Re-export commonly used types
pub use audio::FileAudioPlayer;
pub use config::{
    ConfigLoader, FileConfig, FileDispatchConfig, FileLoggingConfig, FileOpenAiConfig,
    FileOutputConfig, FilePlaybackConfig, FileReplConfig, FileSearchConfig,
};
pub use logging::JsonlDispatchLogger;
pub use openai::{OpenAiClient, OpenAiSettings};
pub use search::{HttpSearchBackend, MockSearchBackend};
