//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod audio_player;
pub mod dispatch_logger;
pub mod llm;
pub mod progress;
pub mod search_backend;
pub mod speech;
