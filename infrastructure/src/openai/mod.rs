//! OpenAI adapter
//!
//! [`OpenAiClient`] implements the summarizer, narrator and speech ports
//! against the chat completion and audio speech endpoints.

mod client;
pub mod protocol;

pub use client::{
    ChatParams, FORMAT_PARAMS, NO_DATA_SUMMARY, OpenAiClient, OpenAiSettings, SPOKEN_PARAMS,
    SUMMARY_PARAMS,
};
