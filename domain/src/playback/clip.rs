//! Synthesized audio clip

use crate::core::request::RequestId;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const MP3_MIME: &str = "audio/mpeg";

/// Bit rate assumed when estimating clip length from its size.
const ASSUMED_BITS_PER_SEC: u64 = 128_000;

/// Encoded speech audio (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioClip {
    #[serde(skip)]
    bytes: Vec<u8>,
    mime: String,
    byte_len: usize,
}

impl AudioClip {
    pub fn new(bytes: Vec<u8>, mime: impl Into<String>) -> Self {
        let byte_len = bytes.len();
        Self {
            bytes,
            mime: mime.into(),
            byte_len,
        }
    }

    pub fn mp3(bytes: Vec<u8>) -> Self {
        Self::new(bytes, MP3_MIME)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn len(&self) -> usize {
        self.byte_len
    }

    pub fn is_empty(&self) -> bool {
        self.byte_len == 0
    }

    /// File extension matching the mime type
    pub fn extension(&self) -> &'static str {
        match self.mime.as_str() {
            "audio/wav" | "audio/x-wav" => "wav",
            "audio/ogg" | "audio/opus" => "ogg",
            _ => "mp3",
        }
    }

    /// File name for the narration of `request_id`, e.g. `narration-3.mp3`
    pub fn file_name(&self, request_id: RequestId) -> String {
        format!("narration-{}.{}", request_id.value(), self.extension())
    }

    /// Length estimate assuming a constant 128 kbps stream
    pub fn estimated_duration(&self) -> Duration {
        Duration::from_secs_f64(self.byte_len as f64 * 8.0 / ASSUMED_BITS_PER_SEC as f64)
    }
}
