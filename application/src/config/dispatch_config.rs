//! Dispatch behavior switches.

use sales_intel_domain::search::DEFAULT_MAX_RESULTS;

/// Controls which stages of the dispatch sequence run.
///
/// `summarization_enabled` is resolved once at startup from credential
/// presence and gates summarize/format/narrate together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Send extracted keywords instead of the raw query.
    pub use_extraction: bool,
    /// Trim punctuation from tokens during extraction.
    pub strip_punctuation: bool,
    pub summarization_enabled: bool,
    /// Synthesize narration to audio.
    pub speech_enabled: bool,
    /// Start playback once audio is ready.
    pub autoplay: bool,
    pub max_results: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            use_extraction: false,
            strip_punctuation: false,
            summarization_enabled: true,
            speech_enabled: true,
            autoplay: true,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

impl DispatchConfig {
    pub fn with_extraction(mut self, on: bool) -> Self {
        self.use_extraction = on;
        self
    }

    pub fn with_strip_punctuation(mut self, on: bool) -> Self {
        self.strip_punctuation = on;
        self
    }

    pub fn with_summarization(mut self, on: bool) -> Self {
        self.summarization_enabled = on;
        self
    }

    pub fn with_speech(mut self, on: bool) -> Self {
        self.speech_enabled = on;
        self
    }

    pub fn with_autoplay(mut self, on: bool) -> Self {
        self.autoplay = on;
        self
    }

    pub fn with_max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }

    /// Speech needs narration, which needs summarization.
    pub fn speaks(&self) -> bool {
        self.summarization_enabled && self.speech_enabled
    }
}
