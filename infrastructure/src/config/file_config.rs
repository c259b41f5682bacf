//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

use sales_intel_domain::search::DEFAULT_MAX_RESULTS;
use sales_intel_domain::{ConfigIssue, ConfigIssueCode, OutputFormat};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Remote search endpoint used when none is configured
pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://sales-mcp-be.azurewebsites.net/api/SIT/search";

/// Voices accepted by the speech endpoint
pub const KNOWN_VOICES: &[&str] = &["alloy", "echo", "fable", "onyx", "nova", "shimmer"];

/// Raw search configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSearchConfig {
    pub endpoint: String,
    pub max_results: usize,
    /// Request timeout for the remote backend
    pub timeout_secs: u64,
    /// Local dataset used in mock mode
    pub mock_data: PathBuf,
    pub use_mock: bool,
}

impl Default for FileSearchConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
            max_results: DEFAULT_MAX_RESULTS,
            timeout_secs: 30,
            mock_data: PathBuf::from("mock_data.json"),
            use_mock: false,
        }
    }
}

/// Raw OpenAI configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOpenAiConfig {
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Inline API key; takes precedence over `api_key_env`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub base_url: String,
    pub summary_model: String,
    /// Model for formatting and narration
    pub style_model: String,
    pub speech_model: String,
    pub voice: String,
}

impl Default for FileOpenAiConfig {
    fn default() -> Self {
        Self {
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_key: None,
            base_url: "https://api.openai.com".to_string(),
            summary_model: "gpt-4o".to_string(),
            style_model: "gpt-4o-mini".to_string(),
            speech_model: "tts-1-hd".to_string(),
            voice: "alloy".to_string(),
        }
    }
}

impl FileOpenAiConfig {
    /// The credential, if one is configured. Blank values count as absent.
    pub fn resolve_api_key(&self) -> Option<String> {
        let inline = self
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty());
        if let Some(key) = inline {
            return Some(key.to_string());
        }
        std::env::var(&self.api_key_env)
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
    }
}

/// Raw dispatch configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDispatchConfig {
    pub use_extraction: bool,
    pub strip_punctuation: bool,
    pub speech: bool,
    pub autoplay: bool,
}

impl Default for FileDispatchConfig {
    fn default() -> Self {
        Self {
            use_extraction: false,
            strip_punctuation: false,
            speech: true,
            autoplay: true,
        }
    }
}

/// Raw playback configuration from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePlaybackConfig {
    /// Where narration clips are written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    /// External player invoked with the clip path, e.g. "mpg123"
    pub command: String,
}

impl FilePlaybackConfig {
    pub fn resolved_output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|d| d.join("sales-intel").join("audio"))
                .unwrap_or_else(|| PathBuf::from("sales-intel-audio"))
        })
    }

    /// Player command split on whitespace; `None` when unset.
    pub fn command_line(&self) -> Option<(String, Vec<String>)> {
        let mut parts = self.command.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some((program, parts.collect()))
    }
}

/// Raw output configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Output format (uses domain type)
    pub format: Option<OutputFormat>,
    /// Enable colored terminal output
    pub color: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
        }
    }
}

/// Raw REPL configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileReplConfig {
    /// Show progress indicators
    pub show_progress: bool,
    /// Path to history file
    pub history_file: Option<String>,
}

impl Default for FileReplConfig {
    fn default() -> Self {
        Self {
            show_progress: true,
            history_file: None,
        }
    }
}

/// Raw logging configuration from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL dispatch event log; disabled when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dispatch_log: Option<PathBuf>,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub search: FileSearchConfig,
    pub openai: FileOpenAiConfig,
    pub dispatch: FileDispatchConfig,
    pub playback: FilePlaybackConfig,
    pub output: FileOutputConfig,
    pub repl: FileReplConfig,
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Check the configuration for values that will not work as intended.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.search.max_results == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::ZeroMaxResults,
                "search.max_results is 0; the backend will be asked for nothing",
            ));
        }

        if !self.search.use_mock && self.search.endpoint.trim().is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::MissingEndpoint,
                "search.endpoint is empty and mock mode is off",
            ));
        }

        if !KNOWN_VOICES.contains(&self.openai.voice.as_str()) {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::InvalidEnumValue {
                    field: "openai.voice".to_string(),
                    value: self.openai.voice.clone(),
                    valid_values: KNOWN_VOICES.iter().map(|v| v.to_string()).collect(),
                },
                format!(
                    "openai.voice '{}' is not one of: {}",
                    self.openai.voice,
                    KNOWN_VOICES.join(", ")
                ),
            ));
        }

        issues
    }
}
