//! OpenAI-backed summarizer, narrator and speech synthesizer.

use super::protocol::{
    CHAT_COMPLETIONS_PATH, ChatMessage, ChatRequest, ChatResponse, SPEECH_PATH, SpeechRequest,
};
use crate::config::FileOpenAiConfig;
use async_trait::async_trait;
use sales_intel_application::ports::llm::{LlmError, Narrator, Summarizer};
use sales_intel_application::ports::speech::{SpeechError, SpeechSynthesizer};
use sales_intel_domain::{AudioClip, PromptTemplate, SearchRecord};
use std::time::Duration;
use tracing::{debug, info};

/// Returned instead of calling the API when there is nothing to summarize
pub const NO_DATA_SUMMARY: &str = "No data provided to summarize.";

/// Token and sampling settings for one kind of chat call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChatParams {
    pub max_tokens: u32,
    pub temperature: f64,
}

pub const SUMMARY_PARAMS: ChatParams = ChatParams {
    max_tokens: 500,
    temperature: 0.3,
};
pub const FORMAT_PARAMS: ChatParams = ChatParams {
    max_tokens: 1500,
    temperature: 0.2,
};
pub const SPOKEN_PARAMS: ChatParams = ChatParams {
    max_tokens: 300,
    temperature: 0.7,
};

/// Connection and model settings resolved from configuration
#[derive(Debug, Clone)]
pub struct OpenAiSettings {
    pub api_key: String,
    pub base_url: String,
    pub summary_model: String,
    pub style_model: String,
    pub speech_model: String,
    pub voice: String,
}

impl OpenAiSettings {
    pub fn from_config(config: &FileOpenAiConfig, api_key: String) -> Self {
        Self {
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            summary_model: config.summary_model.clone(),
            style_model: config.style_model.clone(),
            speech_model: config.speech_model.clone(),
            voice: config.voice.clone(),
        }
    }
}

/// Client for the OpenAI chat completion and speech endpoints
pub struct OpenAiClient {
    http: reqwest::Client,
    settings: OpenAiSettings,
}

impl OpenAiClient {
    pub fn new(settings: OpenAiSettings, timeout: Duration) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Transport(e.to_string()))?;
        Ok(Self { http, settings })
    }

    pub fn settings(&self) -> &OpenAiSettings {
        &self.settings
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.settings.base_url, path)
    }

    async fn chat(
        &self,
        model: &str,
        system: &str,
        user: String,
        params: ChatParams,
    ) -> Result<String, LlmError> {
        let request = ChatRequest {
            model: model.to_string(),
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
            max_tokens: params.max_tokens,
            temperature: params.temperature,
        };
        debug!("Chat completion with {}", model);

        let response = self
            .http
            .post(self.url(CHAT_COMPLETIONS_PATH))
            .bearer_auth(&self.settings.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Decode(e.to_string()))?;
        parsed
            .first_content()
            .map(str::to_string)
            .ok_or(LlmError::EmptyResponse)
    }
}

#[async_trait]
impl Summarizer for OpenAiClient {
    async fn summarize(&self, query: &str, records: &[SearchRecord]) -> Result<String, LlmError> {
        if records.is_empty() {
            return Ok(NO_DATA_SUMMARY.to_string());
        }
        info!("Summarizing {} records", records.len());
        self.chat(
            &self.settings.summary_model,
            PromptTemplate::summary_system(),
            PromptTemplate::summary_prompt(query, records),
            SUMMARY_PARAMS,
        )
        .await
    }

    async fn format(&self, summary: &str) -> Result<String, LlmError> {
        if summary.trim().is_empty() {
            return Ok(String::new());
        }
        self.chat(
            &self.settings.style_model,
            PromptTemplate::format_system(),
            PromptTemplate::format_prompt(summary),
            FORMAT_PARAMS,
        )
        .await
    }
}

#[async_trait]
impl Narrator for OpenAiClient {
    async fn narrate(&self, summary: &str) -> Result<String, LlmError> {
        if summary.trim().is_empty() {
            return Ok(String::new());
        }
        self.chat(
            &self.settings.style_model,
            PromptTemplate::spoken_system(),
            PromptTemplate::spoken_prompt(summary),
            SPOKEN_PARAMS,
        )
        .await
    }
}

#[async_trait]
impl SpeechSynthesizer for OpenAiClient {
    async fn synthesize(&self, text: &str) -> Result<AudioClip, SpeechError> {
        let request = SpeechRequest {
            model: &self.settings.speech_model,
            input: text,
            voice: &self.settings.voice,
            response_format: "mp3",
        };

        let response = self
            .http
            .post(self.url(SPEECH_PATH))
            .bearer_auth(&self.settings.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| SpeechError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SpeechError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SpeechError::Transport(e.to_string()))?;
        if bytes.is_empty() {
            return Err(SpeechError::EmptyAudio);
        }
        debug!("Synthesized {} bytes of audio", bytes.len());
        Ok(AudioClip::mp3(bytes.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> OpenAiClient {
        let settings = OpenAiSettings::from_config(
            &FileOpenAiConfig {
                base_url: "http://127.0.0.1:9/".to_string(),
                ..Default::default()
            },
            "sk-test".to_string(),
        );
        OpenAiClient::new(settings, Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        assert_eq!(
            client().url(CHAT_COMPLETIONS_PATH),
            "http://127.0.0.1:9/v1/chat/completions"
        );
    }

    #[tokio::test]
    async fn test_empty_inputs_skip_the_network() {
        // Port 9 is discard; any request would fail with a transport error.
        let client = client();
        assert_eq!(client.summarize("q", &[]).await.unwrap(), NO_DATA_SUMMARY);
        assert_eq!(client.format("  ").await.unwrap(), "");
        assert_eq!(client.narrate("").await.unwrap(), "");
    }
}
