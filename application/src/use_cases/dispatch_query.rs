//! Dispatch Query use case.
//!
//! Runs one user submission through the dispatch sequence:
//!
//! 1. Validate the query (blank input is rejected before anything else)
//! 2. Take a ticket from the [`RequestFence`] and stop current audio
//! 3. Optionally extract keywords and send those instead of the raw query
//! 4. Search
//! 5. Summarize (backend summary wins; skipped when there are no records)
//! 6. Format the summary
//! 7. Rewrite it as a spoken-style narration
//! 8. Synthesize speech
//! 9. Hand the clip to the audio player
//!
//! Only a search failure aborts the sequence. Later stages degrade: the
//! outcome keeps whatever was produced and records a notice.

use crate::config::DispatchConfig;
use crate::ports::audio_player::{AudioPlayer, NoAudioPlayer};
use crate::ports::dispatch_logger::{DispatchEvent, DispatchLogger, NoDispatchLogger};
use crate::ports::llm::{Narrator, Summarizer};
use crate::ports::progress::{DispatchProgress, NoProgress};
use crate::ports::search_backend::{SearchBackend, SearchError};
use crate::ports::speech::SpeechSynthesizer;
use crate::use_cases::request_fence::{DispatchTicket, RequestFence};
use sales_intel_domain::core::string::one_line_preview;
use sales_intel_domain::{
    DispatchOutcome, DispatchStage, KeywordExtractor, KeywordSet, Query, RequestId,
    SearchRequest,
};
use serde_json::json;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

pub const CREDIT_NOTICE: &str = "Your credit balance is too low to access the AI model. Please add more credits to your account to continue using the service.";
pub const TECHNICAL_NOTICE: &str = "We're experiencing technical difficulties with our AI service. Please try again in a few moments.";
pub const GENERIC_NOTICE: &str = "Something went wrong while processing your request. Please try again or contact support if the issue persists.";
pub const EMPTY_QUERY_NOTICE: &str = "Please enter a query.";

/// Errors that abort a dispatch
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Query cannot be empty")]
    EmptyQuery,

    #[error("Search failed: {0}")]
    Search(#[from] SearchError),

    #[error("Request {0} was superseded by a newer query")]
    Superseded(RequestId),
}

impl DispatchError {
    pub fn is_superseded(&self) -> bool {
        matches!(self, DispatchError::Superseded(_))
    }

    /// Retry guidance for the user. `None` for superseded requests, which
    /// are dropped silently.
    pub fn user_message(&self) -> Option<&'static str> {
        match self {
            DispatchError::EmptyQuery => Some(EMPTY_QUERY_NOTICE),
            DispatchError::Superseded(_) => None,
            DispatchError::Search(SearchError::Transport(_)) => Some(TECHNICAL_NOTICE),
            DispatchError::Search(SearchError::Backend { message, .. }) => {
                if message.contains("credit balance is too low")
                    || message.contains("Anthropic API")
                {
                    Some(CREDIT_NOTICE)
                } else if message.contains("Search failed") || message.contains("HTTP error") {
                    Some(TECHNICAL_NOTICE)
                } else {
                    Some(GENERIC_NOTICE)
                }
            }
            DispatchError::Search(_) => Some(GENERIC_NOTICE),
        }
    }
}

/// Use case for dispatching a query through search, summary and speech.
///
/// Safe to share between tasks: concurrent `execute` calls are fenced so
/// only the newest one reaches the display.
pub struct DispatchQueryUseCase {
    search: Arc<dyn SearchBackend>,
    summarizer: Arc<dyn Summarizer>,
    narrator: Arc<dyn Narrator>,
    speech: Arc<dyn SpeechSynthesizer>,
    player: Arc<dyn AudioPlayer>,
    logger: Arc<dyn DispatchLogger>,
    fence: Arc<RequestFence>,
    extractor: KeywordExtractor,
    config: DispatchConfig,
}

impl DispatchQueryUseCase {
    pub fn new(
        search: Arc<dyn SearchBackend>,
        summarizer: Arc<dyn Summarizer>,
        narrator: Arc<dyn Narrator>,
        speech: Arc<dyn SpeechSynthesizer>,
        config: DispatchConfig,
    ) -> Self {
        let extractor = KeywordExtractor::sales().with_strip_punctuation(config.strip_punctuation);
        Self {
            search,
            summarizer,
            narrator,
            speech,
            player: Arc::new(NoAudioPlayer),
            logger: Arc::new(NoDispatchLogger),
            fence: Arc::new(RequestFence::new()),
            extractor,
            config,
        }
    }

    pub fn with_player(mut self, player: Arc<dyn AudioPlayer>) -> Self {
        self.player = player;
        self
    }

    pub fn with_dispatch_logger(mut self, logger: Arc<dyn DispatchLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Replace the switches. The extractor follows `strip_punctuation`.
    pub fn set_config(&mut self, config: DispatchConfig) {
        self.extractor = self
            .extractor
            .clone()
            .with_strip_punctuation(config.strip_punctuation);
        self.config = config;
    }

    pub fn set_search_backend(&mut self, search: Arc<dyn SearchBackend>) {
        self.search = search;
    }

    pub fn search_backend_name(&self) -> &str {
        self.search.name()
    }

    pub fn extractor(&self) -> &KeywordExtractor {
        &self.extractor
    }

    pub fn player(&self) -> &Arc<dyn AudioPlayer> {
        &self.player
    }

    pub fn fence(&self) -> &Arc<RequestFence> {
        &self.fence
    }

    /// The outcome currently on display
    pub fn shown(&self) -> Option<DispatchOutcome> {
        self.fence.shown()
    }

    pub async fn execute(&self, query: &str) -> Result<DispatchOutcome, DispatchError> {
        self.execute_with_progress(query, &NoProgress).await
    }

    /// Execute the dispatch sequence with progress callbacks.
    pub async fn execute_with_progress(
        &self,
        raw_query: &str,
        progress: &dyn DispatchProgress,
    ) -> Result<DispatchOutcome, DispatchError> {
        let query = Query::try_new(raw_query).map_err(|_| DispatchError::EmptyQuery)?;
        let ticket = self.fence.begin();

        info!(
            "Dispatching {}: {}",
            ticket.id,
            one_line_preview(query.content(), 100)
        );

        if let Err(e) = self.player.stop().await {
            debug!("Stopping previous audio failed: {}", e);
        }

        let (sent_query, keywords) = self.prepare_query(&query, progress);
        let mut outcome = DispatchOutcome::new(ticket.id, query.content(), &sent_query);
        outcome.keywords = keywords;

        self.logger.log(DispatchEvent::new(
            "dispatch_started",
            ticket.id,
            json!({
                "query": outcome.query,
                "sent_query": outcome.sent_query,
                "keywords": outcome.keywords,
                "backend": self.search.name(),
            }),
        ));

        if let Err(e) = self.run_stages(&ticket, &mut outcome, progress).await {
            self.report_failure(&ticket, progress, &e);
            return Err(e);
        }

        if !self.fence.apply_if_current(&outcome) {
            progress.on_superseded(ticket.id);
            return Err(DispatchError::Superseded(ticket.id));
        }

        info!(
            "Dispatch {} finished: {} records, summary {} chars",
            ticket.id,
            outcome.records.len(),
            outcome.summary.chars().count()
        );
        Ok(outcome)
    }

    fn report_failure(
        &self,
        ticket: &DispatchTicket,
        progress: &dyn DispatchProgress,
        error: &DispatchError,
    ) {
        if error.is_superseded() {
            debug!("Dispatch {} superseded", ticket.id);
            progress.on_superseded(ticket.id);
            return;
        }
        warn!("Dispatch {} failed: {}", ticket.id, error);
        self.logger.log(DispatchEvent::new(
            "dispatch_failed",
            ticket.id,
            json!({ "error": error.to_string() }),
        ));
    }

    /// Decide what to send to the search backend.
    fn prepare_query(
        &self,
        query: &Query,
        progress: &dyn DispatchProgress,
    ) -> (String, Option<KeywordSet>) {
        if !self.config.use_extraction {
            return (query.content().to_string(), None);
        }

        progress.on_stage_start(DispatchStage::Extract);
        let keywords = self.extractor.extract(query.content());
        progress.on_stage_complete(DispatchStage::Extract, true);

        // Nothing survived the filter: fall back to the raw query.
        let sent = if keywords.is_empty() {
            query.content().to_string()
        } else {
            keywords.join()
        };
        debug!("Extracted keywords: [{}]", keywords);
        (sent, Some(keywords))
    }

    async fn run_stages(
        &self,
        ticket: &DispatchTicket,
        outcome: &mut DispatchOutcome,
        progress: &dyn DispatchProgress,
    ) -> Result<(), DispatchError> {
        // Search
        let request =
            SearchRequest::new(&outcome.sent_query).with_max_results(self.config.max_results);
        progress.on_stage_start(DispatchStage::Search);
        let searched = match guarded(ticket, self.search.search(&request)).await? {
            Ok(found) => {
                progress.on_stage_complete(DispatchStage::Search, true);
                found
            }
            Err(e) => {
                progress.on_stage_complete(DispatchStage::Search, false);
                return Err(DispatchError::Search(e));
            }
        };
        outcome.records = searched.records;
        outcome.tools_used = searched.tools_used;
        self.logger.log(DispatchEvent::new(
            "search_completed",
            ticket.id,
            json!({
                "records": outcome.records.len(),
                "backend_summary": searched.summary.is_some(),
            }),
        ));

        // Summarize
        if let Some(summary) = searched.summary {
            outcome.summary = summary;
        } else if !outcome.records.is_empty() && self.config.summarization_enabled {
            progress.on_stage_start(DispatchStage::Summarize);
            match guarded(
                ticket,
                self.summarizer.summarize(&outcome.query, &outcome.records),
            )
            .await?
            {
                Ok(summary) => {
                    outcome.summary = summary.trim().to_string();
                    progress.on_stage_complete(DispatchStage::Summarize, true);
                }
                Err(e) => {
                    warn!("Summarization failed: {}", e);
                    outcome.notices.push("Summary unavailable.".to_string());
                    progress.on_stage_complete(DispatchStage::Summarize, false);
                }
            }
        }

        if !outcome.has_summary() {
            return Ok(());
        }
        self.logger.log(DispatchEvent::new(
            "summary_ready",
            ticket.id,
            json!({ "summary": outcome.summary }),
        ));

        // Format
        outcome.formatted_summary = outcome.summary.clone();
        if self.config.summarization_enabled {
            progress.on_stage_start(DispatchStage::Format);
            match guarded(ticket, self.summarizer.format(&outcome.summary)).await? {
                Ok(formatted) if !formatted.trim().is_empty() => {
                    outcome.formatted_summary = formatted.trim().to_string();
                    progress.on_stage_complete(DispatchStage::Format, true);
                }
                Ok(_) => progress.on_stage_complete(DispatchStage::Format, true),
                Err(e) => {
                    warn!("Formatting failed, keeping raw summary: {}", e);
                    progress.on_stage_complete(DispatchStage::Format, false);
                }
            }
        }

        // Narrate
        if !self.config.summarization_enabled {
            return Ok(());
        }
        progress.on_stage_start(DispatchStage::Narrate);
        match guarded(ticket, self.narrator.narrate(&outcome.summary)).await? {
            Ok(narration) if !narration.trim().is_empty() => {
                outcome.narration = narration.trim().to_string();
                progress.on_stage_complete(DispatchStage::Narrate, true);
            }
            Ok(_) => {
                outcome.narration = outcome.summary.clone();
                progress.on_stage_complete(DispatchStage::Narrate, true);
            }
            Err(e) => {
                warn!("Narration failed, speaking the summary instead: {}", e);
                outcome.narration = outcome.summary.clone();
                progress.on_stage_complete(DispatchStage::Narrate, false);
            }
        }
        self.logger.log(DispatchEvent::new(
            "narration_ready",
            ticket.id,
            json!({ "narration": outcome.narration }),
        ));

        // Synthesize
        if !self.config.speech_enabled || outcome.narration.trim().is_empty() {
            return Ok(());
        }
        progress.on_stage_start(DispatchStage::Synthesize);
        let clip = match guarded(ticket, self.speech.synthesize(&outcome.narration)).await? {
            Ok(clip) => {
                progress.on_stage_complete(DispatchStage::Synthesize, true);
                clip
            }
            Err(e) => {
                warn!("Speech synthesis failed: {}", e);
                outcome.notices.push("Audio playback unavailable.".to_string());
                progress.on_stage_complete(DispatchStage::Synthesize, false);
                return Ok(());
            }
        };
        self.logger.log(DispatchEvent::new(
            "audio_ready",
            ticket.id,
            json!({ "bytes": clip.len(), "mime": clip.mime() }),
        ));

        // Play, or only hand the clip over when autoplay is off
        if self.config.autoplay {
            progress.on_stage_start(DispatchStage::Play);
        }
        let handed = if self.config.autoplay {
            guarded(ticket, self.player.play(ticket.id, &clip)).await
        } else {
            guarded(ticket, self.player.load(ticket.id, &clip)).await
        };
        let saved = match handed {
            Ok(saved) => saved,
            Err(superseded) => {
                self.silence(ticket).await;
                return Err(superseded);
            }
        };
        match saved {
            Ok(path) => {
                outcome.audio_path = path;
                if self.config.autoplay {
                    progress.on_stage_complete(DispatchStage::Play, true);
                }
            }
            Err(e) => {
                warn!("Playback failed: {}", e);
                outcome.notices.push("Audio playback unavailable.".to_string());
                if self.config.autoplay {
                    progress.on_stage_complete(DispatchStage::Play, false);
                }
            }
        }
        outcome.audio = Some(clip);

        Ok(())
    }

    /// Stop audio this superseded dispatch may have started.
    async fn silence(&self, ticket: &DispatchTicket) {
        if let Err(e) = self.player.stop_request(ticket.id).await {
            debug!("Stopping superseded audio failed: {}", e);
        }
    }
}

/// Await `fut` unless a newer dispatch cancels the ticket first.
async fn guarded<F, T>(ticket: &DispatchTicket, fut: F) -> Result<T, DispatchError>
where
    F: Future<Output = T>,
{
    tokio::select! {
        biased;
        _ = ticket.cancelled() => Err(DispatchError::Superseded(ticket.id)),
        out = fut => {
            if ticket.is_cancelled() {
                Err(DispatchError::Superseded(ticket.id))
            } else {
                Ok(out)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::audio_player::PlayerError;
    use crate::ports::llm::{DisabledNarrator, DisabledSummarizer, LlmError};
    use crate::ports::speech::SpeechError;
    use async_trait::async_trait;
    use sales_intel_domain::{AudioClip, PlaybackStatus, SearchOutcome, SearchRecord};
    use serde_json::json;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    // ==================== Mocks ====================

    struct MockSearch {
        outcome: Result<SearchOutcome, SearchError>,
        queries: Mutex<Vec<String>>,
    }

    impl MockSearch {
        fn records(n: usize) -> Self {
            let records = (0..n)
                .map(|i| SearchRecord::from_value(json!({"id": i.to_string(), "subject": "Deal"})))
                .collect();
            Self::with(Ok(SearchOutcome::new(records)))
        }

        fn with(outcome: Result<SearchOutcome, SearchError>) -> Self {
            Self {
                outcome,
                queries: Mutex::new(Vec::new()),
            }
        }

        fn sent(&self) -> Vec<String> {
            self.queries.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SearchBackend for MockSearch {
        fn name(&self) -> &str {
            "mock"
        }

        async fn search(&self, request: &SearchRequest) -> Result<SearchOutcome, SearchError> {
            self.queries.lock().unwrap().push(request.query.clone());
            // Queries mentioning "slow" take a while.
            if request.query.contains("slow") {
                tokio::time::sleep(Duration::from_secs(5)).await;
            }
            self.outcome.clone()
        }
    }

    struct MockLlm {
        summary: Result<String, LlmError>,
        formatted: Result<String, LlmError>,
        narration: Result<String, LlmError>,
        calls: AtomicUsize,
    }

    impl MockLlm {
        fn ok() -> Self {
            Self {
                summary: Ok("Two deals need attention.".to_string()),
                formatted: Ok("## Deals\n1. Two need attention".to_string()),
                narration: Ok("Hi, I found two deals that need attention.".to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Summarizer for MockLlm {
        async fn summarize(&self, _query: &str, _records: &[SearchRecord]) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.summary.clone()
        }

        async fn format(&self, _summary: &str) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.formatted.clone()
        }
    }

    #[async_trait]
    impl Narrator for MockLlm {
        async fn narrate(&self, _summary: &str) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.narration.clone()
        }
    }

    struct MockSpeech {
        fail: bool,
        calls: AtomicUsize,
    }

    impl MockSpeech {
        fn new(fail: bool) -> Self {
            Self {
                fail,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl SpeechSynthesizer for MockSpeech {
        async fn synthesize(&self, _text: &str) -> Result<AudioClip, SpeechError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(SpeechError::Status {
                    status: 500,
                    body: "boom".to_string(),
                })
            } else {
                Ok(AudioClip::mp3(vec![0u8; 1600]))
            }
        }
    }

    #[derive(Default)]
    struct RecordingPlayer {
        /// Every `play` call, recorded on entry
        started: Mutex<Vec<RequestId>>,
        /// `play` calls that ran to completion
        played: Mutex<Vec<RequestId>>,
        loaded: Mutex<Vec<RequestId>>,
        stopped_requests: Mutex<Vec<RequestId>>,
        stops: AtomicUsize,
        play_delay: Duration,
        fail_play: bool,
    }

    impl RecordingPlayer {
        fn saved_path(request_id: RequestId) -> PathBuf {
            PathBuf::from(format!("/audio/narration-{}.mp3", request_id.value()))
        }
    }

    #[async_trait]
    impl AudioPlayer for RecordingPlayer {
        async fn play(
            &self,
            request_id: RequestId,
            _clip: &AudioClip,
        ) -> Result<Option<PathBuf>, PlayerError> {
            self.started.lock().unwrap().push(request_id);
            if !self.play_delay.is_zero() {
                tokio::time::sleep(self.play_delay).await;
            }
            if self.fail_play {
                return Err(PlayerError::Output("no device".to_string()));
            }
            self.played.lock().unwrap().push(request_id);
            Ok(Some(Self::saved_path(request_id)))
        }
        async fn load(
            &self,
            request_id: RequestId,
            _clip: &AudioClip,
        ) -> Result<Option<PathBuf>, PlayerError> {
            self.loaded.lock().unwrap().push(request_id);
            Ok(Some(Self::saved_path(request_id)))
        }
        async fn pause(&self) -> Result<(), PlayerError> {
            Ok(())
        }
        async fn resume(&self) -> Result<(), PlayerError> {
            Ok(())
        }
        async fn seek(&self, _fraction: f64) -> Result<(), PlayerError> {
            Ok(())
        }
        async fn stop(&self) -> Result<(), PlayerError> {
            self.stops.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
        async fn stop_request(&self, request_id: RequestId) -> Result<(), PlayerError> {
            self.stopped_requests.lock().unwrap().push(request_id);
            Ok(())
        }
        async fn replay(&self) -> Result<(), PlayerError> {
            Ok(())
        }
        fn status(&self) -> PlaybackStatus {
            NoAudioPlayer.status()
        }
    }

    struct Fixture {
        search: Arc<MockSearch>,
        llm: Arc<MockLlm>,
        speech: Arc<MockSpeech>,
        player: Arc<RecordingPlayer>,
    }

    impl Fixture {
        fn new(search: MockSearch, llm: MockLlm, speech: MockSpeech) -> Self {
            Self::with_player(search, llm, speech, RecordingPlayer::default())
        }

        fn with_player(
            search: MockSearch,
            llm: MockLlm,
            speech: MockSpeech,
            player: RecordingPlayer,
        ) -> Self {
            Self {
                search: Arc::new(search),
                llm: Arc::new(llm),
                speech: Arc::new(speech),
                player: Arc::new(player),
            }
        }

        fn use_case(&self, config: DispatchConfig) -> DispatchQueryUseCase {
            DispatchQueryUseCase::new(
                self.search.clone(),
                self.llm.clone(),
                self.llm.clone(),
                self.speech.clone(),
                config,
            )
            .with_player(self.player.clone())
        }
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn test_full_sequence() {
        let fx = Fixture::new(MockSearch::records(2), MockLlm::ok(), MockSpeech::new(false));
        let outcome = fx
            .use_case(DispatchConfig::default())
            .execute("Show me recent leads")
            .await
            .unwrap();

        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.summary, "Two deals need attention.");
        assert_eq!(outcome.formatted_summary, "## Deals\n1. Two need attention");
        assert!(outcome.narration.starts_with("Hi,"));
        assert!(outcome.audio.is_some());
        assert_eq!(
            outcome.audio_path,
            Some(RecordingPlayer::saved_path(outcome.request_id))
        );
        assert!(outcome.notices.is_empty());
        assert_eq!(fx.search.sent(), vec!["Show me recent leads"]);
        assert_eq!(*fx.player.played.lock().unwrap(), vec![outcome.request_id]);
        assert_eq!(fx.player.stops.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_extraction_sends_keywords() {
        let fx = Fixture::new(MockSearch::records(1), MockLlm::ok(), MockSpeech::new(false));
        let outcome = fx
            .use_case(DispatchConfig::default().with_extraction(true))
            .execute("Show me recent leads")
            .await
            .unwrap();

        assert_eq!(fx.search.sent(), vec!["show recent leads"]);
        assert_eq!(outcome.sent_query, "show recent leads");
        assert_eq!(outcome.keywords.map(|k| k.len()), Some(3));
    }

    #[tokio::test]
    async fn test_extraction_falls_back_when_nothing_survives() {
        let fx = Fixture::new(MockSearch::records(0), MockLlm::ok(), MockSpeech::new(false));
        let outcome = fx
            .use_case(DispatchConfig::default().with_extraction(true))
            .execute("the a of")
            .await
            .unwrap();

        assert_eq!(fx.search.sent(), vec!["the a of"]);
        assert!(outcome.keywords.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blank_query_touches_nothing() {
        let fx = Fixture::new(MockSearch::records(1), MockLlm::ok(), MockSpeech::new(false));
        let use_case = fx.use_case(DispatchConfig::default());

        let err = use_case.execute("   ").await.unwrap_err();
        assert!(matches!(err, DispatchError::EmptyQuery));
        assert!(fx.search.sent().is_empty());
        assert_eq!(fx.player.stops.load(Ordering::SeqCst), 0);
        assert_eq!(use_case.fence().latest(), RequestId::new(0));
    }

    #[tokio::test]
    async fn test_no_records_skips_summarizer() {
        let fx = Fixture::new(MockSearch::records(0), MockLlm::ok(), MockSpeech::new(false));
        let outcome = fx
            .use_case(DispatchConfig::default())
            .execute("unicorn deals")
            .await
            .unwrap();

        assert!(outcome.summary.is_empty());
        assert!(outcome.narration.is_empty());
        assert_eq!(fx.llm.calls(), 0);
        assert_eq!(fx.speech.calls.load(Ordering::SeqCst), 0);
        assert_eq!(outcome.status_line(), "No emails found for your query.");
    }

    #[tokio::test]
    async fn test_backend_summary_wins() {
        let search = MockSearch::with(Ok(SearchOutcome::default().with_summary("Server says hi.")));
        let fx = Fixture::new(search, MockLlm::ok(), MockSpeech::new(false));
        let outcome = fx
            .use_case(DispatchConfig::default())
            .execute("pipeline")
            .await
            .unwrap();

        assert_eq!(outcome.summary, "Server says hi.");
        // format + narrate, no summarize
        assert_eq!(fx.llm.calls(), 2);
        assert!(outcome.audio.is_some());
    }

    #[tokio::test]
    async fn test_summarization_disabled() {
        let fx = Fixture::new(MockSearch::records(3), MockLlm::ok(), MockSpeech::new(false));
        let use_case = DispatchQueryUseCase::new(
            fx.search.clone(),
            Arc::new(DisabledSummarizer),
            Arc::new(DisabledNarrator),
            fx.speech.clone(),
            DispatchConfig::default().with_summarization(false),
        );
        let outcome = use_case.execute("recent leads").await.unwrap();

        assert_eq!(outcome.records.len(), 3);
        assert!(outcome.summary.is_empty());
        assert!(outcome.narration.is_empty());
        assert!(outcome.audio.is_none());
        assert_eq!(fx.speech.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_search_failure_aborts() {
        let search = MockSearch::with(Err(SearchError::status(503)));
        let fx = Fixture::new(search, MockLlm::ok(), MockSpeech::new(false));
        let use_case = fx.use_case(DispatchConfig::default());

        let err = use_case.execute("recent leads").await.unwrap_err();
        assert!(matches!(err, DispatchError::Search(_)));
        assert_eq!(err.user_message(), Some(TECHNICAL_NOTICE));
        assert_eq!(fx.llm.calls(), 0);
        assert!(use_case.shown().is_none());
    }

    #[tokio::test]
    async fn test_summarizer_failure_degrades() {
        let llm = MockLlm {
            summary: Err(LlmError::Transport("reset".to_string())),
            ..MockLlm::ok()
        };
        let fx = Fixture::new(MockSearch::records(1), llm, MockSpeech::new(false));
        let outcome = fx
            .use_case(DispatchConfig::default())
            .execute("recent leads")
            .await
            .unwrap();

        assert_eq!(outcome.records.len(), 1);
        assert!(outcome.summary.is_empty());
        assert_eq!(outcome.notices, vec!["Summary unavailable."]);
    }

    #[tokio::test]
    async fn test_format_and_narration_fall_back_to_summary() {
        let llm = MockLlm {
            formatted: Err(LlmError::EmptyResponse),
            narration: Err(LlmError::Status {
                status: 500,
                body: String::new(),
            }),
            ..MockLlm::ok()
        };
        let fx = Fixture::new(MockSearch::records(1), llm, MockSpeech::new(false));
        let outcome = fx
            .use_case(DispatchConfig::default())
            .execute("recent leads")
            .await
            .unwrap();

        assert_eq!(outcome.formatted_summary, outcome.summary);
        assert_eq!(outcome.narration, outcome.summary);
        assert!(outcome.audio.is_some());
    }

    #[tokio::test]
    async fn test_tts_failure_suppresses_playback_only() {
        let fx = Fixture::new(MockSearch::records(1), MockLlm::ok(), MockSpeech::new(true));
        let outcome = fx
            .use_case(DispatchConfig::default())
            .execute("recent leads")
            .await
            .unwrap();

        assert!(outcome.has_summary());
        assert!(!outcome.narration.is_empty());
        assert!(outcome.audio.is_none());
        assert_eq!(outcome.notices, vec!["Audio playback unavailable."]);
        assert!(fx.player.played.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_no_autoplay_keeps_clip() {
        let fx = Fixture::new(MockSearch::records(1), MockLlm::ok(), MockSpeech::new(false));
        let outcome = fx
            .use_case(DispatchConfig::default().with_autoplay(false))
            .execute("recent leads")
            .await
            .unwrap();

        assert!(outcome.audio.is_some());
        assert!(fx.player.started.lock().unwrap().is_empty());
        assert_eq!(*fx.player.loaded.lock().unwrap(), vec![outcome.request_id]);
        assert_eq!(
            outcome.audio_path,
            Some(RecordingPlayer::saved_path(outcome.request_id))
        );
    }

    #[tokio::test]
    async fn test_failed_playback_reports_no_path() {
        let player = RecordingPlayer {
            fail_play: true,
            ..Default::default()
        };
        let fx = Fixture::with_player(
            MockSearch::records(1),
            MockLlm::ok(),
            MockSpeech::new(false),
            player,
        );
        let outcome = fx
            .use_case(DispatchConfig::default())
            .execute("recent leads")
            .await
            .unwrap();

        assert!(outcome.audio.is_some());
        assert_eq!(outcome.audio_path, None);
        assert_eq!(outcome.notices, vec!["Audio playback unavailable."]);
    }

    #[tokio::test]
    async fn test_tools_used_carried_into_outcome() {
        let search = MockSearch::with(Ok(SearchOutcome::new(vec![])
            .with_summary("One overdue invoice.")
            .with_tools_used(["xero_invoices"])));
        let fx = Fixture::new(search, MockLlm::ok(), MockSpeech::new(false));
        let outcome = fx
            .use_case(DispatchConfig::default())
            .execute("overdue invoices")
            .await
            .unwrap();

        assert_eq!(outcome.tools_used, vec!["xero_invoices"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_during_playback_stops_its_clip() {
        let player = RecordingPlayer {
            play_delay: Duration::from_secs(5),
            ..Default::default()
        };
        let fx = Fixture::with_player(
            MockSearch::records(1),
            MockLlm::ok(),
            MockSpeech::new(false),
            player,
        );
        let use_case = Arc::new(fx.use_case(DispatchConfig::default()));

        let first = {
            let use_case = use_case.clone();
            tokio::spawn(async move { use_case.execute("recent leads").await })
        };
        // The first dispatch is now inside `play`.
        tokio::task::yield_now().await;
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(fx.player.started.lock().unwrap().len(), 1);

        let second = use_case.execute("hot deals").await.unwrap();
        let stale = first.await.unwrap().unwrap_err();

        assert!(stale.is_superseded());
        let first_id = RequestId::new(1);
        assert_eq!(*fx.player.stopped_requests.lock().unwrap(), vec![first_id]);
        assert_eq!(*fx.player.played.lock().unwrap(), vec![second.request_id]);
        assert_eq!(use_case.shown().map(|o| o.query), Some("hot deals".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_query_supersedes_slow_one() {
        let fx = Fixture::new(MockSearch::records(1), MockLlm::ok(), MockSpeech::new(false));
        let use_case = Arc::new(fx.use_case(DispatchConfig::default()));

        let slow = {
            let use_case = use_case.clone();
            tokio::spawn(async move { use_case.execute("slow pipeline review").await })
        };
        // Let the slow dispatch reach its search call.
        tokio::task::yield_now().await;
        tokio::time::sleep(Duration::from_millis(10)).await;

        let fast = use_case.execute("recent leads").await.unwrap();
        let stale = slow.await.unwrap().unwrap_err();

        assert!(stale.is_superseded());
        assert_eq!(stale.user_message(), None);
        assert!(fast.request_id.supersedes(RequestId::new(1)));
        assert_eq!(use_case.shown().map(|o| o.query), Some("recent leads".to_string()));
        assert_eq!(*fx.player.played.lock().unwrap(), vec![fast.request_id]);
    }

    #[test]
    fn test_user_message_mapping() {
        let credit = DispatchError::Search(SearchError::Backend {
            status: 400,
            message: "Your credit balance is too low to access the Anthropic API".to_string(),
        });
        assert_eq!(credit.user_message(), Some(CREDIT_NOTICE));

        let failed = DispatchError::Search(SearchError::Backend {
            status: 500,
            message: "Search failed: upstream".to_string(),
        });
        assert_eq!(failed.user_message(), Some(TECHNICAL_NOTICE));

        let transport = DispatchError::Search(SearchError::Transport("refused".to_string()));
        assert_eq!(transport.user_message(), Some(TECHNICAL_NOTICE));

        let other = DispatchError::Search(SearchError::Backend {
            status: 422,
            message: "bad input".to_string(),
        });
        assert_eq!(other.user_message(), Some(GENERIC_NOTICE));

        let decode = DispatchError::Search(SearchError::Decode("eof".to_string()));
        assert_eq!(decode.user_message(), Some(GENERIC_NOTICE));

        assert_eq!(DispatchError::EmptyQuery.user_message(), Some(EMPTY_QUERY_NOTICE));
    }

    #[tokio::test]
    async fn test_set_config_updates_extractor() {
        let fx = Fixture::new(MockSearch::records(1), MockLlm::ok(), MockSpeech::new(false));
        let mut use_case = fx.use_case(DispatchConfig::default());
        assert!(!use_case.extractor().options().strip_punctuation);

        use_case.set_config(
            DispatchConfig::default()
                .with_extraction(true)
                .with_strip_punctuation(true),
        );
        use_case.execute("deals, deals!").await.unwrap();
        assert_eq!(fx.search.sent(), vec!["deals"]);
    }
}
