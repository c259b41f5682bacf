//! Domain layer for sales-intel
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Keyword extraction
//!
//! [`KeywordExtractor`] turns a free-text query into an ordered, duplicate-free
//! [`KeywordSet`] using an injected [`DomainVocabulary`] and [`StopWordSet`].
//!
//! ## Dispatch
//!
//! One user submission runs the dispatch sequence
//! (search → summarize → format → narrate → synthesize → play) and yields a
//! [`DispatchOutcome`], fenced by a [`RequestId`].
//!
//! ## Playback
//!
//! [`Playback`] tracks play/pause/resume/seek/stop for a synthesized
//! [`AudioClip`].

pub mod config;
pub mod core;
pub mod dispatch;
pub mod keyword;
pub mod playback;
pub mod prompt;
pub mod search;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use core::{error::DomainError, query::Query, request::RequestId};
pub use dispatch::{DispatchOutcome, DispatchStage};
pub use keyword::{DomainVocabulary, ExtractOptions, KeywordExtractor, KeywordSet, StopWordSet};
pub use playback::{AudioClip, Playback, PlaybackError, PlaybackState, PlaybackStatus};
pub use prompt::PromptTemplate;
pub use search::{RecordKind, SearchOutcome, SearchRecord, SearchRequest, filter_records};
