//! Keyword extraction for search queries.
//!
//! [`KeywordExtractor::extract`] reduces a free-text query to an ordered,
//! duplicate-free [`KeywordSet`]:
//!
//! 1. lower-case the whole query
//! 2. split on runs of whitespace
//! 3. keep a token iff it is not a stop-word and is either a domain term or
//!    longer than two characters
//! 4. drop repeats, first occurrence wins
//!
//! Punctuation is left attached to tokens (`"deals,"` and `"deals"` are
//! different keywords) unless [`ExtractOptions::strip_punctuation`] is set.

mod vocabulary;

pub use vocabulary::{DomainVocabulary, ENGLISH_STOP_WORDS, SALES_TERMS, StopWordSet};

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Tokens of this many characters or fewer need domain membership to survive.
const MIN_PLAIN_TOKEN_CHARS: usize = 2;

/// Ordered, duplicate-free lowercase keywords derived from a query (Value Object)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeywordSet {
    keywords: Vec<String>,
}

impl KeywordSet {
    pub fn as_slice(&self) -> &[String] {
        &self.keywords
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Join with single spaces, the form sent to the search backend.
    pub fn join(&self) -> String {
        self.keywords.join(" ")
    }

    pub fn into_vec(self) -> Vec<String> {
        self.keywords
    }
}

impl std::fmt::Display for KeywordSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.join())
    }
}

impl<'a> IntoIterator for &'a KeywordSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.keywords.iter()
    }
}

/// Extraction switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    /// Trim leading and trailing punctuation from each token before filtering.
    ///
    /// Off by default: the literal heuristic treats `"deals,"` as its own token.
    pub strip_punctuation: bool,
}

/// Stop-word and domain-vocabulary keyword filter
#[derive(Debug, Clone, Default)]
pub struct KeywordExtractor {
    vocabulary: DomainVocabulary,
    stop_words: StopWordSet,
    options: ExtractOptions,
}

impl KeywordExtractor {
    /// Build an extractor over explicit word lists.
    pub fn new(vocabulary: DomainVocabulary, stop_words: StopWordSet) -> Self {
        Self {
            vocabulary,
            stop_words,
            options: ExtractOptions::default(),
        }
    }

    /// Extractor over the built-in sales vocabulary and English stop-words.
    pub fn sales() -> Self {
        Self::default()
    }

    pub fn with_strip_punctuation(mut self, strip: bool) -> Self {
        self.options.strip_punctuation = strip;
        self
    }

    pub fn options(&self) -> ExtractOptions {
        self.options
    }

    pub fn vocabulary(&self) -> &DomainVocabulary {
        &self.vocabulary
    }

    pub fn stop_words(&self) -> &StopWordSet {
        &self.stop_words
    }

    /// Reduce a query to its keywords. Total over all strings, no side effects.
    pub fn extract(&self, query: &str) -> KeywordSet {
        let lowered = query.to_lowercase();
        let mut seen = HashSet::new();
        let mut keywords = Vec::new();

        for raw in lowered.split_whitespace() {
            let token = if self.options.strip_punctuation {
                raw.trim_matches(|c: char| c.is_ascii_punctuation())
            } else {
                raw
            };

            if token.is_empty() || !self.is_keyword(token) {
                continue;
            }

            if seen.insert(token) {
                keywords.push(token.to_string());
            }
        }

        KeywordSet { keywords }
    }

    /// Apply the filter to an already lower-cased, whitespace-free token.
    ///
    /// The stop-word check short-circuits: a token present in both lists is
    /// rejected.
    pub fn is_keyword(&self, token: &str) -> bool {
        !self.stop_words.contains(token)
            && (self.vocabulary.contains(token) || token.chars().count() > MIN_PLAIN_TOKEN_CHARS)
    }
}
