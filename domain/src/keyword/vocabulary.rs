//! Fixed word lists used by the keyword extractor.
//!
//! Both lists are build-time constants. They are wrapped in
//! [`DomainVocabulary`] and [`StopWordSet`] so an extractor can be
//! constructed with alternates in tests.

use std::collections::HashSet;

/// Sales, CRM and email terms exempt from the minimum length filter.
///
/// Contains the multi-word entry `"case study"`, which never matches a single
/// whitespace-split token.
#[rustfmt::skip]
pub const SALES_TERMS: &[&str] = &[
    "email", "emails", "mail", "mails", "gmail", "inbox", "subject", "from", "to", "cc", "bcc",
    "attachment", "thread", "unread", "read",
    "sales", "deal", "deals", "lead", "leads", "prospect", "prospects", "customer", "customers",
    "client", "clients", "account", "accounts",
    "opportunity", "opportunities", "pipeline", "stage", "stages", "quote", "quotes", "contract",
    "contracts", "negotiation", "negotiations",
    "close", "closed", "won", "lost", "churn", "upsell", "cross-sell", "renewal", "revenue", "mrr",
    "arr",
    "meeting", "meetings", "call", "calls", "demo", "demos", "follow-up", "follow-ups", "task",
    "tasks", "activity", "activities",
    "contact", "contacts", "company", "companies", "industry", "industries",
    "hot", "warm", "cold", "priority", "important", "urgent",
    "analyze", "analysis", "summary", "summarize", "overview", "show", "find", "get", "list",
    "search", "recent", "latest", "today",
    "performance", "metrics", "kpis", "report", "reports", "forecast", "forecasting",
    "who", "what", "when", "where", "why", "how",
    "is", "are", "was", "were", "has", "have", "had", "do", "does", "did", "a", "an", "the", "and",
    "or", "but", "for", "with", "on", "in", "at", "of",
    "help", "draft", "write", "create", "generate", "template", "templates", "personalized",
    "pending", "overdue", "upcoming", "next", "last", "past", "quarter", "month", "week", "year",
    "introduction", "intro", "pricing", "discount", "objection", "handling",
    "competitor", "competitors", "comparison", "vs",
    "feedback", "testimonial", "case study",
    "linkedin", "crm", "salesforce", "hubspot",
    "sarah", "johnson", "david", "chen", "acme", "globex", "corp", "inc",
];

/// Common English function words, always excluded.
#[rustfmt::skip]
pub const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at",
    "be", "because", "been", "before", "being", "below", "between", "both", "but", "by",
    "can", "could", "did", "do", "does", "doing", "down", "during",
    "each",
    "few", "for", "from", "further",
    "had", "has", "have", "having", "he", "her", "here", "hers", "herself", "him", "himself",
    "his", "how",
    "i", "if", "in", "into", "is", "it", "its", "itself",
    "just",
    "me", "more", "most", "my", "myself",
    "no", "nor", "not", "now",
    "of", "off", "on", "once", "only", "or", "other", "our", "ours", "ourselves", "out", "over",
    "own",
    "s", "same", "she", "should", "so", "some", "still", "such",
    "t", "than", "that", "the", "their", "theirs", "them", "themselves", "then", "there", "these",
    "they", "this", "those", "through", "to", "too",
    "under", "until", "up",
    "very",
    "was", "we", "were", "what", "when", "where", "which", "while", "who", "whom", "why", "will",
    "with", "would",
    "you", "your", "yours", "yourself", "yourselves",
];

fn to_set<I, S>(words: I) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    words
        .into_iter()
        .map(|w| w.as_ref().to_lowercase())
        .collect()
}

/// Domain terms exempt from the length filter (Value Object)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainVocabulary {
    terms: HashSet<String>,
}

impl DomainVocabulary {
    /// Build a vocabulary from arbitrary terms. Terms are lower-cased.
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            terms: to_set(terms),
        }
    }

    /// The built-in sales vocabulary.
    pub fn sales() -> Self {
        Self::new(SALES_TERMS.iter().copied())
    }

    /// A vocabulary with no terms; only the length rule applies.
    pub fn empty() -> Self {
        Self {
            terms: HashSet::new(),
        }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.terms.contains(token)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl Default for DomainVocabulary {
    fn default() -> Self {
        Self::sales()
    }
}

/// Words that are never keywords (Value Object)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopWordSet {
    words: HashSet<String>,
}

impl StopWordSet {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: to_set(words),
        }
    }

    /// The built-in English stop-word list.
    pub fn english() -> Self {
        Self::new(ENGLISH_STOP_WORDS.iter().copied())
    }

    pub fn empty() -> Self {
        Self {
            words: HashSet::new(),
        }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(token)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for StopWordSet {
    fn default() -> Self {
        Self::english()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sales_vocabulary_contains_short_terms() {
        let vocab = DomainVocabulary::sales();
        assert!(vocab.contains("cc"));
        assert!(vocab.contains("vs"));
        assert!(vocab.contains("mrr"));
        assert!(!vocab.contains("hi"));
    }

    #[test]
    fn test_sales_vocabulary_keeps_multi_word_entry() {
        assert!(DomainVocabulary::sales().contains("case study"));
    }

    #[test]
    fn test_new_lowercases_terms() {
        let vocab = DomainVocabulary::new(["CRM", "Deal"]);
        assert!(vocab.contains("crm"));
        assert!(vocab.contains("deal"));
        assert!(!vocab.contains("CRM"));
    }

    #[test]
    fn test_english_stop_words() {
        let stop = StopWordSet::english();
        assert!(stop.contains("me"));
        assert!(stop.contains("to"));
        assert!(stop.contains("the"));
        assert!(!stop.contains("cc"));
        assert!(!stop.contains("deal"));
    }

    #[test]
    fn test_lists_overlap() {
        // "to" and "the" sit in both lists; the stop-word list wins at filter time.
        let vocab = DomainVocabulary::sales();
        let stop = StopWordSet::english();
        assert!(vocab.contains("to") && stop.contains("to"));
        assert!(vocab.contains("the") && stop.contains("the"));
    }

    #[test]
    fn test_empty_sets() {
        assert!(DomainVocabulary::empty().is_empty());
        assert!(StopWordSet::empty().is_empty());
        assert_eq!(StopWordSet::default(), StopWordSet::english());
    }
}
