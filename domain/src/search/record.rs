//! Heterogeneous search records (emails, calendar events, invoices)

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;

/// Broad shape of a search record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Email,
    Calendar,
    Invoice,
    Unknown,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Email => "email",
            RecordKind::Calendar => "calendar",
            RecordKind::Invoice => "invoice",
            RecordKind::Unknown => "unknown",
        }
    }

    /// Kind implied by a dataset bucket name (`gmail`, `xero`, ...).
    pub fn from_source(source: &str) -> Self {
        match source.to_ascii_lowercase().as_str() {
            "gmail" | "outlook" | "email" => RecordKind::Email,
            "calendar" => RecordKind::Calendar,
            "xero" | "quickbooks" | "invoice" => RecordKind::Invoice,
            _ => RecordKind::Unknown,
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "email" => Ok(RecordKind::Email),
            "calendar" => Ok(RecordKind::Calendar),
            "invoice" => Ok(RecordKind::Invoice),
            "unknown" => Ok(RecordKind::Unknown),
            other => Err(DomainError::UnknownRecordKind(other.to_string())),
        }
    }
}

const EMAIL_FIELDS: &[&str] = &["subject", "sender", "senderEmail", "messageText"];
const CALENDAR_FIELDS: &[&str] = &["start", "startTime", "attendees", "location"];
const INVOICE_FIELDS: &[&str] = &["invoiceNumber", "amountDue", "dueDate", "total"];

/// One result returned by a search backend.
///
/// The backend returns loosely shaped JSON objects, so the record keeps the
/// raw fields and exposes typed accessors for the ones the assistant knows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchRecord {
    fields: Map<String, Value>,
}

impl SearchRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Wrap any JSON value; non-objects are stored under `value`.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self { fields },
            other => {
                let mut fields = Map::new();
                fields.insert("value".to_string(), other);
                Self { fields }
            }
        }
    }

    /// Tag the record with the dataset bucket it came from.
    pub fn with_source(mut self, source: &str) -> Self {
        self.fields
            .entry("source")
            .or_insert_with(|| Value::String(source.to_string()));
        self
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    pub fn id(&self) -> Option<&str> {
        self.str_field("id")
    }

    pub fn source(&self) -> Option<&str> {
        self.str_field("source")
    }

    pub fn subject(&self) -> Option<&str> {
        self.str_field("subject")
            .or_else(|| self.str_field("title"))
            .or_else(|| self.str_field("summary"))
    }

    pub fn sender(&self) -> Option<&str> {
        self.str_field("sender")
    }

    pub fn sender_email(&self) -> Option<&str> {
        self.str_field("senderEmail")
    }

    pub fn timestamp(&self) -> Option<&str> {
        self.str_field("messageTimestamp")
            .or_else(|| self.str_field("start"))
            .or_else(|| self.str_field("startTime"))
            .or_else(|| self.str_field("dueDate"))
    }

    /// Body text: `messageText`, falling back to `preview.body`.
    pub fn text(&self) -> Option<&str> {
        self.str_field("messageText").or_else(|| {
            self.fields
                .get("preview")
                .and_then(|p| p.get("body"))
                .and_then(Value::as_str)
        })
    }

    pub fn kind(&self) -> RecordKind {
        if let Some(kind) = self.str_field("kind").and_then(|k| k.parse().ok()) {
            return kind;
        }
        if let Some(source) = self.source() {
            let kind = RecordKind::from_source(source);
            if kind != RecordKind::Unknown {
                return kind;
            }
        }
        let has_any = |names: &[&str]| names.iter().any(|n| self.fields.contains_key(*n));
        if has_any(EMAIL_FIELDS) {
            RecordKind::Email
        } else if has_any(CALENDAR_FIELDS) {
            RecordKind::Calendar
        } else if has_any(INVOICE_FIELDS) {
            RecordKind::Invoice
        } else {
            RecordKind::Unknown
        }
    }

    /// Lower-cased JSON text of the whole record, for substring matching.
    pub fn searchable_text(&self) -> String {
        serde_json::to_string(&self.fields)
            .unwrap_or_default()
            .to_lowercase()
    }
}
