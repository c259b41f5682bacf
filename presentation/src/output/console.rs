//! Console output formatter for dispatch results

use colored::Colorize;
use sales_intel_domain::core::string::one_line_preview;
use sales_intel_domain::{
    DispatchOutcome, KeywordSet, OutputFormat, PlaybackStatus, RecordKind, SearchRecord,
};
const PREVIEW_CHARS: usize = 80;

/// Formats dispatch results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Render `outcome` in the requested format
    pub fn render(format: OutputFormat, outcome: &DispatchOutcome) -> String {
        match format {
            OutputFormat::Full => Self::format(outcome),
            OutputFormat::Summary => Self::format_summary_only(outcome),
            OutputFormat::Json => Self::format_json(outcome),
        }
    }

    /// Format the complete dispatch outcome
    pub fn format(outcome: &DispatchOutcome) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Sales Intelligence"));
        output.push('\n');

        output.push_str(&format!("{} {}\n", "Query:".cyan().bold(), outcome.query));
        if outcome.sent_query != outcome.query {
            output.push_str(&format!("{} {}\n", "Sent:".cyan().bold(), outcome.sent_query));
        }
        if let Some(keywords) = &outcome.keywords {
            output.push_str(&format!(
                "{} {}\n",
                "Keywords:".cyan().bold(),
                Self::keyword_list(keywords)
            ));
        }
        output.push('\n');
        output.push_str(&outcome.status_line());
        output.push('\n');
        let sources = outcome.data_sources();
        if !sources.is_empty() {
            output.push_str(&format!(
                "{} {}\n",
                "Data Sources:".cyan().bold(),
                sources.join(", ")
            ));
        }

        if !outcome.records.is_empty() {
            output.push_str(&Self::section_header("Results"));
            for (i, record) in outcome.records.iter().enumerate() {
                output.push_str(&format!("{:>3}. {}\n", i + 1, Self::record_line(record)));
            }
        }

        if outcome.has_summary() {
            output.push_str(&Self::section_header("Summary"));
            output.push_str(&outcome.formatted_summary);
            output.push('\n');
        }

        if !outcome.narration.is_empty() {
            output.push_str(&Self::section_header("Narration"));
            output.push_str(&outcome.narration);
            output.push('\n');
        }

        if let Some(clip) = &outcome.audio {
            let location = outcome
                .audio_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "not saved".to_string());
            output.push_str(&format!(
                "\n{} {} ({} KB, ~{:.0}s)\n",
                "Audio:".cyan().bold(),
                location,
                clip.len() / 1024,
                clip.estimated_duration().as_secs_f64()
            ));
        }

        output.push_str(&Self::notices(&outcome.notices));
        output.push_str(&Self::footer());
        output
    }

    /// Format as JSON
    pub fn format_json(outcome: &DispatchOutcome) -> String {
        serde_json::to_string_pretty(outcome).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the summary only (concise output)
    pub fn format_summary_only(outcome: &DispatchOutcome) -> String {
        let mut output = String::new();
        output.push_str(&format!("{}\n\n", outcome.status_line().dimmed()));
        if outcome.has_summary() {
            output.push_str(&outcome.formatted_summary);
            output.push('\n');
        }
        output.push_str(&Self::notices(&outcome.notices));
        output
    }

    pub fn format_keywords(keywords: &KeywordSet) -> String {
        if keywords.is_empty() {
            return format!("{}", "(no keywords)".dimmed());
        }
        Self::keyword_list(keywords)
    }

    pub fn format_playback(status: &PlaybackStatus) -> String {
        format!(
            "{} {:.1}s / {:.1}s ({:.0}%)",
            status.state.as_str().bold(),
            status.position_secs,
            status.duration_secs,
            status.progress_percent
        )
    }

    /// One-line description of a search record
    pub fn record_line(record: &SearchRecord) -> String {
        let tag = match record.kind() {
            RecordKind::Email => "email",
            RecordKind::Calendar => "event",
            RecordKind::Invoice => "invoice",
            RecordKind::Unknown => "item",
        };
        let mut parts = vec![format!("[{}]", tag).yellow().to_string()];
        parts.push(
            record
                .subject()
                .map(|s| one_line_preview(s, PREVIEW_CHARS))
                .unwrap_or_else(|| "(no subject)".to_string())
                .bold()
                .to_string(),
        );
        if let Some(sender) = record.sender() {
            parts.push(format!("from {}", sender));
        }
        if let Some(when) = record.timestamp() {
            parts.push(when.dimmed().to_string());
        }
        parts.join(" ")
    }

    fn keyword_list(keywords: &KeywordSet) -> String {
        keywords
            .iter()
            .map(|k| format!("[{}]", k))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn notices(notices: &[String]) -> String {
        notices
            .iter()
            .map(|n| format!("{} {}\n", "!".yellow().bold(), n))
            .collect()
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}
