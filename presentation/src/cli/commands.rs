//! CLI command definitions

use clap::{Parser, ValueEnum};
use sales_intel_domain::OutputFormat as DomainOutputFormat;
use std::path::PathBuf;

/// Output format for dispatch results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Status line, records, summary, narration and audio location
    Full,
    /// Only the formatted summary
    Summary,
    /// JSON output
    Json,
}

impl From<OutputFormat> for DomainOutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => DomainOutputFormat::Full,
            OutputFormat::Summary => DomainOutputFormat::Summary,
            OutputFormat::Json => DomainOutputFormat::Json,
        }
    }
}

/// CLI arguments for sales-intel
#[derive(Parser, Debug)]
#[command(name = "sales-intel")]
#[command(author, version, about = "Sales intelligence assistant - search, summarize, listen")]
#[command(long_about = r#"
sales-intel sends a question about your sales data to a search backend,
summarizes what comes back and reads the summary aloud.

Each query runs through:
1. Keyword extraction (optional, --extract)
2. Search (remote backend, or a local dataset with --mock)
3. Summary, structured formatting and a spoken-style narration
4. Text-to-speech and playback

Summaries and narration need an OpenAI API key (OPENAI_API_KEY by default).
Without one, search results are still shown.

Configuration files are loaded from (in priority order):
1. --config <path>          Explicit config file
2. ./sales-intel.toml       Project-level config
3. ~/.config/sales-intel/config.toml   Global config
SALES_INTEL_* environment variables override all files.

Example:
  sales-intel "Show me recent leads"
  sales-intel --extract --mock "overdue invoices from Globex"
  sales-intel --chat
"#)]
pub struct Cli {
    /// The query to dispatch (not required in chat mode)
    pub query: Option<String>,

    /// Start interactive chat mode
    #[arg(short, long)]
    pub chat: bool,

    /// Send extracted keywords instead of the raw query
    #[arg(short, long)]
    pub extract: bool,

    /// Trim punctuation from tokens during keyword extraction
    #[arg(long)]
    pub strip_punctuation: bool,

    /// Search the local mock dataset instead of the remote backend
    #[arg(long)]
    pub mock: bool,

    /// Path to the mock dataset
    #[arg(long, value_name = "PATH")]
    pub mock_data: Option<PathBuf>,

    /// Skip text-to-speech
    #[arg(long)]
    pub no_speech: bool,

    /// Synthesize audio but do not play it
    #[arg(long)]
    pub no_autoplay: bool,

    /// Maximum number of results to request
    #[arg(long, value_name = "N")]
    pub max_results: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Also write diagnostic logs to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::parse_from([
            "sales-intel",
            "--extract",
            "--mock",
            "--no-speech",
            "-o",
            "json",
            "-vv",
            "--max-results",
            "5",
            "hot leads",
        ]);
        assert_eq!(cli.query.as_deref(), Some("hot leads"));
        assert!(cli.extract);
        assert!(cli.mock);
        assert!(cli.no_speech);
        assert!(!cli.no_autoplay);
        assert_eq!(cli.output, Some(OutputFormat::Json));
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.max_results, Some(5));
    }

    #[test]
    fn test_output_maps_to_domain() {
        assert_eq!(
            DomainOutputFormat::from(OutputFormat::Full),
            DomainOutputFormat::Full
        );
    }
}
