//! CLI entrypoint for sales-intel
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::Colorize;
use sales_intel_application::{
    DispatchConfig, DispatchLogger, DispatchQueryUseCase, DisabledNarrator, DisabledSpeech,
    DisabledSummarizer, Narrator, SearchBackend, SpeechSynthesizer, Summarizer,
};
use sales_intel_domain::Severity;
use sales_intel_infrastructure::{
    ConfigLoader, FileAudioPlayer, FileConfig, HttpSearchBackend, JsonlDispatchLogger,
    MockSearchBackend, OpenAiClient, OpenAiSettings,
};
use sales_intel_presentation::{
    ChatRepl, Cli, ConsoleFormatter, OutputConfig, ProgressReporter, ReplConfig,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = init_logging(cli.verbose, cli.log_file.as_deref())?;

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    // Load configuration (CLI flags override below)
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?
    };

    for issue in config.validate() {
        let label = match issue.severity {
            Severity::Error => "error:".red().bold(),
            Severity::Warning => "warning:".yellow().bold(),
        };
        eprintln!("{} {}", label, issue.message);
    }

    let output = OutputConfig::resolve(cli.output, config.output.format, config.output.color);
    if !output.color {
        colored::control::set_override(false);
    }

    info!("Starting sales-intel");

    // === Dependency Injection ===
    let timeout = Duration::from_secs(config.search.timeout_secs);
    let remote: Arc<dyn SearchBackend> =
        Arc::new(HttpSearchBackend::new(config.search.endpoint.clone(), timeout)?);
    let mock = load_mock(&config, cli.mock_data.as_deref());
    let use_mock = cli.mock || config.search.use_mock;
    let search = match (&mock, use_mock) {
        (Some(mock), true) => mock.clone(),
        (None, true) => bail!(
            "Mock dataset could not be loaded from {}",
            mock_path(&config, cli.mock_data.as_deref()).display()
        ),
        _ => remote.clone(),
    };

    let (summarizer, narrator, speech) = language_services(&config, timeout)?;
    let dispatch_config = dispatch_config(&cli, &config, summarizer.is_some());

    let (summarizer, narrator, speech): (
        Arc<dyn Summarizer>,
        Arc<dyn Narrator>,
        Arc<dyn SpeechSynthesizer>,
    ) = match (summarizer, narrator, speech) {
        (Some(s), Some(n), Some(t)) => (s, n, t),
        _ => (
            Arc::new(DisabledSummarizer),
            Arc::new(DisabledNarrator),
            Arc::new(DisabledSpeech),
        ),
    };

    let mut player = FileAudioPlayer::new(config.playback.resolved_output_dir());
    if let Some((program, args)) = config.playback.command_line() {
        player = player.with_command(program, args);
    }

    let mut use_case = DispatchQueryUseCase::new(search, summarizer, narrator, speech, dispatch_config)
        .with_player(Arc::new(player));

    if let Some(path) = &config.logging.dispatch_log {
        match JsonlDispatchLogger::new(path) {
            Some(logger) => {
                let logger: Arc<dyn DispatchLogger> = Arc::new(logger);
                use_case = use_case.with_dispatch_logger(logger);
            }
            None => warn!("Dispatch log disabled: cannot open {}", path.display()),
        }
    }

    // Chat mode
    if cli.chat {
        let repl_config = ReplConfig {
            show_progress: config.repl.show_progress && !cli.quiet,
            history_file: config.repl.history_file.clone(),
        };
        let mut repl = ChatRepl::new(use_case, remote)
            .with_mock(mock, use_mock)
            .with_format(output.format)
            .with_progress(repl_config.show_progress)
            .with_history(repl_config.history_path());

        repl.run().await?;
        return Ok(());
    }

    // Single query mode - query is required
    let query = match cli.query {
        Some(q) => q,
        None => bail!("Query is required. Use --chat for interactive mode."),
    };

    let result = if cli.quiet {
        use_case.execute(&query).await
    } else {
        let progress = ProgressReporter::new();
        use_case.execute_with_progress(&query, &progress).await
    };

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => {
            let Some(message) = e.user_message() else {
                return Err(e.into());
            };
            eprintln!("{} {}", "Error:".red().bold(), message);
            std::process::exit(1);
        }
    };

    println!("{}", ConsoleFormatter::render(output.format, &outcome));

    // Let an external player finish the narration before exiting
    if outcome.audio.is_some() && use_case.config().autoplay {
        use_case.player().wait_idle().await;
    }

    Ok(())
}

/// Console logging at the `-v` level (or `RUST_LOG`), plus an optional plain-text file.
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let console = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let file_name = path
                .file_name()
                .with_context(|| format!("Invalid log file path: {}", path.display()))?;
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .init();

    Ok(guard)
}

fn mock_path(config: &FileConfig, override_path: Option<&Path>) -> PathBuf {
    override_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.search.mock_data.clone())
}

fn load_mock(config: &FileConfig, override_path: Option<&Path>) -> Option<Arc<dyn SearchBackend>> {
    let path = mock_path(config, override_path);
    match MockSearchBackend::from_path(&path) {
        Ok(mock) => {
            info!("Loaded {} mock records from {}", mock.len(), path.display());
            Some(Arc::new(mock))
        }
        Err(e) => {
            info!("Mock dataset unavailable: {}", e);
            None
        }
    }
}

type LanguageServices = (
    Option<Arc<dyn Summarizer>>,
    Option<Arc<dyn Narrator>>,
    Option<Arc<dyn SpeechSynthesizer>>,
);

/// OpenAI-backed services when a credential is configured.
fn language_services(config: &FileConfig, timeout: Duration) -> Result<LanguageServices> {
    let Some(api_key) = config.openai.resolve_api_key() else {
        warn!(
            "No API key in {}; summaries and narration are disabled",
            config.openai.api_key_env
        );
        return Ok((None, None, None));
    };

    let settings = OpenAiSettings::from_config(&config.openai, api_key);
    let client = Arc::new(OpenAiClient::new(settings, timeout)?);
    let summarizer: Arc<dyn Summarizer> = client.clone();
    let narrator: Arc<dyn Narrator> = client.clone();
    let speech: Arc<dyn SpeechSynthesizer> = client;
    Ok((Some(summarizer), Some(narrator), Some(speech)))
}

fn dispatch_config(cli: &Cli, config: &FileConfig, has_credentials: bool) -> DispatchConfig {
    DispatchConfig::default()
        .with_extraction(cli.extract || config.dispatch.use_extraction)
        .with_strip_punctuation(cli.strip_punctuation || config.dispatch.strip_punctuation)
        .with_summarization(has_credentials)
        .with_speech(config.dispatch.speech && !cli.no_speech)
        .with_autoplay(config.dispatch.autoplay && !cli.no_autoplay)
        .with_max_results(cli.max_results.unwrap_or(config.search.max_results))
}
