//! REPL (Read-Eval-Print Loop) for interactive chat

use super::command::ReplCommand;
use crate::ConsoleFormatter;
use crate::ProgressReporter;
use colored::Colorize;
use sales_intel_application::{DispatchQueryUseCase, SearchBackend};
use sales_intel_domain::OutputFormat;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::path::PathBuf;
use std::sync::Arc;

/// Interactive chat REPL
pub struct ChatRepl {
    use_case: DispatchQueryUseCase,
    remote: Arc<dyn SearchBackend>,
    mock: Option<Arc<dyn SearchBackend>>,
    using_mock: bool,
    format: OutputFormat,
    show_progress: bool,
    history_path: Option<PathBuf>,
}

impl ChatRepl {
    /// Create a new ChatRepl around a configured use case.
    ///
    /// `remote` is the backend used when mock mode is off.
    pub fn new(use_case: DispatchQueryUseCase, remote: Arc<dyn SearchBackend>) -> Self {
        Self {
            use_case,
            remote,
            mock: None,
            using_mock: false,
            format: OutputFormat::Summary,
            show_progress: true,
            history_path: None,
        }
    }

    /// Offline backend for `/mock on`; `active` selects it from the start.
    pub fn with_mock(mut self, mock: Option<Arc<dyn SearchBackend>>, active: bool) -> Self {
        self.using_mock = active && mock.is_some();
        self.mock = mock;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Set whether to show progress
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn with_history(mut self, path: Option<PathBuf>) -> Self {
        self.history_path = path;
        self
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        if let Some(ref path) = self.history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        self.print_welcome();

        loop {
            let readline = rl.readline(">>> ");

            match readline {
                Ok(line) => {
                    let line = line.trim();

                    if line.is_empty() {
                        continue;
                    }

                    let _ = rl.add_history_entry(line);

                    if let Some(command) = ReplCommand::parse(line) {
                        if self.handle_command(command).await {
                            break;
                        }
                        continue;
                    }

                    self.process_query(line).await;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        let _ = self.use_case.player().stop().await;

        if let Some(ref path) = self.history_path {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│       Sales Intelligence - Chat Mode        │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        self.print_modes();
        println!();
        Self::print_help();
    }

    fn print_modes(&self) {
        let config = self.use_case.config();
        let on_off = |on: bool| if on { "on".green() } else { "off".dimmed() };
        println!(
            "Search: {}  Extraction: {}  Summaries: {}  Speech: {}",
            self.use_case.search_backend_name().bold(),
            on_off(config.use_extraction),
            on_off(config.summarization_enabled),
            on_off(config.speaks()),
        );
    }

    fn print_help() {
        println!("Commands:");
        println!("  /help              - Show this help");
        println!("  /extract [on|off]  - Send extracted keywords instead of the raw query");
        println!("  /mock [on|off]     - Search the local mock dataset");
        println!("  /keywords <text>   - Show the keywords extracted from text");
        println!("  /pause, /resume    - Pause or resume narration");
        println!("  /seek <percent>    - Jump within the narration");
        println!("  /stop, /replay     - Stop, or play the last narration again");
        println!("  /status            - Show playback and mode status");
        println!("  /quit              - Exit chat");
        println!();
    }

    /// Handle slash commands. Returns true if should exit.
    async fn handle_command(&mut self, command: ReplCommand) -> bool {
        let player = self.use_case.player().clone();
        let result = match command {
            ReplCommand::Quit => {
                println!("Bye!");
                return true;
            }
            ReplCommand::Help => {
                println!();
                Self::print_help();
                Ok(())
            }
            ReplCommand::Extract(on) => {
                let mut config = self.use_case.config().clone();
                config.use_extraction = on.unwrap_or(!config.use_extraction);
                self.use_case.set_config(config);
                self.print_modes();
                Ok(())
            }
            ReplCommand::Mock(on) => {
                self.set_mock(on.unwrap_or(!self.using_mock));
                Ok(())
            }
            ReplCommand::Keywords(text) => {
                let keywords = self.use_case.extractor().extract(&text);
                println!("{}", ConsoleFormatter::format_keywords(&keywords));
                Ok(())
            }
            ReplCommand::Pause => player.pause().await,
            ReplCommand::Resume => player.resume().await,
            ReplCommand::Seek(percent) => player.seek(percent / 100.0).await,
            ReplCommand::Stop => player.stop().await,
            ReplCommand::Replay => player.replay().await,
            ReplCommand::Status => {
                self.print_modes();
                println!("Playback: {}", ConsoleFormatter::format_playback(&player.status()));
                Ok(())
            }
            ReplCommand::Usage(usage) => {
                println!("Usage: {}", usage);
                Ok(())
            }
            ReplCommand::Unknown(cmd) => {
                println!("Unknown command: {}", cmd);
                println!("Type /help for available commands");
                Ok(())
            }
        };

        if let Err(e) = result {
            println!("{} {}", "!".yellow().bold(), e);
        }
        false
    }

    fn set_mock(&mut self, on: bool) {
        if on {
            let Some(mock) = self.mock.clone() else {
                println!("{} Mock dataset is not available", "!".yellow().bold());
                return;
            };
            self.use_case.set_search_backend(mock);
        } else {
            self.use_case.set_search_backend(self.remote.clone());
        }
        self.using_mock = on;
        self.print_modes();
    }

    async fn process_query(&self, query: &str) {
        println!();

        let result = if self.show_progress {
            let progress = ProgressReporter::new();
            self.use_case.execute_with_progress(query, &progress).await
        } else {
            self.use_case.execute(query).await
        };

        match result {
            Ok(outcome) => {
                println!("{}", ConsoleFormatter::render(self.format, &outcome));
            }
            Err(e) => {
                if let Some(message) = e.user_message() {
                    eprintln!("{} {}", "Error:".red().bold(), message);
                }
            }
        }
        println!();
    }
}
