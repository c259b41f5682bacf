//! Terminal front end for sales-intel
//!
//! Argument parsing, result rendering, dispatch spinners and the
//! interactive chat loop.

pub mod chat;
pub mod cli;
pub mod config;
pub mod output;
pub mod progress;

pub use chat::{ChatRepl, ReplCommand};
pub use cli::commands::{Cli, OutputFormat};
pub use config::{OutputConfig, ReplConfig};
pub use output::console::ConsoleFormatter;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
