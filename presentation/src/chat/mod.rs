//! Interactive chat: slash commands and the readline loop

mod command;
mod repl;

pub use command::ReplCommand;
pub use repl::ChatRepl;
