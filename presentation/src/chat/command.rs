//! Slash-command parsing for the chat REPL.

/// A parsed slash command
#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    Help,
    Quit,
    /// `None` toggles
    Extract(Option<bool>),
    /// `None` toggles
    Mock(Option<bool>),
    Pause,
    Resume,
    /// Target position in percent, 0 to 100
    Seek(f64),
    Stop,
    Replay,
    Status,
    Keywords(String),
    Unknown(String),
    /// Known command with a bad argument; carries the usage line
    Usage(&'static str),
}

impl ReplCommand {
    /// Parse a line; `None` when the line is not a command.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let rest = line.strip_prefix('/')?;
        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };

        let command = match name {
            "quit" | "exit" | "q" => ReplCommand::Quit,
            "help" | "h" | "?" => ReplCommand::Help,
            "extract" => match parse_switch(arg) {
                Ok(on) => ReplCommand::Extract(on),
                Err(()) => ReplCommand::Usage("/extract [on|off]"),
            },
            "mock" => match parse_switch(arg) {
                Ok(on) => ReplCommand::Mock(on),
                Err(()) => ReplCommand::Usage("/mock [on|off]"),
            },
            "pause" => ReplCommand::Pause,
            "resume" | "play" => ReplCommand::Resume,
            "seek" => match arg.trim_end_matches('%').parse::<f64>() {
                Ok(pct) if pct.is_finite() => ReplCommand::Seek(pct.clamp(0.0, 100.0)),
                _ => ReplCommand::Usage("/seek <percent>"),
            },
            "stop" => ReplCommand::Stop,
            "replay" => ReplCommand::Replay,
            "status" => ReplCommand::Status,
            "keywords" | "kw" => {
                if arg.is_empty() {
                    ReplCommand::Usage("/keywords <text>")
                } else {
                    ReplCommand::Keywords(arg.to_string())
                }
            }
            _ => ReplCommand::Unknown(line.to_string()),
        };
        Some(command)
    }
}

fn parse_switch(arg: &str) -> Result<Option<bool>, ()> {
    match arg.to_ascii_lowercase().as_str() {
        "" => Ok(None),
        "on" | "true" | "yes" | "1" => Ok(Some(true)),
        "off" | "false" | "no" | "0" => Ok(Some(false)),
        _ => Err(()),
    }
}
