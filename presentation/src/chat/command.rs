//! Slash commands understood by the chat REPL

use std::path::PathBuf;

/// A parsed `/command` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Help,
    Status,
    History,
    Upload(Vec<PathBuf>),
    Files,
    Reconnect,
    Quit,
}

impl ReplCommand {
    /// Parse a line starting with `/`.
    ///
    /// Returns `None` for plain text (a query), `Some(Err(message))` for an
    /// unknown or incomplete command.
    pub fn parse(line: &str) -> Option<Result<Self, String>> {
        let line = line.trim();
        let rest = line.strip_prefix('/')?;
        let mut words = rest.split_whitespace();
        let name = words.next().unwrap_or_default();

        let command = match name {
            "help" | "h" | "?" => Ok(ReplCommand::Help),
            "status" => Ok(ReplCommand::Status),
            "history" => Ok(ReplCommand::History),
            "files" => Ok(ReplCommand::Files),
            "reconnect" => Ok(ReplCommand::Reconnect),
            "quit" | "exit" | "q" => Ok(ReplCommand::Quit),
            "upload" => {
                let paths: Vec<PathBuf> = words.map(PathBuf::from).collect();
                if paths.is_empty() {
                    Err("Usage: /upload <file.pdf>... <metadata.xlsx> <category.xlsx>".to_string())
                } else {
                    Ok(ReplCommand::Upload(paths))
                }
            }
            _ => Err(format!(
                "Unknown command: {}\nType /help for available commands",
                line
            )),
        };
        Some(command)
    }

    /// Lines printed by `/help`
    pub fn help() -> &'static [(&'static str, &'static str)] {
        &[
            ("/help, /h, /?", "Show this help"),
            ("/status", "Show connection state and endpoint"),
            ("/history", "Show the whole transcript"),
            ("/upload <paths>", "Upload PDFs plus metadata and category sheets"),
            ("/files", "List files uploaded in this run"),
            ("/reconnect", "Start a new session (clears the transcript)"),
            ("/quit, /exit, /q", "Exit chat"),
        ]
    }
}
