//! Console output formatter for the chat transcript

use colored::Colorize;
use docchat_application::UploadDocumentsOutput;
use docchat_domain::{ConnectionState, Endpoint, Message, Role, SessionSnapshot};

/// Formats transcript lines and session status for the terminal
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleFormatter {
    show_timestamps: bool,
}

impl ConsoleFormatter {
    pub fn new(show_timestamps: bool) -> Self {
        Self { show_timestamps }
    }

    /// One transcript message, with an optional local arrival time.
    pub fn message(&self, message: &Message) -> String {
        let label = match message.role {
            Role::User => message.role.label().cyan().bold(),
            Role::Assistant => message.role.label().green().bold(),
        };
        let time = if self.show_timestamps {
            let local = message.received_at.with_timezone(&chrono::Local);
            format!("{} ", format!("[{}]", local.format("%H:%M:%S")).dimmed())
        } else {
            String::new()
        };
        format!("{}{}: {}", time, label, message.content)
    }

    /// Every message, oldest first.
    pub fn history(&self, messages: &[Message]) -> String {
        if messages.is_empty() {
            return "No messages yet.".dimmed().to_string();
        }
        messages
            .iter()
            .map(|m| self.message(m))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Announce a connection state change.
    pub fn state_change(state: &ConnectionState, endpoint: &Endpoint) -> String {
        match state {
            ConnectionState::Idle => String::new(),
            ConnectionState::Connecting => {
                format!("{} {}...", "Connecting to".dimmed(), endpoint)
            }
            ConnectionState::Open => format!("{} {}", "Connected to".green(), endpoint),
            ConnectionState::Closed => format!(
                "{} Type /reconnect to start a new session.",
                "Disconnected.".yellow()
            ),
            ConnectionState::Failed(reason) => {
                format!("{} {}", "Connection failed:".red().bold(), reason)
            }
        }
    }

    pub fn error(reason: &str) -> String {
        format!("{} {}", "Error:".red().bold(), reason)
    }

    /// Multi-line `/status` report.
    pub fn status(snapshot: &SessionSnapshot, endpoint: &Endpoint) -> String {
        let state = match &snapshot.connection_state {
            ConnectionState::Open => snapshot.connection_state.label().green(),
            ConnectionState::Failed(_) => snapshot.connection_state.to_string().red(),
            ConnectionState::Closed => snapshot.connection_state.label().yellow(),
            other => other.label().normal(),
        };
        let awaiting = if snapshot.awaiting_response {
            "yes"
        } else {
            "no"
        };

        let mut lines = vec![
            format!("{} {}", "Endpoint:".cyan().bold(), endpoint),
            format!("{} {}", "State:".cyan().bold(), state),
            format!("{} {}", "Messages:".cyan().bold(), snapshot.messages.len()),
            format!("{} {}", "Awaiting response:".cyan().bold(), awaiting),
        ];
        if let Some(error) = &snapshot.last_error {
            lines.push(format!("{} {}", "Last error:".red().bold(), error));
        }
        lines.join("\n")
    }

    /// Result of a successful upload.
    pub fn upload(output: &UploadDocumentsOutput) -> String {
        let mut lines = vec![format!("{} {}", "v".green(), output.receipt.message)];
        for name in &output.uploaded {
            lines.push(format!("  - {}", name));
        }
        for path in &output.skipped {
            lines.push(format!("  {} skipped {}", "!".yellow(), path.display()));
        }
        lines.join("\n")
    }

    pub fn header(title: &str) -> String {
        let width = 45;
        let line = "─".repeat(width);
        format!(
            "╭{}╮\n│{:^width$}│\n╰{}╯",
            line,
            title,
            line,
            width = width
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docchat_domain::{MessageLog, NewMessage, UploadReceipt};
    use std::path::PathBuf;

    fn plain() {
        colored::control::set_override(false);
    }

    fn transcript() -> Vec<Message> {
        let mut log = MessageLog::new();
        log.append(NewMessage::user("Hello"));
        log.append(NewMessage::assistant("Hi there"));
        log.all().to_vec()
    }

    #[test]
    fn test_message_labels_roles() {
        plain();
        let messages = transcript();
        let formatter = ConsoleFormatter::new(false);
        assert_eq!(formatter.message(&messages[0]), "You: Hello");
        assert_eq!(formatter.message(&messages[1]), "Assistant: Hi there");
    }

    #[test]
    fn test_message_with_timestamp() {
        plain();
        let messages = transcript();
        let line = ConsoleFormatter::new(true).message(&messages[0]);
        assert!(line.starts_with('['));
        assert!(line.ends_with("] You: Hello"));
    }

    #[test]
    fn test_history_empty_and_full() {
        plain();
        let formatter = ConsoleFormatter::default();
        assert_eq!(formatter.history(&[]), "No messages yet.");
        assert_eq!(
            formatter.history(&transcript()),
            "You: Hello\nAssistant: Hi there"
        );
    }

    #[test]
    fn test_status_includes_last_error() {
        plain();
        let snapshot = SessionSnapshot {
            connection_state: ConnectionState::Failed("refused".to_string()),
            messages: transcript(),
            awaiting_response: false,
            last_error: Some("refused".to_string()),
            error_count: 1,
        };
        let status = ConsoleFormatter::status(&snapshot, &Endpoint::default());
        assert!(status.contains("Endpoint: ws://localhost:8000/ws"));
        assert!(status.contains("State: Failed (refused)"));
        assert!(status.contains("Messages: 2"));
        assert!(status.contains("Last error: refused"));
    }

    #[test]
    fn test_state_change_messages() {
        plain();
        let endpoint = Endpoint::default();
        assert_eq!(
            ConsoleFormatter::state_change(&ConnectionState::Open, &endpoint),
            "Connected to ws://localhost:8000/ws"
        );
        assert!(ConsoleFormatter::state_change(&ConnectionState::Idle, &endpoint).is_empty());
    }

    #[test]
    fn test_upload_summary() {
        plain();
        let output = UploadDocumentsOutput {
            receipt: UploadReceipt {
                message: "Files processed successfully".to_string(),
            },
            uploaded: vec!["a.pdf".to_string(), "m.xlsx".to_string()],
            skipped: vec![PathBuf::from("notes.txt")],
        };
        assert_eq!(
            ConsoleFormatter::upload(&output),
            "v Files processed successfully\n  - a.pdf\n  - m.xlsx\n  ! skipped notes.txt"
        );
    }
}
