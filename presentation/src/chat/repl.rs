//! REPL (Read-Eval-Print Loop) for interactive chat
//!
//! `rustyline` blocks, so line editing runs on a blocking thread and hands
//! each line to the async loop over a channel. The loop `select!`s between
//! typed lines and session events, so responses are rendered as they arrive.
//! After a query the prompt is held back until the reply (or an error)
//! arrives, and a spinner runs meanwhile. Ctrl-C while held gives the prompt
//! back; a late reply is still printed when it arrives.

use super::command::ReplCommand;
use crate::config::ReplConfig;
use crate::output::console::ConsoleFormatter;
use crate::progress::indicator::TypingIndicator;
use docchat_application::{
    ConversationLogger, DuplexConnector, NoConversationLogger, SessionController, SessionError,
    UploadDocumentsUseCase,
};
use docchat_domain::{ConnectionState, Endpoint, SessionSnapshot};
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc as std_mpsc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

const PROMPT: &str = "docchat> ";
const WAITING: &str = "Waiting for response...";

enum InputEvent {
    Line(String),
    Eof,
}

/// What the terminal has already shown of the current session
#[derive(Debug, Default)]
struct View {
    rendered: usize,
    state: ConnectionState,
    errors: u64,
}

impl View {
    /// Lines to print so the terminal catches up with `snapshot`.
    ///
    /// User messages are not echoed; the user typed them.
    fn catch_up(
        &mut self,
        snapshot: &SessionSnapshot,
        endpoint: &Endpoint,
        formatter: &ConsoleFormatter,
    ) -> Vec<String> {
        let mut lines = Vec::new();
        let mut shown = Vec::new();

        for message in snapshot.messages_since(self.rendered) {
            if message.is_assistant() {
                lines.push(formatter.message(message));
                shown.push(message.content.as_str());
            }
        }
        self.rendered = snapshot.messages.len();

        if snapshot.connection_state != self.state {
            let line = ConsoleFormatter::state_change(&snapshot.connection_state, endpoint);
            if !line.is_empty() {
                lines.push(line);
            }
            if matches!(snapshot.connection_state, ConnectionState::Failed(_)) {
                // already shown as the failure reason
                self.errors = snapshot.error_count;
            }
            self.state = snapshot.connection_state.clone();
        }

        if snapshot.error_count != self.errors {
            if let Some(reason) = &snapshot.last_error
                && !shown.contains(&reason.as_str())
            {
                lines.push(ConsoleFormatter::error(reason));
            }
            self.errors = snapshot.error_count;
        }

        lines
    }
}

/// Whether the reader thread is parked until the reply to a query arrives.
///
/// Every line the reader hands over is acknowledged exactly once; each
/// method returns `true` when that acknowledgement should be sent now.
#[derive(Debug, Default)]
struct PromptGate {
    held: bool,
}

impl PromptGate {
    fn after_line(&mut self, sent_query: bool, awaiting: bool) -> bool {
        self.held = sent_query && awaiting;
        !self.held
    }

    fn after_event(&mut self, awaiting: bool) -> bool {
        if self.held && !awaiting {
            self.held = false;
            return true;
        }
        false
    }

    /// Stop waiting for the reply.
    fn interrupt(&mut self) -> bool {
        std::mem::take(&mut self.held)
    }

    fn is_held(&self) -> bool {
        self.held
    }
}

/// Interactive chat REPL
pub struct ChatRepl {
    connector: Arc<dyn DuplexConnector>,
    endpoint: Endpoint,
    conversation_logger: Arc<dyn ConversationLogger>,
    uploader: Option<Arc<UploadDocumentsUseCase>>,
    config: ReplConfig,
    formatter: ConsoleFormatter,
    uploaded: Vec<String>,
}

impl ChatRepl {
    /// Create a new ChatRepl
    pub fn new(connector: Arc<dyn DuplexConnector>, endpoint: Endpoint) -> Self {
        Self {
            connector,
            endpoint,
            conversation_logger: Arc::new(NoConversationLogger),
            uploader: None,
            config: ReplConfig::default(),
            formatter: ConsoleFormatter::default(),
            uploaded: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: ReplConfig) -> Self {
        self.formatter = ConsoleFormatter::new(config.show_timestamps);
        self.config = config;
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    /// Enable `/upload`
    pub fn with_uploader(mut self, uploader: Arc<UploadDocumentsUseCase>) -> Self {
        self.uploader = Some(uploader);
        self
    }

    /// Files uploaded before the REPL started, listed by `/files`
    pub fn with_uploaded(mut self, files: Vec<String>) -> Self {
        self.uploaded = files;
        self
    }

    /// Run the interactive REPL until `/quit` or end of input
    pub async fn run(&mut self) -> RlResult<()> {
        let (line_tx, mut line_rx) = mpsc::unbounded_channel();
        let (ack_tx, ack_rx) = std_mpsc::channel();
        let (ready_tx, ready_rx) = oneshot::channel();
        let history = self.config.history_path();
        let reader = tokio::task::spawn_blocking(move || {
            read_lines(history.as_deref(), line_tx, ack_rx, ready_tx)
        });
        if let Ok(Err(e)) = ready_rx.await {
            let _ = reader.await;
            return Err(e);
        }

        self.print_welcome();

        let mut indicator = TypingIndicator::new(self.config.show_progress);
        let mut session = self.new_session();
        let mut view = View::default();
        self.render(&session.snapshot(), &mut view);
        let mut gate = PromptGate::default();

        loop {
            tokio::select! {
                input = line_rx.recv() => {
                    let Some(InputEvent::Line(line)) = input else { break };
                    let before = session.messages().len();
                    if self.handle_line(&line, &mut session, &mut view, &mut indicator).await {
                        break;
                    }
                    let sent_query = session.messages().len() > before;
                    if !gate.after_line(sent_query, session.awaiting_response()) {
                        indicator.start(WAITING);
                    } else if ack_tx.send(()).is_err() {
                        break;
                    }
                }
                Some(snapshot) = session.next_event() => {
                    indicator.stop();
                    self.render(&snapshot, &mut view);
                    if gate.after_event(snapshot.awaiting_response) {
                        if ack_tx.send(()).is_err() {
                            break;
                        }
                    } else if gate.is_held() {
                        indicator.start(WAITING);
                    }
                }
                interrupted = tokio::signal::ctrl_c() => {
                    if let Err(e) = interrupted {
                        warn!("Could not listen for Ctrl-C: {}", e);
                        break;
                    }
                    if gate.interrupt() {
                        indicator.stop();
                        println!("Stopped waiting. A late reply will still be shown.");
                        if ack_tx.send(()).is_err() {
                            break;
                        }
                    }
                }
            }
        }

        indicator.stop();
        session.close();
        drop(ack_tx);
        let _ = reader.await;
        println!("Bye!");
        Ok(())
    }

    fn new_session(&self) -> SessionController {
        let mut session = SessionController::new(self.connector.clone(), self.endpoint.clone())
            .with_conversation_logger(self.conversation_logger.clone());
        if let Err(e) = session.open() {
            warn!("Could not open session: {}", e);
        }
        session
    }

    fn render(&self, snapshot: &SessionSnapshot, view: &mut View) {
        for line in view.catch_up(snapshot, &self.endpoint, &self.formatter) {
            println!("{}", line);
        }
    }

    /// Handle one input line. Returns true if should exit.
    async fn handle_line(
        &mut self,
        line: &str,
        session: &mut SessionController,
        view: &mut View,
        indicator: &mut TypingIndicator,
    ) -> bool {
        let command = match ReplCommand::parse(line) {
            None => {
                self.send_query(line, session, view);
                return false;
            }
            Some(Err(message)) => {
                println!("{}", message);
                return false;
            }
            Some(Ok(command)) => command,
        };

        match command {
            ReplCommand::Quit => return true,
            ReplCommand::Help => self.print_help(),
            ReplCommand::Status => {
                println!();
                println!(
                    "{}",
                    ConsoleFormatter::status(&session.snapshot(), session.endpoint())
                );
                println!();
            }
            ReplCommand::History => {
                println!();
                println!("{}", self.formatter.history(session.messages()));
                println!();
            }
            ReplCommand::Upload(paths) => self.upload(&paths, indicator).await,
            ReplCommand::Files => self.print_files(),
            ReplCommand::Reconnect => {
                session.close();
                println!("Starting a new session.");
                *session = self.new_session();
                *view = View::default();
                self.render(&session.snapshot(), view);
            }
        }
        false
    }

    fn send_query(&self, text: &str, session: &mut SessionController, view: &mut View) {
        match session.send_query(text) {
            Ok(message) => debug!("Sent message #{}", message.sequence),
            Err(SessionError::NotConnected) => {
                let hint = match session.connection_state() {
                    ConnectionState::Connecting | ConnectionState::Idle => {
                        "Still connecting, try again in a moment."
                    }
                    _ => "Not connected. Type /reconnect to start a new session.",
                };
                println!("{}", ConsoleFormatter::error(hint));
            }
            Err(e) => println!("{}", ConsoleFormatter::error(&e.to_string())),
        }
        view.rendered = session.messages().len();
        // a failed send was just printed
        view.errors = session.error_count();
    }

    async fn upload(&mut self, paths: &[PathBuf], indicator: &mut TypingIndicator) {
        let Some(uploader) = self.uploader.clone() else {
            println!("{}", ConsoleFormatter::error("Upload is not configured"));
            return;
        };

        indicator.start(&format!("Uploading {} file(s)...", paths.len()));
        let result = uploader.execute(paths).await;
        indicator.stop();

        match result {
            Ok(output) => {
                println!("{}", ConsoleFormatter::upload(&output));
                self.uploaded.extend(output.uploaded);
            }
            Err(e) => println!("{}", ConsoleFormatter::error(&e.to_string())),
        }
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", ConsoleFormatter::header("docchat - Document Chat"));
        println!();
        println!("Endpoint: {}", self.endpoint);
        println!("Type a question, or /help for commands.");
        println!();
    }

    fn print_help(&self) {
        println!();
        println!("Commands:");
        for (command, description) in ReplCommand::help() {
            println!("  {:<18} - {}", command, description);
        }
        println!();
    }

    fn print_files(&self) {
        if self.uploaded.is_empty() {
            println!("No files uploaded yet.");
            return;
        }
        println!("Uploaded files:");
        for name in &self.uploaded {
            println!("  - {}", name);
        }
    }
}

/// Blocking line reader. Waits for an ack after each line so the prompt is
/// not redrawn while output for that line is still being printed.
fn read_lines(
    history: Option<&Path>,
    lines: mpsc::UnboundedSender<InputEvent>,
    acks: std_mpsc::Receiver<()>,
    ready: oneshot::Sender<RlResult<()>>,
) {
    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(e) => {
            let _ = ready.send(Err(e));
            return;
        }
    };
    let _ = ready.send(Ok(()));

    if let Some(path) = history {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let _ = editor.load_history(path);
    }

    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(line);
                if lines.send(InputEvent::Line(line.to_string())).is_err() {
                    break;
                }
                if acks.recv().is_err() {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
            }
            Err(ReadlineError::Eof) => {
                let _ = lines.send(InputEvent::Eof);
                break;
            }
            Err(err) => {
                warn!("Readline error: {:?}", err);
                let _ = lines.send(InputEvent::Eof);
                break;
            }
        }
    }

    if let Some(path) = history {
        let _ = editor.save_history(path);
    }
}
