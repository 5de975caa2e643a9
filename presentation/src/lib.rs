//! Presentation layer for docchat
//!
//! This crate contains the CLI definition, the interactive chat REPL,
//! transcript formatting and progress spinners.

pub mod chat;
pub mod cli;
pub mod config;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use chat::{ChatRepl, ReplCommand};
pub use cli::commands::Cli;
pub use config::ReplConfig;
pub use output::console::ConsoleFormatter;
pub use progress::indicator::TypingIndicator;
