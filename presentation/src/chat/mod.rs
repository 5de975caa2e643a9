//! Interactive chat module
//!
//! Provides a readline-based interactive chat interface over one
//! [`SessionController`](docchat_application::SessionController) at a time.

mod command;
mod repl;

pub use command::ReplCommand;
pub use repl::ChatRepl;
