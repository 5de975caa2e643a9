//! Connection lifecycle state

use std::fmt;

/// Lifecycle of the duplex connection.
///
/// `Idle -> Connecting -> Open -> {Closed | Failed}`. There is no transition
/// back to `Connecting`; a dropped connection needs a new session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConnectionState {
    /// Not yet attempted
    #[default]
    Idle,
    Connecting,
    Open,
    Closed,
    Failed(String),
}

impl ConnectionState {
    pub fn is_open(&self) -> bool {
        matches!(self, ConnectionState::Open)
    }

    /// `Closed` or `Failed`: nothing but a new session leaves these states.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ConnectionState::Closed | ConnectionState::Failed(_))
    }

    /// `Connecting` or `Open`
    pub fn is_active(&self) -> bool {
        matches!(self, ConnectionState::Connecting | ConnectionState::Open)
    }

    /// Short status word for display
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionState::Idle => "Idle",
            ConnectionState::Connecting => "Connecting",
            ConnectionState::Open => "Connected",
            ConnectionState::Closed => "Disconnected",
            ConnectionState::Failed(_) => "Failed",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionState::Failed(reason) => write!(f, "Failed ({})", reason),
            other => f.write_str(other.label()),
        }
    }
}
