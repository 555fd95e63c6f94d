//! Error types for agent-dock.

use thiserror::Error;

use crate::backend::BackendKind;

/// Main error type for agent-dock operations.
#[derive(Error, Debug)]
pub enum AgentDockError {
    /// The host editor lacks a feature required by the requested operation.
    #[error("{0} is not supported in this editor")]
    UnsupportedFeature(&'static str),

    /// An operation was attempted on a backend that holds no session.
    #[error("{0} session is not active")]
    NotActive(BackendKind),

    /// An operation was attempted before any session was started.
    #[error("no active assistant session: start one first")]
    NoActiveSession,

    /// No terminal process handle could be resolved for a buffer.
    #[error("terminal job not found")]
    TerminalNotFound,

    /// The multiplexer refused to create a pane.
    #[error("failed to create multiplexer pane")]
    PaneCreationFailed,

    /// The host editor rejected or failed an RPC call.
    #[error("host editor error: {0}")]
    Host(String),

    /// A multiplexer command failed to spawn or exited non-zero.
    #[error("multiplexer command failed: {0}")]
    Mux(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type for agent-dock operations.
pub type Result<T> = std::result::Result<T, AgentDockError>;
