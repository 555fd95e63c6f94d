//! Session backends.
//!
//! A backend owns one running assistant session: where it lives (an
//! editor-embedded terminal buffer or a multiplexer pane), how text reaches
//! it, and how it is shown, hidden and torn down. The two variants absorb
//! completely different host surfaces behind the [`Backend`] trait.

mod pane;
mod terminal;

pub use pane::{PaneBackend, VAR_PANE_ID};
pub use terminal::TerminalBackend;

use std::fmt;

use async_trait::async_trait;

use crate::config::SessionConfig;
use crate::Result;

/// User event fired after every successful [`Backend::run`], for external
/// listeners (statuslines, autocommands).
pub const SESSION_OPENED_EVENT: &str = "AgentDockOpen";

/// Where a backend hosts the assistant process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Terminal buffer inside the editor.
    EmbeddedTerminal,
    /// Pane of an external terminal multiplexer.
    MultiplexerPane,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::EmbeddedTerminal => write!(f, "terminal"),
            BackendKind::MultiplexerPane => write!(f, "multiplexer"),
        }
    }
}

/// Opaque identifier of a running assistant session.
///
/// Exactly one handle exists per live backend, owned exclusively by it. A
/// stored handle is never presented to callers as live without re-checking
/// the external state that backs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionHandle {
    /// Terminal job channel id.
    TerminalJob(i64),
    /// Multiplexer pane id.
    MultiplexerPane(String),
}

impl fmt::Display for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionHandle::TerminalJob(job) => write!(f, "job {}", job),
            SessionHandle::MultiplexerPane(pane) => write!(f, "pane {}", pane),
        }
    }
}

/// One running assistant session.
#[async_trait]
pub trait Backend: Send {
    /// Start the session, or adopt a still-live one discovered in external
    /// state. Idempotent while active: returns the existing handle without
    /// spawning anything.
    async fn run(&mut self, command: &str) -> Result<SessionHandle>;

    /// Deliver a prompt to the assistant, submitting it.
    async fn send_prompt(&mut self, text: &str) -> Result<()>;

    /// Tear the session down: interrupt the assistant and destroy its home.
    /// No-op while inactive.
    async fn exit(&mut self) -> Result<()>;

    /// Move the session out of sight without stopping the assistant.
    async fn hide(&mut self) -> Result<()>;

    /// Bring the session back on screen per the configured layout.
    async fn show(&mut self) -> Result<()>;

    /// Whether the session is live, verified against external state rather
    /// than trusted from memory.
    async fn is_active(&self) -> bool;

    /// The current session handle, if one is attached.
    fn handle(&self) -> Option<SessionHandle>;

    /// Which variant this backend is.
    fn kind(&self) -> BackendKind;

    /// The configuration snapshot this backend was created with.
    fn config(&self) -> &SessionConfig;
}
