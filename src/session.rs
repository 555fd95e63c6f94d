//! Session lifecycle management.
//!
//! [`SessionManager`] is the single entry point external callers hold. It
//! owns at most one live backend at a time, decides which backend variant
//! fits the current environment, and delegates the session contract to it.
//! One manager is constructed by plugin initialization and threaded through
//! every entry point; tests construct their own with mock collaborators.

use std::sync::Arc;

use crate::backend::{Backend, BackendKind, PaneBackend, SessionHandle, TerminalBackend};
use crate::config::{Layout, SessionConfig};
use crate::editor::AdapterFactory;
use crate::error::AgentDockError;
use crate::host::{self, EditorHandle};
use crate::mux::MuxClient;
use crate::Result;

/// Decide where a new session should run.
///
/// The multiplexer pane is used only when the editor itself runs inside the
/// multiplexer and the requested layout is a split; a floating layout has
/// no pane equivalent and always goes to the embedded terminal.
pub fn select_backend_kind(layout: Layout, inside_multiplexer: bool) -> BackendKind {
    if inside_multiplexer && layout.is_split() {
        BackendKind::MultiplexerPane
    } else {
        BackendKind::EmbeddedTerminal
    }
}

/// Whether the editor process is running inside the terminal multiplexer.
pub async fn inside_multiplexer(host: &dyn EditorHandle) -> bool {
    let tmux = host::expand(host, "$TMUX").await;
    !tmux.is_empty() && tmux != "$TMUX"
}

/// Owns "the current assistant session" for one editor instance.
pub struct SessionManager {
    host: Arc<dyn EditorHandle>,
    mux: Arc<dyn MuxClient>,
    adapters: Arc<AdapterFactory>,
    backend: Option<Box<dyn Backend>>,
}

impl SessionManager {
    /// Create a manager with no session.
    pub fn new(host: Arc<dyn EditorHandle>, mux: Arc<dyn MuxClient>) -> Self {
        let adapters = Arc::new(AdapterFactory::new(Arc::clone(&host)));
        Self {
            host,
            mux,
            adapters,
            backend: None,
        }
    }

    /// Start a session, or surface the existing one.
    ///
    /// A live backend is only re-shown, never relaunched. Otherwise the
    /// configuration is read, the backend variant selected for the current
    /// environment, and the session started. `command` overrides the
    /// configured launch command for this start only.
    pub async fn start(&mut self, command: Option<&str>) -> Result<()> {
        if let Some(backend) = self.backend.as_mut() {
            if backend.is_active().await {
                return backend.show().await;
            }
        }

        let config = SessionConfig::load(self.host.as_ref()).await;
        let kind = select_backend_kind(
            config.layout,
            inside_multiplexer(self.host.as_ref()).await,
        );
        let launch = command.unwrap_or(&config.command).to_string();
        tracing::debug!(%kind, layout = %config.layout, command = %launch, "starting session");

        let mut backend: Box<dyn Backend> = match kind {
            BackendKind::MultiplexerPane => Box::new(PaneBackend::new(
                Arc::clone(&self.host),
                Arc::clone(&self.mux),
                config,
            )),
            BackendKind::EmbeddedTerminal => Box::new(TerminalBackend::new(
                Arc::clone(&self.host),
                Arc::clone(&self.adapters),
                config,
            )),
        };
        backend.run(&launch).await?;
        self.backend = Some(backend);
        Ok(())
    }

    /// Deliver a prompt to the current session.
    ///
    /// Fails with [`AgentDockError::NoActiveSession`] when no session was
    /// started; no host call is attempted in that case.
    pub async fn send_prompt(&mut self, text: &str) -> Result<()> {
        let backend = self
            .backend
            .as_mut()
            .ok_or(AgentDockError::NoActiveSession)?;
        backend.send_prompt(text).await
    }

    /// Tear down the current session and forget it.
    ///
    /// Subsequent operations require a fresh [`start`](Self::start). No-op
    /// when no session exists.
    pub async fn exit(&mut self) -> Result<()> {
        match self.backend.take() {
            Some(mut backend) => backend.exit().await,
            None => Ok(()),
        }
    }

    /// Move the current session out of sight. No-op when none exists.
    pub async fn hide(&mut self) -> Result<()> {
        match self.backend.as_mut() {
            Some(backend) => backend.hide().await,
            None => Ok(()),
        }
    }

    /// Bring the session on screen, starting one if none exists.
    pub async fn show(&mut self) -> Result<()> {
        match self.backend.as_mut() {
            Some(backend) => backend.show().await,
            None => self.start(None).await,
        }
    }

    /// Whether a session exists and is live in external state.
    pub async fn is_active(&self) -> bool {
        match self.backend.as_ref() {
            Some(backend) => backend.is_active().await,
            None => false,
        }
    }

    /// The current session handle, if any.
    pub fn handle(&self) -> Option<SessionHandle> {
        self.backend.as_ref().and_then(|backend| backend.handle())
    }

    /// The kind of the current backend, if any.
    pub fn backend_kind(&self) -> Option<BackendKind> {
        self.backend.as_ref().map(|backend| backend.kind())
    }

    /// Drop the backend reference and every cached capability probe
    /// WITHOUT tearing the session down.
    ///
    /// This intentionally leaves any external process or pane running
    /// untracked; it exists for environment re-evaluation (tests switching
    /// editor families or multiplexer presence), not for normal teardown.
    /// Use [`exit`](Self::exit) to actually stop the assistant.
    pub fn reset(&mut self) {
        self.backend = None;
        self.adapters = Arc::new(AdapterFactory::new(Arc::clone(&self.host)));
    }
}
