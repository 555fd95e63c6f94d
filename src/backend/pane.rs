//! Multiplexer-pane backend.
//!
//! Hosts the assistant in a pane of the terminal multiplexer the editor is
//! running inside. The pane can outlive the editor process, so its id is
//! persisted in a host global variable and re-verified against the live
//! pane list before every reuse; anything outside this plugin may have
//! killed the pane in the meantime.

use std::io::Write;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{Backend, BackendKind, SessionHandle, SESSION_OPENED_EVENT};
use crate::config::SessionConfig;
use crate::error::AgentDockError;
use crate::host::{self, EditorHandle};
use crate::mux::{MuxClient, SplitOrientation};
use crate::Result;

/// Global variable persisting the assistant pane id across editor reloads.
pub const VAR_PANE_ID: &str = "agent_dock_pane_id";

/// Keystroke that interrupts the assistant.
const INTERRUPT_KEY: &str = "C-c";
/// Keystroke that submits a pasted prompt.
const SUBMIT_KEY: &str = "C-m";
/// Shell used when the user's shell cannot be determined.
const FALLBACK_SHELL: &str = "/bin/sh";
/// Prefix of the prompt hand-off temp files.
const PROMPT_FILE_PREFIX: &str = "agent_dock_prompt_";

/// Backend hosting the assistant in a multiplexer pane.
pub struct PaneBackend {
    host: Arc<dyn EditorHandle>,
    mux: Arc<dyn MuxClient>,
    config: SessionConfig,
    pane: Option<String>,
}

impl PaneBackend {
    /// Create an idle backend; [`run`](Backend::run) attaches the session.
    pub fn new(
        host: Arc<dyn EditorHandle>,
        mux: Arc<dyn MuxClient>,
        config: SessionConfig,
    ) -> Self {
        Self {
            host,
            mux,
            config,
            pane: None,
        }
    }

    fn orientation(&self) -> SplitOrientation {
        SplitOrientation::for_layout(self.config.layout)
    }

    /// The pane id persisted by a previous session, if any.
    async fn registered_pane_id(&self) -> Option<String> {
        match self.host.get_var(VAR_PANE_ID).await {
            Ok(Some(Value::String(pane))) if !pane.is_empty() => Some(pane),
            _ => None,
        }
    }

    /// Shell hosting the assistant command inside the new pane.
    async fn hosting_shell(&self) -> String {
        let shell = host::expand(self.host.as_ref(), "$SHELL").await;
        if shell.is_empty() || shell == "$SHELL" {
            FALLBACK_SHELL.to_string()
        } else {
            shell
        }
    }
}

#[async_trait]
impl Backend for PaneBackend {
    async fn run(&mut self, command: &str) -> Result<SessionHandle> {
        // A pane from a previous editor session may still be running the
        // assistant. Only the live pane list decides; the persisted id by
        // itself proves nothing.
        if let Some(existing) = self.registered_pane_id().await {
            if self.mux.pane_exists(&existing).await {
                self.mux.join_pane(self.orientation(), &existing).await?;
                self.pane = Some(existing.clone());
                tracing::info!(pane = %existing, "reattached assistant pane");
                self.host.emit(SESSION_OPENED_EVENT).await?;
                return Ok(SessionHandle::MultiplexerPane(existing));
            }
        }

        let shell = self.hosting_shell().await;
        let pane = self
            .mux
            .split_pane(self.orientation(), &shell, command)
            .await?;
        if pane.is_empty() {
            return Err(AgentDockError::PaneCreationFailed);
        }

        self.host.set_var(VAR_PANE_ID, json!(pane)).await?;
        self.pane = Some(pane.clone());
        tracing::info!(pane = %pane, "assistant pane started");

        self.host.emit(SESSION_OPENED_EVENT).await?;
        Ok(SessionHandle::MultiplexerPane(pane))
    }

    async fn send_prompt(&mut self, text: &str) -> Result<()> {
        let pane = self
            .pane
            .clone()
            .ok_or(AgentDockError::NotActive(BackendKind::MultiplexerPane))?;

        // Key injection would submit each embedded newline as its own
        // prompt, so the text goes through a file and the multiplexer's
        // paste buffer instead.
        let mut file = tempfile::Builder::new()
            .prefix(PROMPT_FILE_PREFIX)
            .tempfile()?;
        file.write_all(text.as_bytes())?;
        file.flush()?;

        self.mux.paste_file(&pane, file.path()).await?;
        self.mux.send_key(&pane, SUBMIT_KEY).await?;

        // Dropping the handle removes the file; a failed removal is not
        // worth surfacing.
        Ok(())
    }

    async fn exit(&mut self) -> Result<()> {
        let Some(pane) = self.pane.take() else {
            return Ok(());
        };

        // The pane may already be gone; teardown still has to clear the
        // persisted id either way.
        if let Err(err) = self.mux.send_key(&pane, INTERRUPT_KEY).await {
            tracing::debug!(pane = %pane, %err, "interrupt keystroke failed");
        }
        if let Err(err) = self.mux.kill_pane(&pane).await {
            tracing::debug!(pane = %pane, %err, "kill-pane failed");
        }
        self.host.set_var(VAR_PANE_ID, json!("")).await?;
        tracing::info!(pane = %pane, "assistant pane closed");
        Ok(())
    }

    async fn hide(&mut self) -> Result<()> {
        let Some(pane) = &self.pane else {
            return Ok(());
        };
        self.mux.break_pane(pane).await
    }

    async fn show(&mut self) -> Result<()> {
        let Some(pane) = self.pane.clone() else {
            return Ok(());
        };
        self.mux.join_pane(self.orientation(), &pane).await
    }

    async fn is_active(&self) -> bool {
        match &self.pane {
            Some(pane) => self.mux.pane_exists(pane).await,
            None => false,
        }
    }

    fn handle(&self) -> Option<SessionHandle> {
        self.pane.clone().map(SessionHandle::MultiplexerPane)
    }

    fn kind(&self) -> BackendKind {
        BackendKind::MultiplexerPane
    }

    fn config(&self) -> &SessionConfig {
        &self.config
    }
}
