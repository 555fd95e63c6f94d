//! Embedded-terminal backend.
//!
//! Hosts the assistant in a terminal buffer inside the editor itself. The
//! owning buffer is tracked alongside the job handle so the session can be
//! hidden, re-shown and torn down through ordinary buffer operations.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{Backend, BackendKind, SessionHandle, SESSION_OPENED_EVENT};
use crate::config::{Layout, SessionConfig};
use crate::editor::{AdapterFactory, Anchor, BufferId, EditorAdapter, JobId, WindowSpec};
use crate::error::AgentDockError;
use crate::host::{value_as_i64, EditorHandle};
use crate::Result;

/// Row the floating window is anchored at.
const FLOAT_ROW: u32 = 5;
/// Column the floating window is anchored at.
const FLOAT_COL: u32 = 10;

/// Backend hosting the assistant in an editor terminal buffer.
pub struct TerminalBackend {
    host: Arc<dyn EditorHandle>,
    adapters: Arc<AdapterFactory>,
    config: SessionConfig,
    adapter: Option<Arc<dyn EditorAdapter>>,
    job: Option<JobId>,
    buffer: Option<BufferId>,
}

impl TerminalBackend {
    /// Create an idle backend; [`run`](Backend::run) attaches the session.
    pub fn new(
        host: Arc<dyn EditorHandle>,
        adapters: Arc<AdapterFactory>,
        config: SessionConfig,
    ) -> Self {
        Self {
            host,
            adapters,
            config,
            adapter: None,
            job: None,
            buffer: None,
        }
    }

    /// The buffer owning the assistant terminal, once resolved.
    pub fn buffer(&self) -> Option<BufferId> {
        self.buffer
    }

    /// Scan open buffers for a still-live assistant terminal and adopt it.
    ///
    /// Recovery path for editor reloads that dropped the in-memory state
    /// while the assistant process kept running. Returns whether a session
    /// was adopted.
    pub async fn find_existing_session(&mut self) -> Result<bool> {
        let tag = self.config.command_tag().to_string();
        let reply = self.host.call("getbufinfo", vec![]).await?;
        let Value::Array(buffers) = reply else {
            return Ok(false);
        };

        for info in &buffers {
            let name = info.get("name").and_then(Value::as_str).unwrap_or("");
            if !(name.contains(&tag) && name.contains("term://")) {
                continue;
            }
            let Some(bufnr) = info.get("bufnr").and_then(value_as_i64) else {
                continue;
            };
            self.buffer = Some(bufnr);

            // Prefer the buffer-scoped job variable; fall back to asking
            // the adapter.
            if let Some(job) = info
                .get("variables")
                .and_then(|vars| vars.get("terminal_job_id"))
                .and_then(value_as_i64)
            {
                self.job = Some(job);
                self.ensure_adapter().await;
                tracing::info!(buffer = bufnr, job, "adopted existing assistant terminal");
                return Ok(true);
            }

            let adapter = self.ensure_adapter().await;
            if let Ok(job) = adapter.terminal_job_id(bufnr).await {
                if job > 0 {
                    self.job = Some(job);
                    tracing::info!(buffer = bufnr, job, "adopted existing assistant terminal");
                    return Ok(true);
                }
            }
        }

        Ok(false)
    }

    async fn ensure_adapter(&mut self) -> Arc<dyn EditorAdapter> {
        if let Some(adapter) = &self.adapter {
            return Arc::clone(adapter);
        }
        let adapter = self.adapters.get(self.config.command_tag()).await;
        self.adapter = Some(Arc::clone(&adapter));
        adapter
    }

    async fn resolve_buffer_by_tag(&self) -> Option<BufferId> {
        let tag = self.config.command_tag();
        let reply = self.host.call("getbufinfo", vec![]).await.ok()?;
        let Value::Array(buffers) = reply else {
            return None;
        };
        buffers
            .iter()
            .find(|info| {
                info.get("name")
                    .and_then(Value::as_str)
                    .is_some_and(|name| name.contains(tag))
            })
            .and_then(|info| info.get("bufnr"))
            .and_then(value_as_i64)
    }

    fn float_spec(&self) -> WindowSpec {
        WindowSpec {
            width: self.config.width,
            height: self.config.height,
            row: FLOAT_ROW,
            col: FLOAT_COL,
            relative: Anchor::Editor,
            style: Some(
                self.config
                    .style
                    .clone()
                    .unwrap_or_else(|| "minimal".to_string()),
            ),
            border: self.config.border.clone(),
        }
    }
}

#[async_trait]
impl Backend for TerminalBackend {
    async fn run(&mut self, command: &str) -> Result<SessionHandle> {
        if self.is_active().await {
            if let Some(handle) = self.handle() {
                return Ok(handle);
            }
        }

        // An assistant terminal may have survived a plugin reload; adopt it
        // instead of spawning a second process.
        if self.find_existing_session().await.unwrap_or(false) {
            self.host.emit(SESSION_OPENED_EVENT).await?;
            if let Some(handle) = self.handle() {
                return Ok(handle);
            }
        }

        let adapter = self.ensure_adapter().await;
        if !adapter.supports_terminal() {
            return Err(AgentDockError::UnsupportedFeature("terminal"));
        }

        let job = adapter.open_terminal(command).await?;
        self.job = Some(job);
        self.buffer = self.resolve_buffer_by_tag().await;
        tracing::info!(job, buffer = ?self.buffer, "assistant terminal started");

        self.host.emit(SESSION_OPENED_EVENT).await?;
        Ok(SessionHandle::TerminalJob(job))
    }

    async fn send_prompt(&mut self, text: &str) -> Result<()> {
        let job = self
            .job
            .ok_or(AgentDockError::NotActive(BackendKind::EmbeddedTerminal))?;
        let adapter = self
            .adapter
            .clone()
            .ok_or(AgentDockError::NotActive(BackendKind::EmbeddedTerminal))?;

        adapter.send_to_terminal(job, text).await?;
        adapter.send_to_terminal(job, "\n").await?;
        Ok(())
    }

    async fn exit(&mut self) -> Result<()> {
        let (Some(job), Some(buffer)) = (self.job, self.buffer) else {
            return Ok(());
        };

        if job != 0 {
            if let Some(adapter) = &self.adapter {
                // Interrupt the assistant before destroying its buffer.
                adapter.send_to_terminal(job, "\x03").await?;
            }
        }
        self.host.command(&format!("bdelete! {}", buffer)).await?;

        self.job = None;
        self.buffer = None;
        tracing::info!(job, buffer, "assistant terminal closed");
        Ok(())
    }

    async fn hide(&mut self) -> Result<()> {
        let Some(buffer) = self.buffer else {
            return Ok(());
        };

        let reply = self.host.call("getbufinfo", vec![json!(buffer)]).await?;
        let windows: Vec<i64> = reply
            .get(0)
            .and_then(|info| info.get("windows"))
            .and_then(Value::as_array)
            .map(|wins| wins.iter().filter_map(value_as_i64).collect())
            .unwrap_or_default();

        for window in windows {
            self.host
                .call("win_execute", vec![json!(window), json!("close")])
                .await?;
        }
        Ok(())
    }

    async fn show(&mut self) -> Result<()> {
        let Some(buffer) = self.buffer else {
            return Ok(());
        };

        match self.config.layout {
            Layout::Split => {
                self.host
                    .command(&format!("split | buffer {}", buffer))
                    .await?;
            }
            Layout::Vsplit => {
                self.host
                    .command(&format!("vsplit | buffer {}", buffer))
                    .await?;
            }
            Layout::Floating => {
                let spec = self.float_spec();
                let adapter = self.ensure_adapter().await;
                let window = adapter.open_window(buffer, true, &spec).await?;
                if let Some(blend) = self.config.blend {
                    adapter
                        .set_window_option(window, "winblend", json!(blend))
                        .await?;
                }
            }
        }
        Ok(())
    }

    async fn is_active(&self) -> bool {
        let (Some(_), Some(buffer)) = (self.job, self.buffer) else {
            return false;
        };

        // The buffer can disappear under us (:bdelete, editor restart);
        // only a live buffer counts.
        match self.host.call("getbufinfo", vec![json!(buffer)]).await {
            Ok(Value::Array(infos)) => !infos.is_empty(),
            _ => false,
        }
    }

    fn handle(&self) -> Option<SessionHandle> {
        self.job.map(SessionHandle::TerminalJob)
    }

    fn kind(&self) -> BackendKind {
        BackendKind::EmbeddedTerminal
    }

    fn config(&self) -> &SessionConfig {
        &self.config
    }
}
