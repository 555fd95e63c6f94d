//! Adapter for legacy editors without the `nvim_*` API.
//!
//! Overlay windows are emulated with the popup primitive when the host has
//! one, falling back to plain splits otherwise. Most buffer primitives have
//! no handle-taking form here, so they temporarily switch to the target
//! buffer or window and restore the previous one afterwards.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{BufferId, EditorAdapter, JobId, Keymap, WindowId, WindowSpec};
use crate::error::AgentDockError;
use crate::host::{value_as_i64, EditorHandle};
use crate::Result;

/// Adapter for the legacy editor family.
pub struct VimAdapter {
    host: Arc<dyn EditorHandle>,
    /// Buffer-name tag used to re-resolve the assistant terminal, since the
    /// key-injection primitive is addressed by buffer rather than by the
    /// job handle callers hold.
    terminal_tag: String,
    has_popup: bool,
    has_terminal: bool,
}

impl VimAdapter {
    /// Construct the adapter, probing the host's popup and terminal
    /// features once. Probe failures classify as "absent".
    pub async fn probe(host: Arc<dyn EditorHandle>, terminal_tag: String) -> Self {
        let has_popup = has_feature(host.as_ref(), "popupwin").await;
        let has_terminal = has_feature(host.as_ref(), "terminal").await;
        Self {
            host,
            terminal_tag,
            has_popup,
            has_terminal,
        }
    }

    async fn current_buffer(&self) -> Result<BufferId> {
        let reply = self.host.call("bufnr", vec![]).await?;
        value_as_i64(&reply)
            .ok_or_else(|| AgentDockError::Host(format!("unexpected bufnr reply: {}", reply)))
    }

    async fn current_window(&self) -> Result<WindowId> {
        let reply = self.host.call("winnr", vec![]).await?;
        value_as_i64(&reply)
            .ok_or_else(|| AgentDockError::Host(format!("unexpected winnr reply: {}", reply)))
    }

    /// Run `f`-supplied commands against `buffer`, restoring the buffer the
    /// user was in afterwards.
    async fn with_buffer(&self, buffer: BufferId, cmds: Vec<String>) -> Result<()> {
        let previous = self.current_buffer().await?;
        self.host.command(&format!("buffer {}", buffer)).await?;
        let mut result = Ok(());
        for cmd in cmds {
            result = self.host.command(&cmd).await;
            if result.is_err() {
                break;
            }
        }
        self.host.command(&format!("buffer {}", previous)).await?;
        result
    }
}

async fn has_feature(host: &dyn EditorHandle, feature: &str) -> bool {
    matches!(
        host.call("has", vec![Value::from(feature)]).await,
        Ok(value) if value_as_i64(&value) == Some(1)
    )
}

fn option_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[async_trait]
impl EditorAdapter for VimAdapter {
    async fn create_buffer(&self, listed: bool, scratch: bool) -> Result<BufferId> {
        self.host.command("enew").await?;
        let buffer = {
            let reply = self.host.call("bufnr", vec![json!("%")]).await?;
            value_as_i64(&reply)
                .ok_or_else(|| AgentDockError::Host(format!("unexpected bufnr reply: {}", reply)))?
        };

        if !listed {
            self.host.command("setlocal nobuflisted").await?;
        }
        if scratch {
            self.host.command("setlocal buftype=nofile").await?;
            self.host.command("setlocal bufhidden=hide").await?;
            self.host.command("setlocal noswapfile").await?;
        }

        Ok(buffer)
    }

    async fn open_window(
        &self,
        buffer: BufferId,
        _enter: bool,
        spec: &WindowSpec,
    ) -> Result<WindowId> {
        if self.has_popup {
            let border = if spec.border.is_some() {
                json!([1, 1, 1, 1])
            } else {
                json!([0, 0, 0, 0])
            };
            let options = json!({
                "line": spec.row + 1,
                "col": spec.col + 1,
                "minwidth": spec.width,
                "maxwidth": spec.width,
                "minheight": spec.height,
                "maxheight": spec.height,
                "border": border,
                "scrollbar": 0,
                "zindex": 50,
                "mapping": 0,
            });
            let reply = self
                .host
                .call("popup_create", vec![json!(buffer), options])
                .await?;
            return value_as_i64(&reply).ok_or_else(|| {
                AgentDockError::Host(format!("unexpected popup_create reply: {}", reply))
            });
        }

        // No popup support: fall back to a plain split shaped like the
        // requested geometry.
        let split = if spec.height > spec.width {
            "split"
        } else {
            "vsplit"
        };
        self.host
            .command(&format!("{} | buffer {}", split, buffer))
            .await?;
        self.current_window().await
    }

    async fn close_window(&self, window: WindowId, _force: bool) -> Result<()> {
        if self.has_popup {
            if let Err(err) = self.host.call("popup_close", vec![json!(window)]).await {
                tracing::debug!(window, %err, "popup already closed");
            }
            return Ok(());
        }

        let previous = self.current_window().await?;
        self.host.command(&format!("{}wincmd w", window)).await?;
        self.host.command("close").await?;
        self.host.command(&format!("{}wincmd w", previous)).await?;
        Ok(())
    }

    async fn set_buffer_lines(
        &self,
        buffer: BufferId,
        start: i64,
        end: i64,
        lines: &[String],
    ) -> Result<()> {
        let previous = self.current_buffer().await?;
        self.host.command(&format!("buffer {}", buffer)).await?;

        let delete = if end == -1 {
            format!("{},$delete _", start + 1)
        } else {
            format!("{},{}delete _", start + 1, end)
        };
        self.host.command(&delete).await?;

        if !lines.is_empty() {
            self.host
                .call("append", vec![json!(start), json!(lines)])
                .await?;
        }

        self.host.command(&format!("buffer {}", previous)).await?;
        Ok(())
    }

    async fn set_buffer_keymap(&self, buffer: BufferId, map: &Keymap) -> Result<()> {
        let map_cmd = if map.noremap { "noremap" } else { "map" };
        let silent = if map.silent { "<silent> " } else { "" };
        let expr = if map.expr { "<expr> " } else { "" };
        let cmd = format!(
            "{}{} <buffer> {}{}{} {}",
            map.mode, map_cmd, silent, expr, map.lhs, map.rhs
        );
        self.with_buffer(buffer, vec![cmd]).await
    }

    async fn set_window_option(&self, window: WindowId, name: &str, value: Value) -> Result<()> {
        if self.has_popup {
            // Popups have no window-local options worth mirroring; blend in
            // particular cannot be expressed there.
            tracing::debug!(window, name, "skipping window option on popup");
            return Ok(());
        }

        let previous = self.current_window().await?;
        self.host.command(&format!("{}wincmd w", window)).await?;
        self.host
            .command(&format!("setlocal {}={}", name, option_value(&value)))
            .await?;
        self.host.command(&format!("{}wincmd w", previous)).await?;
        Ok(())
    }

    async fn terminal_job_id(&self, buffer: BufferId) -> Result<JobId> {
        let job = self.host.call("term_getjob", vec![json!(buffer)]).await?;
        if job.is_null() || value_as_i64(&job) == Some(0) {
            return Err(AgentDockError::TerminalNotFound);
        }

        let channel = self.host.call("job_getchannel", vec![job]).await?;
        value_as_i64(&channel).ok_or(AgentDockError::TerminalNotFound)
    }

    async fn send_to_terminal(&self, _job: JobId, data: &str) -> Result<()> {
        // The key-injection primitive takes a buffer, not a job, so the
        // assistant buffer is re-resolved by its name tag on every send.
        let reply = self
            .host
            .call("bufnr", vec![json!(self.terminal_tag)])
            .await?;
        match value_as_i64(&reply) {
            Some(buffer) if buffer != -1 => {
                self.host
                    .call("term_sendkeys", vec![json!(buffer), json!(data)])
                    .await?;
                Ok(())
            }
            _ => {
                tracing::warn!(tag = %self.terminal_tag, "assistant terminal buffer not found");
                Ok(())
            }
        }
    }

    async fn open_terminal(&self, command: &str) -> Result<JobId> {
        if !self.has_terminal {
            return Err(AgentDockError::UnsupportedFeature("terminal"));
        }

        self.host
            .command(&format!("terminal ++curwin {}", command))
            .await?;
        let reply = self.host.call("bufnr", vec![json!("%")]).await?;
        let buffer = value_as_i64(&reply)
            .ok_or_else(|| AgentDockError::Host(format!("unexpected bufnr reply: {}", reply)))?;
        self.terminal_job_id(buffer).await
    }

    fn supports_floating_windows(&self) -> bool {
        self.has_popup
    }

    fn supports_terminal(&self) -> bool {
        self.has_terminal
    }
}
