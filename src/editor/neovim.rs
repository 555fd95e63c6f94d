//! Adapter for the `nvim_*` API family.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{BufferId, EditorAdapter, JobId, Keymap, WindowId, WindowSpec};
use crate::error::AgentDockError;
use crate::host::{value_as_i64, EditorHandle};
use crate::Result;

/// Adapter for editors exposing the rich API surface.
///
/// Overlay windows are real floating windows, terminal send is a direct
/// channel write, and the job id is a buffer-scoped variable.
pub struct NeovimAdapter {
    host: Arc<dyn EditorHandle>,
}

impl NeovimAdapter {
    /// Create an adapter bound to a host handle.
    pub fn new(host: Arc<dyn EditorHandle>) -> Self {
        Self { host }
    }
}

fn expect_id(func: &str, value: &Value) -> Result<i64> {
    value_as_i64(value)
        .ok_or_else(|| AgentDockError::Host(format!("unexpected {} reply: {}", func, value)))
}

#[async_trait]
impl EditorAdapter for NeovimAdapter {
    async fn create_buffer(&self, listed: bool, scratch: bool) -> Result<BufferId> {
        let reply = self
            .host
            .call("nvim_create_buf", vec![json!(listed), json!(scratch)])
            .await?;
        expect_id("nvim_create_buf", &reply)
    }

    async fn open_window(
        &self,
        buffer: BufferId,
        enter: bool,
        spec: &WindowSpec,
    ) -> Result<WindowId> {
        let mut config = json!({
            "relative": spec.relative.as_str(),
            "width": spec.width,
            "height": spec.height,
            "row": spec.row,
            "col": spec.col,
        });
        if let Some(style) = &spec.style {
            config["style"] = json!(style);
        }
        if let Some(border) = &spec.border {
            config["border"] = json!(border);
        }

        let reply = self
            .host
            .call("nvim_open_win", vec![json!(buffer), json!(enter), config])
            .await?;
        expect_id("nvim_open_win", &reply)
    }

    async fn close_window(&self, window: WindowId, force: bool) -> Result<()> {
        // The window may already be gone; closing twice is not an error
        // worth surfacing to the user.
        if let Err(err) = self
            .host
            .call("nvim_win_close", vec![json!(window), json!(force)])
            .await
        {
            tracing::debug!(window, %err, "window already closed");
        }
        Ok(())
    }

    async fn set_buffer_lines(
        &self,
        buffer: BufferId,
        start: i64,
        end: i64,
        lines: &[String],
    ) -> Result<()> {
        self.host
            .call(
                "nvim_buf_set_lines",
                vec![
                    json!(buffer),
                    json!(start),
                    json!(end),
                    json!(false),
                    json!(lines),
                ],
            )
            .await?;
        Ok(())
    }

    async fn set_buffer_keymap(&self, buffer: BufferId, map: &Keymap) -> Result<()> {
        self.host
            .call(
                "nvim_buf_set_keymap",
                vec![
                    json!(buffer),
                    json!(map.mode),
                    json!(map.lhs),
                    json!(map.rhs),
                    json!({
                        "noremap": map.noremap,
                        "silent": map.silent,
                        "expr": map.expr,
                    }),
                ],
            )
            .await?;
        Ok(())
    }

    async fn set_window_option(&self, window: WindowId, name: &str, value: Value) -> Result<()> {
        self.host
            .call(
                "nvim_win_set_option",
                vec![json!(window), json!(name), value],
            )
            .await?;
        Ok(())
    }

    async fn terminal_job_id(&self, buffer: BufferId) -> Result<JobId> {
        let reply = self
            .host
            .call("getbufvar", vec![json!(buffer), json!("&channel")])
            .await?;
        match value_as_i64(&reply) {
            Some(job) if job > 0 => Ok(job),
            _ => Err(AgentDockError::TerminalNotFound),
        }
    }

    async fn send_to_terminal(&self, job: JobId, data: &str) -> Result<()> {
        self.host
            .call("chansend", vec![json!(job), json!(data)])
            .await?;
        Ok(())
    }

    async fn open_terminal(&self, command: &str) -> Result<JobId> {
        self.host.command(&format!("terminal {}", command)).await?;
        // The terminal command leaves its buffer current; its channel is
        // the job handle.
        let reply = self.host.eval("&channel").await?;
        match value_as_i64(&reply) {
            Some(job) if job > 0 => Ok(job),
            _ => Err(AgentDockError::TerminalNotFound),
        }
    }

    fn supports_floating_windows(&self) -> bool {
        true
    }

    fn supports_terminal(&self) -> bool {
        true
    }
}
