//! tmux implementation of the multiplexer boundary.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use super::{parse_pane_list, MuxClient, SplitOrientation};
use crate::error::AgentDockError;
use crate::Result;

/// Name of the scratch paste-buffer used for prompt hand-off.
const PASTE_BUFFER: &str = "agent_dock_prompt";

/// Drives a tmux server through its command-line interface.
///
/// Every operation spawns `tmux`, waits for it to exit, and parses captured
/// stdout. There is deliberately no timeout: the editor command that
/// triggered the operation suspends until tmux answers.
pub struct Tmux {
    bin: String,
}

impl Tmux {
    /// Client using `tmux` from `PATH`.
    pub fn new() -> Self {
        Self::with_binary("tmux")
    }

    /// Client using a specific tmux binary.
    pub fn with_binary(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }

    async fn run(&self, args: &[&str]) -> Result<String> {
        tracing::debug!(?args, "running tmux");
        let output = Command::new(&self.bin)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| AgentDockError::Mux(format!("failed to spawn {}: {}", self.bin, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AgentDockError::Mux(format!(
                "{} {} failed: {}",
                self.bin,
                args.first().unwrap_or(&""),
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for Tmux {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MuxClient for Tmux {
    async fn split_pane(
        &self,
        orientation: SplitOrientation,
        shell: &str,
        command: &str,
    ) -> Result<String> {
        let stdout = self
            .run(&[
                "split-window",
                "-P",
                "-F",
                "#{pane_id}",
                orientation.flag(),
                shell,
                "-lc",
                command,
            ])
            .await?;
        Ok(stdout.trim().trim_matches('\'').to_string())
    }

    async fn list_panes(&self) -> Result<Vec<String>> {
        let stdout = self.run(&["list-panes", "-a", "-F", "#{pane_id}"]).await?;
        Ok(parse_pane_list(&stdout))
    }

    async fn join_pane(&self, orientation: SplitOrientation, pane: &str) -> Result<()> {
        self.run(&["join-pane", orientation.flag(), "-s", pane])
            .await?;
        Ok(())
    }

    async fn break_pane(&self, pane: &str) -> Result<()> {
        self.run(&["break-pane", "-d", "-s", pane]).await?;
        Ok(())
    }

    async fn send_key(&self, pane: &str, key: &str) -> Result<()> {
        self.run(&["send-keys", "-t", pane, key]).await?;
        Ok(())
    }

    async fn paste_file(&self, pane: &str, path: &Path) -> Result<()> {
        let path = path.to_string_lossy();

        // Load, paste bracketed, then drop the scratch buffer. Bracketed
        // paste keeps embedded newlines from submitting the prompt
        // line-by-line.
        self.run(&["load-buffer", "-b", PASTE_BUFFER, path.as_ref()])
            .await?;
        self.run(&["paste-buffer", "-t", pane, "-b", PASTE_BUFFER, "-p"])
            .await?;
        self.run(&["delete-buffer", "-b", PASTE_BUFFER]).await?;
        Ok(())
    }

    async fn kill_pane(&self, pane: &str) -> Result<()> {
        self.run(&["kill-pane", "-t", pane]).await?;
        Ok(())
    }
}
